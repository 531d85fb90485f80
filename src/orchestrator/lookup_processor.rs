//! 单条查询处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责驱动单条案件查询的完整验证码流程，是查询级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **本地校验**：参数不合法直接跳过，不发任何请求
//! 2. **流程调度**：创建并驱动 `LookupFlow`
//! 3. **操作员交互**：展示挑战文本，从标准输入读取答案
//! 4. **重试控制**：验证码被拒时换新挑战重试，配额用尽登记失败
//! 5. **结果处理**：拉取案件报告并展示，按需下载文书
//! 6. **文件清理**：删除已处理的 TOML 文件

use crate::config::Config;
use crate::infrastructure::HttpExecutor;
use crate::models::search::{case_type_display_name, court_display_name};
use crate::models::{CaseReport, ChallengeSession, LookupRequest, SearchParameters};
use crate::services::{CaseService, CourtGateway, ReportWriter};
use crate::utils::logging::truncate_text;
use crate::workflow::{FlowEvent, LookupCtx, LookupFlow, SubmissionOutcome};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tokio::io::{BufReader, Lines, Stdin};
use tracing::{debug, error, info, warn};

/// 操作员输入句柄（整批共用一个）
pub type OperatorInput = Lines<BufReader<Stdin>>;

/// 单条查询的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupResult {
    /// 检索已受理，报告已展示
    Success,
    /// 流程走完但以失败终止
    Failed,
    /// 本地校验不通过，未发出任何请求
    Skipped,
}

/// 处理单条查询
///
/// # 参数
/// - `http`: HTTP 执行器
/// - `request`: 查询请求数据
/// - `lookup_index`: 查询序号（用于日志）
/// - `config`: 配置
/// - `input`: 操作员输入
///
/// # 返回
/// 返回本条查询的处理结果
pub async fn process_lookup(
    http: &HttpExecutor,
    request: LookupRequest,
    lookup_index: usize,
    config: &Config,
    input: &mut OperatorInput,
) -> Result<LookupResult> {
    let source = request
        .file_path
        .as_deref()
        .map(file_name_of)
        .unwrap_or_else(|| "<未命名>".to_string());
    let ctx = LookupCtx::new(source, lookup_index);
    let params = request.to_parameters();

    log_lookup_start(&ctx, &params);

    let reports = ReportWriter::with_path(config.report_file.clone());

    // 参数不合法直接跳过，一个请求都不发
    if let Err(e) = params.validate() {
        warn!("{} ⚠️ 参数校验失败: {}", ctx, e);
        reports.write(&ctx.source, &params, &e.to_string()).await?;
        return Ok(LookupResult::Skipped);
    }

    // 创建流程对象（只创建一次，复用）
    let flow = LookupFlow::new(CourtGateway::new(http.clone()));
    let cases = CaseService::new(config);

    // ========== 验证码尝试循环 ==========
    for attempt in 1..=config.max_solution_attempts {
        log_attempt_start(&ctx, attempt, config.max_solution_attempts);

        // 第一次签发新挑战，被拒后携带参数刷新
        let acquired = if attempt == 1 {
            flow.begin_challenge().await
        } else {
            flow.refresh_challenge(&params).await
        };
        let mut session = match acquired {
            Ok(session) => session,
            Err(e) => {
                error!("{} ❌ 获取验证码失败: {}", ctx, e);
                reports
                    .write(&ctx.source, &params, &format!("获取验证码失败: {}", e))
                    .await?;
                return Ok(LookupResult::Failed);
            }
        };

        // 同一次尝试内循环：空答案与过短答案重新输入，r 换一张新图
        let outcome = loop {
            show_challenge(&ctx, &session);

            let line = read_operator_line(input).await?;
            let line = line.trim();

            if line.is_empty() {
                info!("{} 💡 答案不能为空，请重新输入", ctx);
                continue;
            }

            if line.eq_ignore_ascii_case("r") || line.eq_ignore_ascii_case("refresh") {
                session = match flow.refresh_challenge(&params).await {
                    Ok(session) => session,
                    Err(e) => {
                        error!("{} ❌ 刷新验证码失败: {}", ctx, e);
                        reports
                            .write(&ctx.source, &params, &format!("刷新验证码失败: {}", e))
                            .await?;
                        return Ok(LookupResult::Failed);
                    }
                };
                continue;
            }

            match flow.submit(params.clone(), line).await {
                // 本地校验失败没有发请求，挑战仍然有效，直接重答
                Err(e) if e.is_validation() => {
                    warn!("{} ⚠️ {}", ctx, e);
                    continue;
                }
                other => break other,
            }
        };

        drain_events(&ctx, &flow);

        match outcome {
            Ok(SubmissionOutcome::Success { query_id }) => {
                info!("{} ✅ 检索已受理: queryId={}", ctx, query_id);

                handle_accepted(http, &cases, &ctx, config, query_id).await;

                // 清理文件
                cleanup_file(request.file_path.as_deref(), &ctx)?;

                return Ok(LookupResult::Success);
            }
            Ok(SubmissionOutcome::CaptchaRejected { reason }) => {
                // 参数已由流程保留，下一轮换新挑战重试
                warn!("{} ⚠️ 验证码被拒: {}", ctx, truncate_text(&reason, 120));
            }
            Ok(SubmissionOutcome::SearchFailed { reason }) => {
                error!("{} ❌ 检索失败: {}", ctx, truncate_text(&reason, 120));
                reports.write(&ctx.source, &params, &reason).await?;
                return Ok(LookupResult::Failed);
            }
            Ok(SubmissionOutcome::NetworkError { reason }) => {
                error!("{} ❌ 网络错误: {}", ctx, reason);
                reports
                    .write(&ctx.source, &params, &format!("网络错误: {}", reason))
                    .await?;
                return Ok(LookupResult::Failed);
            }
            Err(e) => {
                error!("{} ❌ 流程错误: {}", ctx, e);
                reports.write(&ctx.source, &params, &e.to_string()).await?;
                return Ok(LookupResult::Failed);
            }
        }
    }

    // 尝试配额用尽
    error!(
        "{} ❌ 验证码尝试次数用尽 ({} 次)",
        ctx, config.max_solution_attempts
    );
    reports
        .write(&ctx.source, &params, "验证码尝试次数用尽")
        .await?;
    Ok(LookupResult::Failed)
}

/// 检索受理后的收尾：拉取报告、展示、按需下载文书
///
/// 检索已经受理，这里的失败只警告，不改变本条查询的结果。
async fn handle_accepted(
    http: &HttpExecutor,
    cases: &CaseService,
    ctx: &LookupCtx,
    config: &Config,
    query_id: u64,
) {
    match cases.fetch_report(http, query_id).await {
        Ok(report) => {
            render_report(ctx, &report);

            if config.download_documents {
                match cases.download_documents(http, &report).await {
                    Ok(count) if count > 0 => {
                        info!("{} 📦 已下载 {} 份文书", ctx, count);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!("{} ⚠️ 文书下载失败: {}", ctx, e);
                    }
                }
            }
        }
        Err(e) => {
            warn!("{} ⚠️ 拉取案件报告失败: {}", ctx, e);
        }
    }
}

/// 读取一行操作员输入
async fn read_operator_line(input: &mut OperatorInput) -> Result<String> {
    match input.next_line().await.context("读取标准输入失败")? {
        Some(line) => Ok(line),
        None => anyhow::bail!("标准输入已关闭，无法读取验证码答案"),
    }
}

/// 取走并记录流程事件
fn drain_events(ctx: &LookupCtx, flow: &LookupFlow<CourtGateway>) {
    for event in flow.take_events() {
        match event {
            FlowEvent::ChallengeIssued { session_id } => {
                debug!("{} 事件: 挑战已签发 session={}", ctx, session_id);
            }
            FlowEvent::SolutionAccepted { query_id } => {
                debug!("{} 事件: 答案已接受 queryId={}", ctx, query_id);
            }
            FlowEvent::SolutionRejected { reason } => {
                debug!("{} 事件: 答案被拒 {}", ctx, truncate_text(&reason, 80));
            }
            FlowEvent::AttemptFailed { reason } => {
                debug!("{} 事件: 尝试失败 {}", ctx, truncate_text(&reason, 80));
            }
        }
    }
}

/// 清理已处理的文件
fn cleanup_file(file_path: Option<&str>, ctx: &LookupCtx) -> Result<()> {
    info!("{} 🗑️ 清理已处理的文件...", ctx);

    if let Some(file_path) = file_path {
        if Path::new(file_path).exists() {
            fs::remove_file(file_path).with_context(|| format!("无法删除文件: {}", file_path))?;
            info!(
                "{} ✓ 文件已删除: {}",
                ctx,
                Path::new(file_path)
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
            );
        } else {
            warn!("{} ⚠️ 文件不存在: {}", ctx, file_path);
        }
    } else {
        warn!("{} ⚠️ 文件路径未设置", ctx);
    }

    Ok(())
}

fn file_name_of(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

// ========== 日志辅助函数 ==========

fn log_lookup_start(ctx: &LookupCtx, params: &SearchParameters) {
    info!("{} 开始处理", ctx);
    info!("{} 查询: {}", ctx, params);
}

fn log_attempt_start(ctx: &LookupCtx, attempt: usize, max_attempts: usize) {
    info!("\n{} {}", ctx, "─".repeat(30));
    info!("{} 第 {}/{} 次验证码尝试", ctx, attempt, max_attempts);
}

fn show_challenge(ctx: &LookupCtx, session: &ChallengeSession) {
    info!("{} 🔑 验证码: {}", ctx, session.text);
    info!(
        "{} 有效期 {} 秒 (session={})",
        ctx, session.expires_in, session.session_id
    );
    info!("{} 请输入验证码（输入 r 换一张）:", ctx);
}

fn render_report(ctx: &LookupCtx, report: &CaseReport) {
    info!("\n{} {}", ctx, "=".repeat(40));
    info!(
        "{} 📋 案件报告 #{} [{}]",
        ctx,
        report.id,
        report.status.display_name()
    );
    info!(
        "{} {} {} ({}) @ {}",
        ctx,
        case_type_display_name(&report.case_type),
        report.case_number,
        report.filing_year,
        court_display_name(&report.court),
    );

    if let Some(error) = &report.error {
        warn!("{} ⚠️ 查询失败原因: {}", ctx, error);
    }

    if let Some(detail) = &report.case_detail {
        if let Some(judge) = &detail.judge {
            info!("{} 法官: {}", ctx, judge);
        }
        if let Some(petitioner) = &detail.petitioner {
            info!("{} 申请人: {}", ctx, petitioner);
        }
        if let Some(respondent) = &detail.respondent {
            info!("{} 被申请人: {}", ctx, respondent);
        }
        if let Some(filing_date) = &detail.filing_date {
            info!("{} 立案日期: {}", ctx, filing_date);
        }
        if let Some(status) = &detail.current_status {
            info!("{} 当前状态: {}", ctx, status);
        }
        if !detail.proceedings.is_empty() {
            info!("{} 进程记录 {} 条:", ctx, detail.proceedings.len());
            for proceeding in &detail.proceedings {
                info!(
                    "{}   {} {} {}",
                    ctx,
                    proceeding.date,
                    proceeding.title,
                    proceeding.description.as_deref().unwrap_or("")
                );
            }
        }
    }

    if !report.documents.is_empty() {
        info!("{} 关联文书 {} 份:", ctx, report.documents.len());
        for document in &report.documents {
            info!(
                "{}   {} [{}] {}",
                ctx,
                document.title,
                document.document_type,
                if document.is_available {
                    "可下载"
                } else {
                    "暂不可用"
                },
            );
        }
    }
    info!("{} {}", ctx, "=".repeat(40));
}
