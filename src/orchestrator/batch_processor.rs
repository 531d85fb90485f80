//! 批量请求处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量查询请求的处理和收尾展示。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：初始化日志文件、创建 HttpExecutor
//! 2. **批量加载**：扫描并加载所有待处理的查询请求（`Vec<LookupRequest>`）
//! 3. **顺序处理**：验证码需要操作员逐条作答，请求之间不并行
//! 4. **收尾展示**：全部处理完后拉取查询历史，按配置导出 CSV
//! 5. **全局统计**：汇总所有查询的处理结果
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单条查询的细节
//! - **资源所有者**：唯一持有标准输入句柄的模块
//! - **向下委托**：委托 lookup_processor 处理单条查询

use crate::config::Config;
use crate::infrastructure::HttpExecutor;
use crate::models::history::{format_record_date, format_record_time, HistoryRecord};
use crate::models::search::{case_type_display_name, court_display_name};
use crate::models::LookupRequest;
use crate::orchestrator::lookup_processor::{self, LookupResult, OperatorInput};
use crate::services::HistoryService;
use crate::utils::logging::{init_log_file, log_startup, print_final_stats};
use anyhow::Result;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    executor: HttpExecutor,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(&config);

        // 创建 HttpExecutor（持有 reqwest::Client）
        let executor = HttpExecutor::new(&config)?;

        Ok(Self { config, executor })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        // 加载所有待处理的查询请求
        let all_requests = self.load_requests().await?;

        if all_requests.is_empty() {
            warn!("⚠️ 没有找到待处理的TOML文件，程序结束");
            return Ok(());
        }

        let total_requests = all_requests.len();
        log_requests_loaded(total_requests);

        // 标准输入只打开一次，整批共用
        let mut input = BufReader::new(io::stdin()).lines();

        // 处理所有查询
        let stats = self.process_all_requests(all_requests, &mut input).await?;

        // 输出最终统计
        print_final_stats(
            stats.success,
            stats.failed,
            stats.skipped,
            stats.total,
            &self.config.output_log_file,
        );

        // 收尾：拉取并展示查询历史
        self.show_history().await;

        Ok(())
    }

    /// 加载查询请求
    async fn load_requests(&self) -> Result<Vec<LookupRequest>> {
        info!("\n📁 正在扫描待处理的查询请求...");
        crate::models::load_all_lookup_requests(&self.config.requests_folder).await
    }

    /// 逐条处理所有查询
    async fn process_all_requests(
        &self,
        all_requests: Vec<LookupRequest>,
        input: &mut OperatorInput,
    ) -> Result<ProcessingStats> {
        let total_requests = all_requests.len();
        let mut stats = ProcessingStats {
            total: total_requests,
            ..Default::default()
        };

        for (index, request) in all_requests.into_iter().enumerate() {
            let lookup_index = index + 1;
            log_lookup_banner(lookup_index, total_requests);

            match lookup_processor::process_lookup(
                &self.executor,
                request,
                lookup_index,
                &self.config,
                input,
            )
            .await
            {
                Ok(LookupResult::Success) => {
                    stats.success += 1;
                }
                Ok(LookupResult::Skipped) => {
                    stats.skipped += 1;
                }
                Ok(LookupResult::Failed) => {
                    stats.failed += 1;
                }
                Err(e) => {
                    error!("[查询#{}] ❌ 处理过程中发生错误: {}", lookup_index, e);
                    stats.failed += 1;
                }
            }
        }

        Ok(stats)
    }

    /// 拉取并展示查询历史
    ///
    /// 历史展示是收尾动作，失败只警告，不影响本次运行的结果。
    async fn show_history(&self) {
        info!("\n📁 正在拉取最近的查询历史...");

        let history = HistoryService::new(&self.config);
        match history.fetch(&self.executor).await {
            Ok(records) => {
                render_history(&records);

                if self.config.export_history {
                    if let Err(e) = history.export(&self.executor).await {
                        warn!("⚠️ 历史导出失败: {}", e);
                    }
                }
            }
            Err(e) => {
                warn!("⚠️ 拉取查询历史失败: {}", e);
            }
        }
    }
}

/// 处理统计
#[derive(Debug, Default)]
struct ProcessingStats {
    success: usize,
    failed: usize,
    skipped: usize,
    total: usize,
}

// ========== 日志辅助函数 ==========

fn log_requests_loaded(total: usize) {
    info!("✓ 找到 {} 条待处理的查询", total);
    info!("💡 验证码需要人工作答，将逐条处理\n");
}

fn log_lookup_banner(lookup_index: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 条查询", lookup_index, total);
    info!("{}", "=".repeat(60));
}

fn render_history(records: &[HistoryRecord]) {
    if records.is_empty() {
        info!("（暂无历史记录）");
        return;
    }

    info!("\n{}", "─".repeat(60));
    info!("📋 最近的查询历史（{} 条）", records.len());
    info!("{}", "─".repeat(60));
    for record in records {
        info!(
            "#{} {} {} ({}) @ {} | {} | {} {}",
            record.id,
            case_type_display_name(&record.case_type),
            record.case_number,
            record.filing_year,
            court_display_name(&record.court),
            record.status.display_name(),
            format_record_date(&record.created_at),
            format_record_time(&record.created_at),
        );
    }
    info!("{}", "─".repeat(60));
}
