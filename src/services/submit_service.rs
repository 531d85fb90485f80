//! 验证码提交服务 - 业务能力层
//!
//! 只负责"提交一次候选答案并解读结论"能力，不关心流程

use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use crate::clients::CourtClient;
use crate::error::AppResult;
use crate::infrastructure::HttpExecutor;
use crate::models::challenge::ChallengeSession;
use crate::models::search::SearchParameters;

/// 后端对一次提交的结论
///
/// 同一个接口同一份响应体，三种互斥结论。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitVerdict {
    /// 验证码通过，检索已受理
    Accepted { query_id: u64 },
    /// 验证码不符，换新验证码后可以重试
    CaptchaMismatch { message: String },
    /// 验证码通过但检索层失败，重试无意义
    Rejected { message: String },
}

/// 验证码提交服务
///
/// 职责：
/// - 把 (会话, 参数, 答案) 发给后端
/// - 把响应体解读成 SubmitVerdict
/// - 不出现 FlowState
/// - 不做本地校验（由流程层在提交前完成）
#[derive(Clone, Default)]
pub struct SubmitService {
    client: CourtClient,
}

impl SubmitService {
    /// 创建新的验证码提交服务
    pub fn new() -> Self {
        Self {
            client: CourtClient::new(),
        }
    }

    /// 提交一次候选答案
    ///
    /// 恰好发出一次网络请求。传输层失败原样向上传递，
    /// 由流程层折算成 NetworkError 结果。
    pub async fn submit(
        &self,
        http: &HttpExecutor,
        session: &ChallengeSession,
        params: &SearchParameters,
        solution: &str,
    ) -> AppResult<SubmitVerdict> {
        debug!(
            "提交候选答案: session={} 查询={}",
            session.session_id, params
        );

        let result = self
            .client
            .submit_candidate(http, session, params, solution)
            .await?;

        let verdict = Self::interpret_verdict(&result);
        match &verdict {
            SubmitVerdict::Accepted { query_id } => {
                info!("✅ 验证码通过, 检索已受理 (queryId={})", query_id);
            }
            SubmitVerdict::CaptchaMismatch { message } => {
                warn!("⚠️ 验证码不符: {}", message);
            }
            SubmitVerdict::Rejected { message } => {
                warn!("❌ 检索层拒绝: {}", message);
            }
        }

        Ok(verdict)
    }

    /// 解读后端响应体（纯函数，便于单测）
    ///
    /// 判定顺序与页面逻辑一致：先看 requiresNewCaptcha，
    /// 再看 success，其余一律按检索层失败处理。
    pub fn interpret_verdict(result: &JsonValue) -> SubmitVerdict {
        if CourtClient::requires_new_captcha(result) {
            let message = CourtClient::extract_error_message(result)
                .unwrap_or("CAPTCHA verification failed")
                .to_string();
            return SubmitVerdict::CaptchaMismatch { message };
        }

        if CourtClient::is_success_response(result) {
            if let Some(query_id) = CourtClient::extract_query_id(result) {
                return SubmitVerdict::Accepted { query_id };
            }
            // success 却没有 queryId，没有可跟进的查询，按失败处理
            warn!("API 返回 success 但缺少 queryId: {}", result);
        }

        let message = CourtClient::extract_error_message(result)
            .unwrap_or("Unable to process your search request")
            .to_string();
        SubmitVerdict::Rejected { message }
    }
}
