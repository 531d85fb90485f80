/// 法院查询 API 客户端
///
/// 封装所有与法院查询后端相关的调用逻辑：接口路径、请求体构造
/// 和响应判定。不持有连接，所有方法按次借用 HttpExecutor。
use crate::infrastructure::HttpExecutor;
use crate::error::AppResult;
use crate::models::challenge::ChallengeSession;
use crate::models::search::SearchParameters;
use serde_json::{json, Value};
use tracing::debug;

/// 法院查询 API 客户端
#[derive(Clone, Default)]
pub struct CourtClient;

impl CourtClient {
    /// 验证码签发接口
    pub const CAPTCHA_PATH: &'static str = "/api/captcha";
    /// 验证码刷新接口
    pub const REFRESH_CAPTCHA_PATH: &'static str = "/api/cases/refresh-captcha";
    /// 验证码提交接口
    pub const CAPTCHA_SUBMIT_PATH: &'static str = "/api/cases/captcha-submit";
    /// 查询历史接口
    pub const HISTORY_PATH: &'static str = "/api/cases/history";
    /// 查询历史导出接口
    pub const HISTORY_EXPORT_PATH: &'static str = "/api/cases/history/export";

    /// 创建新的法院查询客户端
    pub fn new() -> Self {
        Self
    }

    /// 签发新的验证码挑战
    ///
    /// # 参数
    /// - `http`: HTTP 执行器
    ///
    /// # 返回
    /// 返回完整的响应 JSON
    pub async fn issue_challenge(&self, http: &HttpExecutor) -> AppResult<Value> {
        let result = http.get_json(Self::CAPTCHA_PATH).await?;
        debug!("验证码签发结果: {}", result);
        Ok(result)
    }

    /// 携带查询参数刷新验证码挑战
    ///
    /// # 参数
    /// - `http`: HTTP 执行器
    /// - `params`: 当前查询参数
    ///
    /// # 返回
    /// 返回完整的响应 JSON
    pub async fn refresh_challenge(
        &self,
        http: &HttpExecutor,
        params: &SearchParameters,
    ) -> AppResult<Value> {
        let payload = Self::build_refresh_payload(params);

        debug!("刷新验证码 Payload: {}", payload);

        let result = http.post_json(Self::REFRESH_CAPTCHA_PATH, &payload).await?;

        debug!("刷新验证码结果: {}", result);

        Ok(result)
    }

    /// 提交验证码答案与查询参数
    ///
    /// # 参数
    /// - `http`: HTTP 执行器
    /// - `session`: 当前验证码会话
    /// - `params`: 查询参数
    /// - `solution`: 操作员输入的验证码答案
    ///
    /// # 返回
    /// 返回完整的响应 JSON（结论在响应体里，调用方自行判定）
    pub async fn submit_candidate(
        &self,
        http: &HttpExecutor,
        session: &ChallengeSession,
        params: &SearchParameters,
        solution: &str,
    ) -> AppResult<Value> {
        let payload = Self::build_submit_payload(session, params, solution);

        debug!("提交验证码 Payload: {}", payload);

        let result = http.post_json(Self::CAPTCHA_SUBMIT_PATH, &payload).await?;

        debug!("提交验证码结果: {}", result);

        Ok(result)
    }

    /// 拉取查询历史
    ///
    /// # 参数
    /// - `http`: HTTP 执行器
    /// - `filter`: 时间过滤器（24h / 7d / 30d / all）
    /// - `limit`: 拉取条数
    pub async fn fetch_history(
        &self,
        http: &HttpExecutor,
        filter: &str,
        limit: usize,
    ) -> AppResult<Value> {
        let path = format!("{}?filter={}&limit={}", Self::HISTORY_PATH, filter, limit);
        http.get_json(&path).await
    }

    /// 拉取单条查询的状态与结果
    pub async fn fetch_query(&self, http: &HttpExecutor, query_id: u64) -> AppResult<Value> {
        let path = format!("/api/cases/query/{}", query_id);
        http.get_json(&path).await
    }

    /// 下载查询历史 CSV 导出（流式响应）
    pub async fn export_history(
        &self,
        http: &HttpExecutor,
        filter: &str,
    ) -> AppResult<reqwest::Response> {
        let path = format!("{}?filter={}", Self::HISTORY_EXPORT_PATH, filter);
        http.get_response(&path).await
    }

    /// 下载案件文书（流式响应）
    pub async fn download_document(
        &self,
        http: &HttpExecutor,
        download_url: &str,
    ) -> AppResult<reqwest::Response> {
        http.get_response(download_url).await
    }

    /// 构建验证码提交请求体
    fn build_submit_payload(
        session: &ChallengeSession,
        params: &SearchParameters,
        solution: &str,
    ) -> Value {
        json!({
            "captchaSolution": solution,
            "formData": {
                "sessionId": session.session_id,
                "timestamp": session.issued_at,
                "captchaToken": format!("token_{}", session.issued_at),
            },
            "originalParams": {
                "caseType": params.case_type.as_str(),
                "caseNumber": params.case_number,
                "filingYear": params.filing_year.to_string(),
                "court": params.court.as_str(),
            }
        })
    }

    /// 构建验证码刷新请求体
    fn build_refresh_payload(params: &SearchParameters) -> Value {
        json!({
            "searchParams": {
                "caseType": params.case_type.as_str(),
                "caseNumber": params.case_number,
                "filingYear": params.filing_year.to_string(),
                "court": params.court.as_str(),
            }
        })
    }

    /// 检查 API 响应是否成功
    pub fn is_success_response(result: &Value) -> bool {
        result
            .get("success")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    /// 检查是否要求更换验证码
    pub fn requires_new_captcha(result: &Value) -> bool {
        result
            .get("requiresNewCaptcha")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    /// 提取错误说明
    pub fn extract_error_message(result: &Value) -> Option<&str> {
        result.get("error").and_then(|v| v.as_str())
    }

    /// 提取查询 ID
    pub fn extract_query_id(result: &Value) -> Option<u64> {
        result.get("queryId").and_then(|v| v.as_u64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::search::{CaseType, Court};

    fn test_session() -> ChallengeSession {
        ChallengeSession {
            session_id: "captcha_session_abc123".to_string(),
            text: "AB12C".to_string(),
            issued_at: 1755760000,
            expires_in: 600,
        }
    }

    fn test_params() -> SearchParameters {
        SearchParameters {
            case_type: CaseType::Writ,
            case_number: "WP-2024-100".to_string(),
            filing_year: 2024,
            court: Court::HighCourt,
        }
    }

    #[test]
    fn test_build_submit_payload() {
        let payload = CourtClient::build_submit_payload(&test_session(), &test_params(), "ab12c");

        assert_eq!(payload["captchaSolution"], "ab12c");
        assert_eq!(payload["formData"]["sessionId"], "captcha_session_abc123");
        assert_eq!(payload["formData"]["timestamp"], 1755760000_i64);
        assert_eq!(payload["formData"]["captchaToken"], "token_1755760000");
        assert_eq!(payload["originalParams"]["caseType"], "writ");
        // 后端按字符串存储立案年份
        assert_eq!(payload["originalParams"]["filingYear"], "2024");
        assert_eq!(payload["originalParams"]["court"], "high-court");
    }

    #[test]
    fn test_build_refresh_payload() {
        let payload = CourtClient::build_refresh_payload(&test_params());

        assert_eq!(payload["searchParams"]["caseNumber"], "WP-2024-100");
        assert_eq!(payload["searchParams"]["filingYear"], "2024");
    }

    #[test]
    fn test_response_predicates() {
        let ok = serde_json::json!({"success": true, "queryId": 42});
        assert!(CourtClient::is_success_response(&ok));
        assert!(!CourtClient::requires_new_captcha(&ok));
        assert_eq!(CourtClient::extract_query_id(&ok), Some(42));

        let mismatch = serde_json::json!({
            "success": false,
            "requiresNewCaptcha": true,
            "error": "Invalid CAPTCHA. Please try again with the new code."
        });
        assert!(!CourtClient::is_success_response(&mismatch));
        assert!(CourtClient::requires_new_captcha(&mismatch));
        assert_eq!(
            CourtClient::extract_error_message(&mismatch),
            Some("Invalid CAPTCHA. Please try again with the new code.")
        );

        let empty = serde_json::json!({});
        assert!(!CourtClient::is_success_response(&empty));
        assert!(!CourtClient::requires_new_captcha(&empty));
        assert_eq!(CourtClient::extract_query_id(&empty), None);
    }
}
