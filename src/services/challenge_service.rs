//! 验证码挑战服务 - 业务能力层
//!
//! 只负责"拿到一个可用的验证码挑战"能力，不关心流程

use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::clients::CourtClient;
use crate::error::{AppError, AppResult};
use crate::infrastructure::HttpExecutor;
use crate::models::challenge::ChallengeSession;
use crate::models::search::SearchParameters;

/// 验证码响应未携带有效期时采用的默认值（秒）
const DEFAULT_EXPIRES_IN: u64 = 600;

/// 验证码挑战服务
///
/// 职责：
/// - 签发 / 刷新验证码挑战
/// - 把响应 JSON 校验成 ChallengeSession
/// - 不出现 FlowState
/// - 不关心会话的新旧取舍（由流程层决定）
#[derive(Clone, Default)]
pub struct ChallengeService {
    client: CourtClient,
}

impl ChallengeService {
    /// 创建新的验证码挑战服务
    pub fn new() -> Self {
        Self {
            client: CourtClient::new(),
        }
    }

    /// 签发新的验证码挑战
    pub async fn issue(&self, http: &HttpExecutor) -> AppResult<ChallengeSession> {
        let result = self.client.issue_challenge(http).await?;
        self.parse_challenge(&result)
    }

    /// 携带查询参数刷新验证码挑战
    pub async fn refresh(
        &self,
        http: &HttpExecutor,
        params: &SearchParameters,
    ) -> AppResult<ChallengeSession> {
        let result = self.client.refresh_challenge(http, params).await?;
        self.parse_challenge(&result)
    }

    /// 把响应 JSON 校验成 ChallengeSession
    ///
    /// sessionId / captchaText / timestamp 三个字段缺一不可，
    /// expiresIn 缺失时按服务端约定的 600 秒兜底。
    fn parse_challenge(&self, result: &JsonValue) -> AppResult<ChallengeSession> {
        if !CourtClient::is_success_response(result) {
            let message =
                CourtClient::extract_error_message(result).unwrap_or("后端未返回错误说明");
            warn!("⚠️ 验证码签发失败: {}", message);
            return Err(AppError::captcha_unavailable(message));
        }

        let session_id = result
            .get("sessionId")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AppError::malformed_challenge("sessionId"))?;

        let text = result
            .get("captchaText")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AppError::malformed_challenge("captchaText"))?;

        let issued_at = result
            .get("timestamp")
            .and_then(|v| v.as_i64())
            .ok_or_else(|| AppError::malformed_challenge("timestamp"))?;

        let expires_in = result
            .get("expiresIn")
            .and_then(|v| v.as_u64())
            .unwrap_or(DEFAULT_EXPIRES_IN);

        debug!(
            "验证码挑战就绪: session={} 有效期={}秒",
            session_id, expires_in
        );

        Ok(ChallengeSession {
            session_id: session_id.to_string(),
            text: text.to_string(),
            issued_at,
            expires_in,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CaptchaError;
    use serde_json::json;

    #[test]
    fn test_parse_complete_challenge() {
        let service = ChallengeService::new();
        let payload = json!({
            "success": true,
            "captchaText": "XK4F9",
            "sessionId": "captcha_session_77aa",
            "timestamp": 1755760000,
            "expiresIn": 600
        });

        let session = service.parse_challenge(&payload).unwrap();
        assert_eq!(session.session_id, "captcha_session_77aa");
        assert_eq!(session.text, "XK4F9");
        assert_eq!(session.issued_at, 1755760000);
        assert_eq!(session.expires_in, 600);
        assert_eq!(session.expires_at(), 1755760600);
    }

    #[test]
    fn test_parse_challenge_defaults_expiry() {
        let service = ChallengeService::new();
        let payload = json!({
            "success": true,
            "captchaText": "ZZ9",
            "sessionId": "captcha_session_00",
            "timestamp": 100
        });

        let session = service.parse_challenge(&payload).unwrap();
        assert_eq!(session.expires_in, DEFAULT_EXPIRES_IN);
    }

    #[test]
    fn test_missing_session_id_rejected() {
        let service = ChallengeService::new();
        let payload = json!({
            "success": true,
            "captchaText": "AB12",
            "timestamp": 100
        });

        let err = service.parse_challenge(&payload).unwrap_err();
        assert!(matches!(
            err,
            AppError::Captcha(CaptchaError::MalformedChallenge {
                missing_field: "sessionId"
            })
        ));
    }

    #[test]
    fn test_missing_text_rejected() {
        let service = ChallengeService::new();
        let payload = json!({
            "success": true,
            "sessionId": "captcha_session_1",
            "timestamp": 100
        });

        let err = service.parse_challenge(&payload).unwrap_err();
        assert!(matches!(
            err,
            AppError::Captcha(CaptchaError::MalformedChallenge {
                missing_field: "captchaText"
            })
        ));
    }

    #[test]
    fn test_unsuccessful_payload_is_unavailable() {
        let service = ChallengeService::new();
        let payload = json!({
            "success": false,
            "error": "Failed to generate CAPTCHA: boom"
        });

        let err = service.parse_challenge(&payload).unwrap_err();
        assert!(matches!(
            err,
            AppError::Captcha(CaptchaError::ServiceUnavailable { .. })
        ));
    }
}
