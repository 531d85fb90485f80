//! HTTP 执行器 - 基础设施层
//!
//! 持有唯一的 HTTP 连接池资源，只暴露"发请求"的能力

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};

/// HTTP 执行器
///
/// 职责：
/// - 持有唯一的 reqwest::Client 资源
/// - 暴露 get_json() / post_json() 能力
/// - 不认识 ChallengeSession / SearchParameters
/// - 不处理业务流程
///
/// reqwest::Client 内部使用 Arc 管理连接池，clone 开销很小。
#[derive(Clone)]
pub struct HttpExecutor {
    client: reqwest::Client,
    base_url: String,
}

impl HttpExecutor {
    /// 创建新的 HTTP 执行器
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 获取 API 基础地址
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 发送 GET 请求并返回 JSON 结果
    ///
    /// # 参数
    /// - `path`: 接口路径（相对于 base_url）
    ///
    /// # 返回
    /// 返回 JSON 值
    pub async fn get_json(&self, path: &str) -> AppResult<JsonValue> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::decode_body(path, response).await
    }

    /// 发送 GET 请求并反序列化为指定类型
    ///
    /// # 参数
    /// - `path`: 接口路径（相对于 base_url）
    ///
    /// # 返回
    /// 返回反序列化后的类型
    pub async fn get_json_as<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let json_value = self.get_json(path).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 发送 POST 请求并返回 JSON 结果
    ///
    /// # 参数
    /// - `path`: 接口路径（相对于 base_url）
    /// - `payload`: JSON 请求体
    ///
    /// # 返回
    /// 返回 JSON 值
    pub async fn post_json(&self, path: &str, payload: &JsonValue) -> AppResult<JsonValue> {
        let response = self
            .client
            .post(self.url(path))
            .json(payload)
            .send()
            .await?;
        Self::decode_body(path, response).await
    }

    /// 发送 GET 请求并返回原始响应（用于流式下载）
    ///
    /// # 参数
    /// - `path_or_url`: 接口路径或完整 URL
    ///
    /// # 返回
    /// 返回 reqwest::Response，调用方自行消费字节流
    pub async fn get_response(&self, path_or_url: &str) -> AppResult<reqwest::Response> {
        let url = if path_or_url.starts_with("http") {
            path_or_url.to_string()
        } else {
            self.url(path_or_url)
        };

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Api(ApiError::BadResponse {
                endpoint: path_or_url.to_string(),
                status: Some(status.as_u16()),
                message: None,
            }));
        }
        Ok(response)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 无论 HTTP 状态码如何都解析 JSON 响应体
    ///
    /// 后端把业务结论放在 4xx 的响应体里（例如验证码错误返回 400 +
    /// JSON），状态码本身不携带结论。只有在响应体不是 JSON 时才视为
    /// 传输层错误。
    async fn decode_body(endpoint: &str, response: reqwest::Response) -> AppResult<JsonValue> {
        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::Api(ApiError::RateLimited {
                endpoint: endpoint.to_string(),
            }));
        }

        let bytes = response.bytes().await?;
        match serde_json::from_slice::<JsonValue>(&bytes) {
            Ok(value) => Ok(value),
            Err(e) if status.is_success() => Err(AppError::Api(ApiError::JsonParseFailed {
                source: Box::new(e),
            })),
            Err(_) => Err(AppError::Api(ApiError::BadResponse {
                endpoint: endpoint.to_string(),
                status: Some(status.as_u16()),
                message: None,
            })),
        }
    }
}
