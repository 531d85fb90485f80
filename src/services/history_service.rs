//! 查询历史服务 - 业务能力层
//!
//! 只负责"拉取/导出查询历史"能力，不关心流程

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use futures::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::clients::CourtClient;
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::infrastructure::HttpExecutor;
use crate::models::history::HistoryRecord;

/// 查询历史服务
///
/// 职责：
/// - 按配置的过滤器拉取历史记录
/// - 把历史导出成 CSV 文件
/// - 不出现 FlowState / SubmissionOutcome
#[derive(Clone)]
pub struct HistoryService {
    client: CourtClient,
    filter: String,
    limit: usize,
}

impl HistoryService {
    /// 创建新的查询历史服务
    pub fn new(config: &Config) -> Self {
        Self {
            client: CourtClient::new(),
            filter: config.history_filter.clone(),
            limit: config.history_limit,
        }
    }

    /// 拉取查询历史
    pub async fn fetch(&self, http: &HttpExecutor) -> AppResult<Vec<HistoryRecord>> {
        let value = self
            .client
            .fetch_history(http, &self.filter, self.limit)
            .await?;

        // 历史接口正常时返回数组，异常时返回 {"error": ...}
        if let Some(message) = CourtClient::extract_error_message(&value) {
            return Err(AppError::Api(ApiError::BadResponse {
                endpoint: CourtClient::HISTORY_PATH.to_string(),
                status: None,
                message: Some(message.to_string()),
            }));
        }

        let records: Vec<HistoryRecord> = serde_json::from_value(value)?;
        debug!("拉取到 {} 条历史记录", records.len());
        Ok(records)
    }

    /// 导出查询历史 CSV
    ///
    /// 文件名与页面下载保持一致：case_history_<filter>_<YYYY-MM-DD>.csv
    pub async fn export(&self, http: &HttpExecutor) -> AppResult<PathBuf> {
        let file_name = export_file_name(&self.filter, Local::now().date_naive());
        let path = PathBuf::from(&file_name);

        let response = self.client.export_history(http, &self.filter).await?;

        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| AppError::file_write_failed(file_name.as_str(), e))?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)
                .await
                .map_err(|e| AppError::file_write_failed(file_name.as_str(), e))?;
        }
        file.flush()
            .await
            .map_err(|e| AppError::file_write_failed(file_name.as_str(), e))?;

        info!("✅ 历史导出完成: {}", file_name);
        Ok(path)
    }
}

fn export_file_name(filter: &str, date: NaiveDate) -> String {
    format!("case_history_{}_{}.csv", filter, date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(
            export_file_name("all", date),
            "case_history_all_2024-01-15.csv"
        );
        assert_eq!(
            export_file_name("success", date),
            "case_history_success_2024-01-15.csv"
        );
    }
}
