//! 案件报告服务 - 业务能力层
//!
//! 只负责"拉取案件报告 / 下载文书"能力，不关心流程

use std::path::Path;

use futures::StreamExt;
use regex::Regex;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::clients::CourtClient;
use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::infrastructure::HttpExecutor;
use crate::models::case_report::CaseReport;

/// 案件报告服务
///
/// 职责：
/// - 按 queryId 拉取完整案件报告
/// - 把可用的案件文书下载到本地
/// - 只处理单条查询的结果
/// - 不出现 FlowState / SubmissionOutcome
#[derive(Clone)]
pub struct CaseService {
    client: CourtClient,
    documents_folder: String,
}

impl CaseService {
    /// 创建新的案件报告服务
    pub fn new(config: &Config) -> Self {
        Self {
            client: CourtClient::new(),
            documents_folder: config.documents_folder.clone(),
        }
    }

    /// 拉取案件报告
    ///
    /// # 参数
    /// - `http`: HTTP 执行器
    /// - `query_id`: 提交成功时后端返回的查询 ID
    pub async fn fetch_report(&self, http: &HttpExecutor, query_id: u64) -> AppResult<CaseReport> {
        let value = self.client.fetch_query(http, query_id).await?;

        if let Some(message) = CourtClient::extract_error_message(&value) {
            return Err(AppError::Api(ApiError::BadResponse {
                endpoint: format!("/api/cases/query/{}", query_id),
                status: None,
                message: Some(message.to_string()),
            }));
        }

        let report: CaseReport = serde_json::from_value(value)?;
        debug!(
            "案件报告就绪: query={} 文书 {} 份",
            query_id,
            report.documents.len()
        );
        Ok(report)
    }

    /// 下载报告中所有可用的文书
    ///
    /// 单份文书失败只记录警告并继续，返回成功下载的份数。
    pub async fn download_documents(
        &self,
        http: &HttpExecutor,
        report: &CaseReport,
    ) -> AppResult<usize> {
        if report.documents.is_empty() {
            return Ok(0);
        }

        fs::create_dir_all(&self.documents_folder)
            .await
            .map_err(|e| AppError::file_write_failed(self.documents_folder.as_str(), e))?;

        let mut downloaded = 0;
        for doc in &report.documents {
            if !doc.is_available {
                debug!("跳过不可用文书: {}", doc.title);
                continue;
            }

            let url = match doc.download_url.as_deref() {
                Some(u) => u,
                None => {
                    debug!("文书缺少下载地址: {}", doc.title);
                    continue;
                }
            };

            let file_name = format!("{}.pdf", sanitize_title(&doc.title)?);
            let path = Path::new(&self.documents_folder).join(&file_name);

            match self.download_one(http, url, &path).await {
                Ok(()) => {
                    downloaded += 1;
                    info!("📦 已下载文书: {}", file_name);
                }
                Err(e) => {
                    warn!("⚠️ 文书下载失败 ({}): {}", doc.title, e);
                }
            }
        }

        Ok(downloaded)
    }

    /// 下载单份文书到指定路径
    async fn download_one(
        &self,
        http: &HttpExecutor,
        download_url: &str,
        path: &Path,
    ) -> AppResult<()> {
        let response = self.client.download_document(http, download_url).await?;

        let path_text = path.to_string_lossy().to_string();
        let mut file = fs::File::create(path)
            .await
            .map_err(|e| AppError::file_write_failed(path_text.as_str(), e))?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)
                .await
                .map_err(|e| AppError::file_write_failed(path_text.as_str(), e))?;
        }
        file.flush()
            .await
            .map_err(|e| AppError::file_write_failed(path_text.as_str(), e))?;

        Ok(())
    }
}

/// 把文书标题整理成安全的文件名（非字母数字一律替换为下划线）
fn sanitize_title(title: &str) -> AppResult<String> {
    let re = Regex::new(r"[^A-Za-z0-9]").map_err(|e| AppError::Other(e.to_string()))?;
    Ok(re.replace_all(title, "_").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("Original Petition").unwrap(), "Original_Petition");
        assert_eq!(
            sanitize_title("Order Sheet (15/01/2024)").unwrap(),
            "Order_Sheet__15_01_2024_"
        );
        assert_eq!(sanitize_title("report2024").unwrap(), "report2024");
    }
}
