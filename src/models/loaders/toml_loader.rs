//! 查询请求文件加载器
//!
//! 每个 TOML 文件描述一条待处理的案件查询。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::models::search::{CaseType, Court, SearchParameters};

/// 一条待处理的查询请求
///
/// TOML 示例：
///
/// ```toml
/// case_type = "writ"
/// case_number = "WP-2024-100"
/// filing_year = 2024
/// court = "high-court"   # 可省略，默认 high-court
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupRequest {
    pub case_type: CaseType,
    pub case_number: String,
    pub filing_year: i32,
    #[serde(default = "default_court")]
    pub court: Court,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

fn default_court() -> Court {
    Court::HighCourt
}

impl LookupRequest {
    /// 转换为查询参数
    pub fn to_parameters(&self) -> SearchParameters {
        SearchParameters {
            case_type: self.case_type,
            case_number: self.case_number.trim().to_string(),
            filing_year: self.filing_year,
            court: self.court,
        }
    }
}

/// 从 TOML 文件加载一条查询请求
pub async fn load_lookup_request(toml_file_path: &Path) -> Result<LookupRequest> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    let mut request: LookupRequest = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))?;

    // 设置文件路径
    request.file_path = Some(toml_file_path.to_string_lossy().to_string());

    Ok(request)
}

/// 从文件夹中加载所有查询请求
///
/// 单个文件解析失败只记录警告并跳过，不中断整批加载。
pub async fn load_all_lookup_requests(folder_path: &str) -> Result<Vec<LookupRequest>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut requests = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            tracing::info!(
                "正在加载: {}",
                path.file_name().unwrap_or_default().to_string_lossy()
            );

            match load_lookup_request(&path).await {
                Ok(request) => {
                    tracing::info!("成功加载查询: {}", request.to_parameters());
                    requests.push(request);
                }
                Err(e) => {
                    tracing::warn!("加载文件失败 {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request_with_default_court() {
        let toml_str = r#"
            case_type = "criminal"
            case_number = "CRL-2023-042"
            filing_year = 2023
        "#;

        let request: LookupRequest = toml::from_str(toml_str).unwrap();
        assert_eq!(request.case_type, CaseType::Criminal);
        assert_eq!(request.court, Court::HighCourt);
        assert_eq!(request.filing_year, 2023);
    }

    #[test]
    fn test_parse_request_with_explicit_court() {
        let toml_str = r#"
            case_type = "civil"
            case_number = "CS-2024-7"
            filing_year = 2024
            court = "district-court"
        "#;

        let request: LookupRequest = toml::from_str(toml_str).unwrap();
        assert_eq!(request.court, Court::DistrictCourt);
    }

    #[test]
    fn test_unknown_case_type_fails() {
        let toml_str = r#"
            case_type = "maritime"
            case_number = "M-1"
            filing_year = 2024
        "#;

        assert!(toml::from_str::<LookupRequest>(toml_str).is_err());
    }

    #[test]
    fn test_to_parameters_trims_case_number() {
        let toml_str = r#"
            case_type = "appeal"
            case_number = "  AP-2022-9  "
            filing_year = 2022
        "#;

        let request: LookupRequest = toml::from_str(toml_str).unwrap();
        assert_eq!(request.to_parameters().case_number, "AP-2022-9");
    }
}
