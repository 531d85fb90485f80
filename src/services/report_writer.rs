//! 失败报告服务 - 业务能力层
//!
//! 只负责"写 failed_lookups.txt"能力，不关心流程

use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

use crate::models::search::SearchParameters;

/// 失败报告服务
///
/// 职责：
/// - 把未能完成的查询追加到报告文件
/// - 只处理单条查询
/// - 不出现 Vec<LookupRequest>
/// - 不关心流程顺序
pub struct ReportWriter {
    report_file_path: String,
}

impl ReportWriter {
    /// 创建新的失败报告服务
    pub fn new() -> Self {
        Self {
            report_file_path: "failed_lookups.txt".to_string(),
        }
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            report_file_path: path.into(),
        }
    }

    /// 写入一条失败记录
    ///
    /// # 参数
    /// - `source`: 请求来源（TOML 文件名）
    /// - `params`: 查询参数
    /// - `reason`: 失败原因
    ///
    /// # 返回
    /// 返回是否成功写入
    pub async fn write(&self, source: &str, params: &SearchParameters, reason: &str) -> Result<()> {
        debug!("写入失败报告: {} | {} | {}", source, params, reason);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.report_file_path)?;

        let report_msg = format!("文件 {} | 查询 {} | 原因: {}\n", source, params, reason);

        file.write_all(report_msg.as_bytes())?;

        Ok(())
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}
