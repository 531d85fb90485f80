//! 查询历史模型
//!
//! 只读模型：历史记录由后端生成，客户端只负责解析与展示。

use phf::phf_map;
use serde::{Deserialize, Serialize};

/// 查询状态显示名称表（与页面展示保持一致）
static STATUS_NAMES: phf::Map<&'static str, &'static str> = phf_map! {
    "pending" => "Processing",
    "success" => "Completed",
    "failed" => "Failed",
};

/// 查询状态的显示名称，未知状态原样返回
pub fn status_display_name(status: &str) -> &str {
    STATUS_NAMES.get(status).copied().unwrap_or(status)
}

/// 查询状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    /// 处理中
    Pending,
    /// 已完成
    Success,
    /// 失败
    Failed,
    /// 后端新增的未知状态
    #[serde(other)]
    Unknown,
}

impl QueryStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryStatus::Pending => "pending",
            QueryStatus::Success => "success",
            QueryStatus::Failed => "failed",
            QueryStatus::Unknown => "unknown",
        }
    }

    /// 获取显示名称
    pub fn display_name(self) -> &'static str {
        match STATUS_NAMES.get(self.as_str()) {
            Some(name) => name,
            None => self.as_str(),
        }
    }
}

/// 一条查询历史记录
///
/// 类型与法院字段保持字符串形式：历史中可能出现当前客户端
/// 不认识的取值，展示时查表并原样兜底。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: u64,
    pub case_type: String,
    pub case_number: String,
    /// 后端以字符串存储，早期记录可能是数字
    #[serde(deserialize_with = "deserialize_filing_year")]
    pub filing_year: String,
    pub court: String,
    pub status: QueryStatus,
    /// ISO 8601 时间串
    pub created_at: String,
    #[serde(default)]
    pub completed_at: Option<String>,
}

// Helper function to deserialize filing year as either string or integer
pub(crate) fn deserialize_filing_year<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct YearVisitor;

    impl<'de> Visitor<'de> for YearVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer representing a filing year")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(YearVisitor)
}

/// 把 ISO 8601 时间串格式化为 "21 Aug 2026" 样式，解析失败时原样返回
pub fn format_record_date(iso: &str) -> String {
    match iso.parse::<chrono::NaiveDateTime>() {
        Ok(dt) => dt.format("%d %b %Y").to_string(),
        Err(_) => iso.to_string(),
    }
}

/// 把 ISO 8601 时间串格式化为 "14:05" 样式，解析失败时返回空串
pub fn format_record_time(iso: &str) -> String {
    match iso.parse::<chrono::NaiveDateTime>() {
        Ok(dt) => dt.format("%H:%M").to_string(),
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_history_record_string_year() {
        let json = r#"{
            "id": 7,
            "caseType": "writ",
            "caseNumber": "WP-2024-100",
            "filingYear": "2024",
            "court": "high-court",
            "status": "success",
            "createdAt": "2026-08-21T10:30:00.123456",
            "completedAt": "2026-08-21T10:30:05.000000"
        }"#;

        let record: HistoryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.filing_year, "2024");
        assert_eq!(record.status, QueryStatus::Success);
        assert_eq!(record.completed_at.as_deref(), Some("2026-08-21T10:30:05.000000"));
    }

    #[test]
    fn test_parse_history_record_integer_year() {
        let json = r#"{
            "id": 3,
            "caseType": "civil",
            "caseNumber": "CS-2022-55",
            "filingYear": 2022,
            "court": "district-court",
            "status": "pending",
            "createdAt": "2026-08-21T09:00:00"
        }"#;

        let record: HistoryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.filing_year, "2022");
        assert_eq!(record.status, QueryStatus::Pending);
        assert!(record.completed_at.is_none());
    }

    #[test]
    fn test_unknown_status_does_not_break_parsing() {
        let json = r#"{
            "id": 9,
            "caseType": "appeal",
            "caseNumber": "AP-2023-9",
            "filingYear": "2023",
            "court": "high-court",
            "status": "archived",
            "createdAt": "2026-08-20T23:59:59"
        }"#;

        let record: HistoryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, QueryStatus::Unknown);
    }

    #[test]
    fn test_status_display_names() {
        assert_eq!(QueryStatus::Pending.display_name(), "Processing");
        assert_eq!(QueryStatus::Success.display_name(), "Completed");
        assert_eq!(QueryStatus::Failed.display_name(), "Failed");
        assert_eq!(status_display_name("archived"), "archived");
    }

    #[test]
    fn test_format_record_date() {
        assert_eq!(format_record_date("2026-08-21T10:30:00.123456"), "21 Aug 2026");
        assert_eq!(format_record_time("2026-08-21T10:30:00"), "10:30");
        // 解析失败时原样返回
        assert_eq!(format_record_date("n/a"), "n/a");
        assert_eq!(format_record_time("n/a"), "");
    }
}
