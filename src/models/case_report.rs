//! 案件报告模型
//!
//! 查询成功后从状态接口拉取的完整案件信息。

use serde::{Deserialize, Serialize};

use crate::models::history::{deserialize_filing_year, QueryStatus};

/// 案件查询报告
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseReport {
    pub id: u64,
    pub status: QueryStatus,
    pub case_type: String,
    pub case_number: String,
    #[serde(deserialize_with = "deserialize_filing_year")]
    pub filing_year: String,
    pub court: String,
    pub created_at: String,
    #[serde(default)]
    pub completed_at: Option<String>,
    /// 查询失败时的错误说明
    #[serde(default)]
    pub error: Option<String>,
    /// 查询成功时的案件详情
    #[serde(default)]
    pub case_detail: Option<CaseDetail>,
    #[serde(default)]
    pub documents: Vec<CaseDocument>,
}

/// 案件详情
///
/// 验证码提交成功的响应和状态接口都会携带这一结构，
/// 前者没有数据库 id，后者没有 caseNature，全部按可缺省解析。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseDetail {
    #[serde(default)]
    pub id: Option<u64>,
    pub case_number: String,
    pub case_type: String,
    #[serde(default)]
    pub filing_date: Option<String>,
    pub court: String,
    #[serde(default)]
    pub judge: Option<String>,
    #[serde(default)]
    pub petitioner: Option<String>,
    #[serde(default)]
    pub respondent: Option<String>,
    #[serde(default)]
    pub current_status: Option<String>,
    #[serde(default)]
    pub case_nature: Option<String>,
    #[serde(default)]
    pub last_update: Option<String>,
    #[serde(default)]
    pub proceedings: Vec<Proceeding>,
}

/// 案件进程条目
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proceeding {
    pub date: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// filing / proceeding / hearing / status
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// 案件文书
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseDocument {
    #[serde(default)]
    pub id: Option<u64>,
    pub title: String,
    pub document_type: String,
    #[serde(default)]
    pub filed_date: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub is_available: bool,
    /// 字节数
    #[serde(default)]
    pub file_size: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_successful_report() {
        let json = r#"{
            "id": 42,
            "status": "success",
            "caseType": "writ",
            "caseNumber": "WP-2024-100",
            "filingYear": "2024",
            "court": "high-court",
            "createdAt": "2026-08-21T10:30:00",
            "completedAt": "2026-08-21T10:30:04",
            "caseDetail": {
                "id": 11,
                "caseNumber": "WP-2024-100",
                "caseType": "writ",
                "filingDate": "15/01/2024",
                "court": "Delhi High Court",
                "judge": "Hon'ble Justice A. Sharma",
                "petitioner": "M/s Acme Industries",
                "respondent": "Union of India",
                "currentStatus": "Arguments in progress",
                "lastUpdate": "01/08/2025",
                "proceedings": [
                    {"date": "15/01/2024", "title": "Case Filed", "description": "Petition filed and registered", "type": "filing"}
                ]
            },
            "documents": [
                {"id": 1, "title": "Original Petition", "documentType": "petition", "filedDate": "15/01/2024", "downloadUrl": "/api/documents/1/download", "isAvailable": true, "fileSize": 245760}
            ]
        }"#;

        let report: CaseReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.status, QueryStatus::Success);
        let detail = report.case_detail.unwrap();
        assert_eq!(detail.proceedings.len(), 1);
        assert_eq!(detail.proceedings[0].kind.as_deref(), Some("filing"));
        assert_eq!(report.documents.len(), 1);
        assert!(report.documents[0].is_available);
        assert_eq!(report.documents[0].file_size, Some(245760));
    }

    #[test]
    fn test_parse_failed_report_without_detail() {
        let json = r#"{
            "id": 43,
            "status": "failed",
            "caseType": "civil",
            "caseNumber": "CS-2020-1",
            "filingYear": 2020,
            "court": "high-court",
            "createdAt": "2026-08-21T11:00:00",
            "completedAt": null,
            "error": "No case found with the provided details"
        }"#;

        let report: CaseReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.status, QueryStatus::Failed);
        assert!(report.case_detail.is_none());
        assert!(report.documents.is_empty());
        assert_eq!(
            report.error.as_deref(),
            Some("No case found with the provided details")
        );
    }

    #[test]
    fn test_parse_submit_response_detail_without_id() {
        // 提交成功的响应里 caseDetail 直接来自检索层，带 caseNature 不带 id
        let json = r#"{
            "caseNumber": "CRL-2023-5",
            "caseType": "criminal",
            "court": "Delhi High Court",
            "caseNature": "Criminal Appeal",
            "proceedings": []
        }"#;

        let detail: CaseDetail = serde_json::from_str(json).unwrap();
        assert!(detail.id.is_none());
        assert_eq!(detail.case_nature.as_deref(), Some("Criminal Appeal"));
    }
}
