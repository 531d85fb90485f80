//! 查询参数模型
//!
//! 定义一次案件查询的不可变参数，以及提交前的本地校验规则。

use std::fmt;
use std::str::FromStr;

use chrono::Datelike;
use phf::phf_map;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, ValidationError};

/// 案件编号最大长度（与后端数据库字段一致）
pub const MAX_CASE_NUMBER_LEN: usize = 100;

/// 立案年份允许回溯的年数
pub const FILING_YEAR_SPAN: i32 = 20;

/// 案件类型显示名称表（与页面展示保持一致）
static CASE_TYPE_NAMES: phf::Map<&'static str, &'static str> = phf_map! {
    "civil" => "Civil Case",
    "criminal" => "Criminal Case",
    "writ" => "Writ Petition",
    "appeal" => "Appeal",
    "revision" => "Revision",
    "execution" => "Execution",
};

/// 法院显示名称表
static COURT_NAMES: phf::Map<&'static str, &'static str> = phf_map! {
    "high-court" => "High Court",
    "district-court" => "District Court",
};

/// 查询案件类型的显示名称，未知类型原样返回
pub fn case_type_display_name(case_type: &str) -> &str {
    CASE_TYPE_NAMES.get(case_type).copied().unwrap_or(case_type)
}

/// 查询法院的显示名称，未知法院原样返回
pub fn court_display_name(court: &str) -> &str {
    COURT_NAMES.get(court).copied().unwrap_or(court)
}

/// 无法识别的案件类型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("无法识别的案件类型: {0}")]
pub struct ParseCaseTypeError(pub String);

/// 无法识别的法院
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("无法识别的法院: {0}")]
pub struct ParseCourtError(pub String);

/// 案件类型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseType {
    /// 民事案件
    Civil,
    /// 刑事案件
    Criminal,
    /// 令状申请
    Writ,
    /// 上诉
    Appeal,
    /// 再审
    Revision,
    /// 执行
    Execution,
}

impl CaseType {
    /// 获取接口使用的编码值
    pub fn as_str(self) -> &'static str {
        match self {
            CaseType::Civil => "civil",
            CaseType::Criminal => "criminal",
            CaseType::Writ => "writ",
            CaseType::Appeal => "appeal",
            CaseType::Revision => "revision",
            CaseType::Execution => "execution",
        }
    }

    /// 获取显示名称
    pub fn display_name(self) -> &'static str {
        match CASE_TYPE_NAMES.get(self.as_str()) {
            Some(name) => name,
            None => self.as_str(),
        }
    }
}

impl FromStr for CaseType {
    type Err = ParseCaseTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "civil" => Ok(CaseType::Civil),
            "criminal" => Ok(CaseType::Criminal),
            "writ" => Ok(CaseType::Writ),
            "appeal" => Ok(CaseType::Appeal),
            "revision" => Ok(CaseType::Revision),
            "execution" => Ok(CaseType::Execution),
            _ => Err(ParseCaseTypeError(s.to_string())),
        }
    }
}

/// 法院枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Court {
    /// 高等法院
    HighCourt,
    /// 地区法院
    DistrictCourt,
}

impl Court {
    /// 获取接口使用的编码值
    pub fn as_str(self) -> &'static str {
        match self {
            Court::HighCourt => "high-court",
            Court::DistrictCourt => "district-court",
        }
    }

    /// 获取显示名称
    pub fn display_name(self) -> &'static str {
        match COURT_NAMES.get(self.as_str()) {
            Some(name) => name,
            None => self.as_str(),
        }
    }
}

impl FromStr for Court {
    type Err = ParseCourtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high-court" => Ok(Court::HighCourt),
            "district-court" => Ok(Court::DistrictCourt),
            _ => Err(ParseCourtError(s.to_string())),
        }
    }
}

/// 查询参数
///
/// 一次案件查询的完整表单内容。提交后不再修改；验证码被拒后
/// 由流程层原样保留，供下一次尝试复用。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParameters {
    /// 案件类型
    pub case_type: CaseType,
    /// 案件编号
    pub case_number: String,
    /// 立案年份
    pub filing_year: i32,
    /// 法院
    pub court: Court,
}

impl SearchParameters {
    /// 提交前的本地校验
    ///
    /// 校验失败不发出任何网络请求。
    pub fn validate(&self) -> AppResult<()> {
        let case_number = self.case_number.trim();
        if case_number.is_empty() {
            return Err(AppError::Validation(ValidationError::EmptyCaseNumber));
        }

        let length = case_number.chars().count();
        if length > MAX_CASE_NUMBER_LEN {
            return Err(AppError::Validation(ValidationError::CaseNumberTooLong {
                length,
                max_length: MAX_CASE_NUMBER_LEN,
            }));
        }

        let re = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9/. -]*$")
            .map_err(|e| AppError::Other(e.to_string()))?;
        if !re.is_match(case_number) {
            return Err(AppError::Validation(ValidationError::BadCaseNumberFormat {
                case_number: case_number.to_string(),
            }));
        }

        let max_year = chrono::Local::now().year();
        let min_year = max_year - FILING_YEAR_SPAN;
        if self.filing_year < min_year || self.filing_year > max_year {
            return Err(AppError::Validation(ValidationError::FilingYearOutOfRange {
                year: self.filing_year,
                min_year,
                max_year,
            }));
        }

        Ok(())
    }
}

impl fmt::Display for SearchParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}) @ {}",
            self.case_type.as_str(),
            self.case_number,
            self.filing_year,
            self.court.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn valid_params() -> SearchParameters {
        SearchParameters {
            case_type: CaseType::Civil,
            case_number: "CRL-2024-001".to_string(),
            filing_year: chrono::Local::now().year(),
            court: Court::HighCourt,
        }
    }

    #[test]
    fn test_valid_parameters_pass() {
        assert!(valid_params().validate().is_ok());
    }

    #[test]
    fn test_empty_case_number_rejected() {
        let mut params = valid_params();
        params.case_number = "   ".to_string();
        let err = params.validate().unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::EmptyCaseNumber)
        ));
    }

    #[test]
    fn test_overlong_case_number_rejected() {
        let mut params = valid_params();
        params.case_number = "A".repeat(MAX_CASE_NUMBER_LEN + 1);
        let err = params.validate().unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::CaseNumberTooLong { .. })
        ));
    }

    #[test]
    fn test_bad_format_rejected() {
        let mut params = valid_params();
        params.case_number = "#CRL@2024".to_string();
        let err = params.validate().unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::BadCaseNumberFormat { .. })
        ));
    }

    #[test]
    fn test_filing_year_bounds() {
        let current = chrono::Local::now().year();

        let mut params = valid_params();
        params.filing_year = current - FILING_YEAR_SPAN;
        assert!(params.validate().is_ok());

        params.filing_year = current - FILING_YEAR_SPAN - 1;
        assert!(matches!(
            params.validate().unwrap_err(),
            AppError::Validation(ValidationError::FilingYearOutOfRange { .. })
        ));

        params.filing_year = current + 1;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_case_type_round_trip() {
        for case_type in [
            CaseType::Civil,
            CaseType::Criminal,
            CaseType::Writ,
            CaseType::Appeal,
            CaseType::Revision,
            CaseType::Execution,
        ] {
            let parsed: CaseType = case_type.as_str().parse().unwrap();
            assert_eq!(parsed, case_type);
        }
        assert!("land-dispute".parse::<CaseType>().is_err());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(CaseType::Writ.display_name(), "Writ Petition");
        assert_eq!(Court::HighCourt.display_name(), "High Court");
        assert_eq!(case_type_display_name("civil"), "Civil Case");
        // 未知类型原样返回
        assert_eq!(case_type_display_name("maritime"), "maritime");
        assert_eq!(court_display_name("district-court"), "District Court");
    }

    #[test]
    fn test_serde_wire_values() {
        let params = valid_params();
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["case_type"], "civil");
        assert_eq!(json["court"], "high-court");
    }
}
