use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 本地校验错误
    Validation(ValidationError),
    /// 流程状态错误
    Flow(FlowError),
    /// 验证码服务错误
    Captcha(CaptchaError),
    /// API 调用错误
    Api(ApiError),
    /// 文件操作错误
    File(FileError),
    /// 配置错误
    Config(ConfigError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "校验错误: {}", e),
            AppError::Flow(e) => write!(f, "流程错误: {}", e),
            AppError::Captcha(e) => write!(f, "验证码错误: {}", e),
            AppError::Api(e) => write!(f, "API错误: {}", e),
            AppError::File(e) => write!(f, "文件错误: {}", e),
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Validation(e) => Some(e),
            AppError::Flow(e) => Some(e),
            AppError::Captcha(e) => Some(e),
            AppError::Api(e) => Some(e),
            AppError::File(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 本地校验错误
///
/// 这类错误在发起任何网络请求之前被发现，不算作一次提交尝试。
#[derive(Debug)]
pub enum ValidationError {
    /// 验证码答案为空
    EmptySolution,
    /// 验证码答案过短
    SolutionTooShort {
        length: usize,
        min_length: usize,
    },
    /// 案件编号为空
    EmptyCaseNumber,
    /// 案件编号过长
    CaseNumberTooLong {
        length: usize,
        max_length: usize,
    },
    /// 案件编号格式不合法
    BadCaseNumberFormat {
        case_number: String,
    },
    /// 立案年份超出范围
    FilingYearOutOfRange {
        year: i32,
        min_year: i32,
        max_year: i32,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptySolution => write!(f, "验证码答案不能为空"),
            ValidationError::SolutionTooShort { length, min_length } => {
                write!(
                    f,
                    "验证码答案过短: {} 个字符 (至少需要 {} 个)",
                    length, min_length
                )
            }
            ValidationError::EmptyCaseNumber => write!(f, "案件编号不能为空"),
            ValidationError::CaseNumberTooLong { length, max_length } => {
                write!(
                    f,
                    "案件编号过长: {} 个字符 (最多 {} 个)",
                    length, max_length
                )
            }
            ValidationError::BadCaseNumberFormat { case_number } => {
                write!(f, "案件编号格式不合法: {}", case_number)
            }
            ValidationError::FilingYearOutOfRange {
                year,
                min_year,
                max_year,
            } => {
                write!(
                    f,
                    "立案年份 {} 超出范围 [{}, {}]",
                    year, min_year, max_year
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// 流程状态错误
///
/// 调用方在错误的状态下调用了流程操作，由调用方自行恢复，
/// 不会被记为一次失败的提交尝试。
#[derive(Debug)]
pub enum FlowError {
    /// 当前状态下不能提交
    NotAwaitingSolution {
        state: &'static str,
    },
    /// 已有一次提交在途
    SubmissionInFlight,
    /// 请求已被更新的挑战或 reset 取代，响应被丢弃
    Superseded,
    /// 没有处于激活状态的挑战会话
    NoActiveChallenge,
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowError::NotAwaitingSolution { state } => {
                write!(f, "当前状态 {} 不能提交验证码答案", state)
            }
            FlowError::SubmissionInFlight => write!(f, "已有一次提交在途, 请等待其完成"),
            FlowError::Superseded => write!(f, "请求已被取代, 响应已丢弃"),
            FlowError::NoActiveChallenge => write!(f, "没有激活的验证码会话"),
        }
    }
}

impl std::error::Error for FlowError {}

/// 验证码服务错误
#[derive(Debug)]
pub enum CaptchaError {
    /// 验证码服务不可用
    ServiceUnavailable {
        message: String,
    },
    /// 验证码响应缺少必要字段
    MalformedChallenge {
        missing_field: &'static str,
    },
}

impl fmt::Display for CaptchaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptchaError::ServiceUnavailable { message } => {
                write!(f, "验证码服务不可用: {}", message)
            }
            CaptchaError::MalformedChallenge { missing_field } => {
                write!(f, "验证码响应缺少字段: {}", missing_field)
            }
        }
    }
}

impl std::error::Error for CaptchaError {}

/// API 调用错误
#[derive(Debug)]
pub enum ApiError {
    /// 网络请求失败
    RequestFailed {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// API 返回错误响应
    BadResponse {
        endpoint: String,
        status: Option<u16>,
        message: Option<String>,
    },
    /// API 返回空结果
    EmptyResponse {
        endpoint: String,
    },
    /// 请求频率限制
    RateLimited {
        endpoint: String,
    },
    /// JSON 解析失败
    JsonParseFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::RequestFailed { endpoint, source } => {
                write!(f, "API请求失败 ({}): {}", endpoint, source)
            }
            ApiError::BadResponse {
                endpoint,
                status,
                message,
            } => {
                write!(
                    f,
                    "API返回错误响应 ({}): status={:?}, message={:?}",
                    endpoint, status, message
                )
            }
            ApiError::EmptyResponse { endpoint } => {
                write!(f, "API返回空结果: {}", endpoint)
            }
            ApiError::RateLimited { endpoint } => {
                write!(f, "API请求频率限制 ({})", endpoint)
            }
            ApiError::JsonParseFailed { source } => {
                write!(f, "JSON解析失败: {}", source)
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::RequestFailed { source, .. } | ApiError::JsonParseFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 文件操作错误
#[derive(Debug)]
pub enum FileError {
    /// 文件不存在
    NotFound {
        path: String,
    },
    /// 读取文件失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 删除文件失败
    DeleteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// TOML 解析失败
    TomlParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 目录不存在
    DirectoryNotFound {
        path: String,
    },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::NotFound { path } => write!(f, "文件不存在: {}", path),
            FileError::ReadFailed { path, source } => {
                write!(f, "读取文件失败 ({}): {}", path, source)
            }
            FileError::WriteFailed { path, source } => {
                write!(f, "写入文件失败 ({}): {}", path, source)
            }
            FileError::DeleteFailed { path, source } => {
                write!(f, "删除文件失败 ({}): {}", path, source)
            }
            FileError::TomlParseFailed { path, source } => {
                write!(f, "TOML解析失败 ({}): {}", path, source)
            }
            FileError::DirectoryNotFound { path } => write!(f, "目录不存在: {}", path),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::ReadFailed { source, .. }
            | FileError::WriteFailed { source, .. }
            | FileError::DeleteFailed { source, .. }
            | FileError::TomlParseFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 环境变量解析失败
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 环境变量不存在
    EnvVarNotFound {
        var_name: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EnvVarParseFailed {
                var_name,
                value,
                expected_type,
            } => {
                write!(
                    f,
                    "环境变量 {} 解析失败: 值 '{}' 无法转换为 {}",
                    var_name, value, expected_type
                )
            }
            ConfigError::EnvVarNotFound { var_name } => {
                write!(f, "环境变量 {} 不存在", var_name)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ========== 从常见错误类型转换 ==========
// 注意：不需要手动实现 From<AppError> for anyhow::Error，
// 因为 anyhow 已经为所有实现了 std::error::Error 的类型提供了自动实现

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err.url().map(|u| u.to_string()).unwrap_or_default();
        AppError::Api(ApiError::RequestFailed {
            endpoint,
            source: Box::new(err),
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Api(ApiError::JsonParseFailed {
            source: Box::new(err),
        })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: String::new(), // TOML错误通常不包含路径信息
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建验证码服务不可用错误
    pub fn captcha_unavailable(message: impl Into<String>) -> Self {
        AppError::Captcha(CaptchaError::ServiceUnavailable {
            message: message.into(),
        })
    }

    /// 创建验证码响应缺少字段错误
    pub fn malformed_challenge(missing_field: &'static str) -> Self {
        AppError::Captcha(CaptchaError::MalformedChallenge { missing_field })
    }

    /// 创建API请求失败错误
    pub fn api_request_failed(endpoint: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 判断是否为本地校验错误
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
