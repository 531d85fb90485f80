/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 查询请求文件存放目录
    pub requests_folder: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 失败查询报告文件
    pub report_file: String,
    // --- 法院查询 API 配置 ---
    pub api_base_url: String,
    /// 单个请求的超时时间（秒）
    pub request_timeout_secs: u64,
    /// 每条查询允许的验证码尝试次数
    pub max_solution_attempts: usize,
    // --- 历史记录配置 ---
    /// 历史记录时间过滤器 (24h / 7d / 30d / all)
    pub history_filter: String,
    /// 历史记录拉取条数
    pub history_limit: usize,
    /// 处理结束后是否导出历史 CSV
    pub export_history: bool,
    // --- 案件文书配置 ---
    /// 查询成功后是否下载案件文书
    pub download_documents: bool,
    /// 文书保存目录
    pub documents_folder: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            requests_folder: "lookup_requests".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            report_file: "failed_lookups.txt".to_string(),
            api_base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout_secs: 30,
            max_solution_attempts: 3,
            history_filter: "24h".to_string(),
            history_limit: 50,
            export_history: false,
            download_documents: false,
            documents_folder: "case_documents".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            requests_folder: std::env::var("REQUESTS_FOLDER").unwrap_or(default.requests_folder),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            report_file: std::env::var("REPORT_FILE").unwrap_or(default.report_file),
            api_base_url: std::env::var("API_BASE_URL").unwrap_or(default.api_base_url),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            max_solution_attempts: std::env::var("MAX_SOLUTION_ATTEMPTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_solution_attempts),
            history_filter: std::env::var("HISTORY_FILTER").unwrap_or(default.history_filter),
            history_limit: std::env::var("HISTORY_LIMIT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.history_limit),
            export_history: std::env::var("EXPORT_HISTORY").ok().and_then(|v| v.parse().ok()).unwrap_or(default.export_history),
            download_documents: std::env::var("DOWNLOAD_DOCUMENTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.download_documents),
            documents_folder: std::env::var("DOCUMENTS_FOLDER").unwrap_or(default.documents_folder),
        }
    }
}
