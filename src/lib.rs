//! # Case Search Submit
//!
//! 一个用于提交法院案件查询的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（reqwest::Client），只暴露能力
//! - `HttpExecutor` - 唯一的 client owner，提供 get/post JSON 能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单次调用
//! - `ChallengeService` - 验证码挑战的签发 / 刷新能力
//! - `SubmitService` - 验证码提交与结论判读能力
//! - `CaseService` - 案件报告拉取 / 文书下载能力
//! - `HistoryService` - 查询历史拉取 / 导出能力
//! - `ReportWriter` - 写失败登记文件能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次查询提交"的完整状态机
//! - `LookupCtx` - 上下文封装（来源文件 + 查询序号）
//! - `LookupFlow` - 流程编排（挑战 → 作答 → 提交 → 结论）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量请求处理器，管理资源和收尾
//! - `orchestrator/lookup_processor` - 单条查询处理器，驱动操作员交互
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::CourtClient;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::HttpExecutor;
pub use models::{CaseReport, ChallengeSession, LookupRequest, SearchParameters};
pub use orchestrator::{process_lookup, App};
pub use services::{CourtGateway, SearchGateway, SubmitVerdict};
pub use workflow::{FlowEvent, FlowState, LookupFlow, SubmissionOutcome};
