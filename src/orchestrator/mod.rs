//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量请求处理器
//! - 管理应用生命周期（初始化、运行、收尾）
//! - 批量加载查询请求（Vec<LookupRequest>）
//! - 顺序逐条处理（验证码需要操作员作答，无法并行）
//! - 收尾时拉取并展示查询历史
//! - 输出全局统计信息
//!
//! ### `lookup_processor` - 单条查询处理器
//! - 驱动一条查询的完整验证码流程
//! - 创建并复用 LookupFlow
//! - 从标准输入读取操作员的验证码答案
//! - 拉取案件报告并展示
//! - 清理文件
//! - 输出单条查询的统计信息
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<LookupRequest>)
//!     ↓
//! lookup_processor (处理单条 LookupRequest)
//!     ↓
//! workflow::LookupFlow (处理单次验证码提交)
//!     ↓
//! services (能力层：challenge / submit / case / history / report)
//!     ↓
//! infrastructure (基础设施：HttpExecutor)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_processor 管批量，lookup_processor 管单条
//! 2. **资源隔离**：只有编排层持有标准输入句柄
//! 3. **向下依赖**：编排层 → workflow → services → infrastructure
//! 4. **无业务逻辑**：只做调度和统计，不做具体业务判断

pub mod batch_processor;
pub mod lookup_processor;

// 重新导出主要类型
pub use batch_processor::App;
pub use lookup_processor::{process_lookup, LookupResult};
