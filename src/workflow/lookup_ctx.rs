//! 查询处理上下文
//!
//! 封装"我正在处理哪个请求文件的第几条查询"这一信息

use std::fmt::Display;

/// 查询处理上下文
///
/// 包含处理单条查询所需的全部上下文信息
#[derive(Debug, Clone)]
pub struct LookupCtx {
    /// 请求来源（TOML 文件名）
    pub source: String,

    /// 查询在本批中的序号（从1开始，仅用于日志显示）
    pub lookup_index: usize,
}

impl LookupCtx {
    /// 创建新的查询上下文
    pub fn new(source: String, lookup_index: usize) -> Self {
        Self {
            source,
            lookup_index,
        }
    }
}

impl Display for LookupCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[查询#{} 文件#{}]", self.lookup_index, self.source)
    }
}
