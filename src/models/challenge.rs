//! 验证码挑战会话模型

use serde::{Deserialize, Serialize};

/// 验证码挑战会话
///
/// 每次签发或刷新都会产生一个全新的会话，旧会话整体失效，
/// 不存在部分更新。客户端不主动判定过期，过期只会在提交被拒时
/// 暴露出来。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeSession {
    /// 服务端会话标识（客户端视为不透明字符串）
    pub session_id: String,
    /// 需要操作员抄写的挑战文本
    pub text: String,
    /// 签发时间（Unix 秒）
    pub issued_at: i64,
    /// 服务端声明的有效期（秒）
    pub expires_in: u64,
}

impl ChallengeSession {
    /// 服务端声明的过期时刻（Unix 秒）
    pub fn expires_at(&self) -> i64 {
        self.issued_at + self.expires_in as i64
    }
}
