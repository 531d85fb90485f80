//! 检索后端网关 - 业务能力层
//!
//! 流程层唯一允许接触后端的通道。

use async_trait::async_trait;

use crate::error::AppResult;
use crate::infrastructure::HttpExecutor;
use crate::models::challenge::ChallengeSession;
use crate::models::search::SearchParameters;
use crate::services::challenge_service::ChallengeService;
use crate::services::submit_service::{SubmitService, SubmitVerdict};

/// 检索后端网关
///
/// 流程层依赖的全部后端能力。生产实现走 HTTP，
/// 测试里用脚本桩替换。
#[async_trait]
pub trait SearchGateway: Send + Sync {
    /// 签发新的验证码挑战
    async fn issue_challenge(&self) -> AppResult<ChallengeSession>;

    /// 携带查询参数刷新验证码挑战
    async fn refresh_challenge(&self, params: &SearchParameters) -> AppResult<ChallengeSession>;

    /// 提交验证码答案与查询参数，恰好发出一次网络请求
    async fn submit_candidate(
        &self,
        session: &ChallengeSession,
        params: &SearchParameters,
        solution: &str,
    ) -> AppResult<SubmitVerdict>;
}

/// 法院查询网关（生产实现）
///
/// 组合 HTTP 执行器与两个单能力服务。executor 内部是连接池的
/// Arc 句柄，按流程实例 clone 的开销可以忽略。
#[derive(Clone)]
pub struct CourtGateway {
    executor: HttpExecutor,
    challenges: ChallengeService,
    submits: SubmitService,
}

impl CourtGateway {
    /// 创建新的法院查询网关
    pub fn new(executor: HttpExecutor) -> Self {
        Self {
            executor,
            challenges: ChallengeService::new(),
            submits: SubmitService::new(),
        }
    }
}

#[async_trait]
impl SearchGateway for CourtGateway {
    async fn issue_challenge(&self) -> AppResult<ChallengeSession> {
        self.challenges.issue(&self.executor).await
    }

    async fn refresh_challenge(&self, params: &SearchParameters) -> AppResult<ChallengeSession> {
        self.challenges.refresh(&self.executor, params).await
    }

    async fn submit_candidate(
        &self,
        session: &ChallengeSession,
        params: &SearchParameters,
        solution: &str,
    ) -> AppResult<SubmitVerdict> {
        self.submits
            .submit(&self.executor, session, params, solution)
            .await
    }
}
