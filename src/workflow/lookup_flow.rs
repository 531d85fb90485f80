//! 验证码门控查询流程 - 流程层
//!
//! 核心职责：把"一次案件查询"从拿验证码到拿结论的过程收敛成
//! 一台显式状态机
//!
//! 状态顺序：
//! 1. begin_challenge → AwaitingSolution
//! 2. submit → Submitting
//! 3. 按后端结论进入 Succeeded / NeedsNewChallenge / Failed

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::error::{AppError, AppResult, FlowError, ValidationError};
use crate::models::challenge::ChallengeSession;
use crate::models::search::SearchParameters;
use crate::services::gateway::SearchGateway;
use crate::services::submit_service::SubmitVerdict;

/// 验证码答案最短长度（去除首尾空白后计）
pub const MIN_SOLUTION_LEN: usize = 3;

/// 流程状态
///
/// 状态本身不携带数据；queryId 通过 SubmissionOutcome 交付。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// 空闲，尚无激活的挑战
    Idle,
    /// 挑战已就绪，等待操作员作答
    AwaitingSolution,
    /// 一次提交在途
    Submitting,
    /// 检索已受理（终态）
    Succeeded,
    /// 验证码被拒，换新挑战后可重试
    NeedsNewChallenge,
    /// 失败（终态）
    Failed,
}

impl FlowState {
    pub fn as_str(self) -> &'static str {
        match self {
            FlowState::Idle => "Idle",
            FlowState::AwaitingSolution => "AwaitingSolution",
            FlowState::Submitting => "Submitting",
            FlowState::Succeeded => "Succeeded",
            FlowState::NeedsNewChallenge => "NeedsNewChallenge",
            FlowState::Failed => "Failed",
        }
    }
}

/// 一次提交的最终结果
///
/// 每次尝试恰好产生一个结果；CaptchaRejected 之后必须换新挑战
/// 才能再次提交。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// 检索已受理
    Success { query_id: u64 },
    /// 验证码被拒（参数保留，可换新挑战重试）
    CaptchaRejected { reason: String },
    /// 检索层失败（参数丢弃，重试无意义）
    SearchFailed { reason: String },
    /// 传输层失败
    NetworkError { reason: String },
}

/// 流程对外发布的事件
///
/// 由展示层通过 take_events() 批量取走，显式传递，
/// 不经过任何全局回调。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    /// 新挑战已就绪
    ChallengeIssued { session_id: String },
    /// 答案被接受
    SolutionAccepted { query_id: u64 },
    /// 答案被拒绝
    SolutionRejected { reason: String },
    /// 尝试以失败终止
    AttemptFailed { reason: String },
}

/// 锁内状态，绝不跨 await 持有
struct FlowInner {
    state: FlowState,
    session: Option<ChallengeSession>,
    retained_params: Option<SearchParameters>,
    events: Vec<FlowEvent>,
}

impl FlowInner {
    fn fresh() -> Self {
        Self {
            state: FlowState::Idle,
            session: None,
            retained_params: None,
            events: Vec::new(),
        }
    }
}

/// 验证码门控查询流程
///
/// 职责：
/// - 持有至多一个激活的 ChallengeSession
/// - 保证每次 submit 恰好发出一次网络请求
/// - 用代际计数实现"后发挑战胜出"，在响应到达时判定去留
/// - 不持有任何连接资源，只依赖 SearchGateway
///
/// 并发模型：单实例可被并发调用；内部用 std::sync::Mutex 保护
/// 状态（锁内只做同步操作），代际计数用原子变量，在途请求不被
/// 打断，只会在响应到达时被丢弃。
pub struct LookupFlow<G: SearchGateway> {
    gateway: G,
    generation: AtomicU64,
    inner: Mutex<FlowInner>,
}

impl<G: SearchGateway> LookupFlow<G> {
    /// 创建新的查询流程
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            generation: AtomicU64::new(0),
            inner: Mutex::new(FlowInner::fresh()),
        }
    }

    /// 获取新的验证码挑战
    ///
    /// 调用瞬间旧会话即作废（代际前进），之后才发请求；
    /// 响应到达时若代际已被更新的调用或 reset 超过，响应被丢弃
    /// 并返回 Superseded。
    pub async fn begin_challenge(&self) -> AppResult<ChallengeSession> {
        let generation = self.advance_generation();
        {
            let mut inner = self.lock_inner();
            inner.state = FlowState::Idle;
            inner.session = None;
        }

        info!("🔍 正在获取新的验证码挑战...");

        let session = self.gateway.issue_challenge().await?;
        self.install_challenge(generation, session)
    }

    /// 携带当前查询参数刷新验证码挑战
    ///
    /// 语义与 begin_challenge 完全一致，只是走刷新接口。
    pub async fn refresh_challenge(
        &self,
        params: &SearchParameters,
    ) -> AppResult<ChallengeSession> {
        let generation = self.advance_generation();
        {
            let mut inner = self.lock_inner();
            inner.state = FlowState::Idle;
            inner.session = None;
        }

        info!("🔍 正在刷新验证码挑战...");

        let session = self.gateway.refresh_challenge(params).await?;
        self.install_challenge(generation, session)
    }

    /// 提交验证码答案与查询参数
    ///
    /// 前置条件：状态为 AwaitingSolution。提交在途时的重入直接
    /// 拒绝且不发任何请求；本地校验失败同样不发请求、不改状态。
    /// 通过校验后恰好发出一次网络请求，并按后端结论完成状态转移。
    pub async fn submit(
        &self,
        params: SearchParameters,
        solution: &str,
    ) -> AppResult<SubmissionOutcome> {
        let trimmed = solution.trim();

        // 状态检查与本地校验在锁内同步完成，不发网络请求
        let (generation, session) = {
            let mut inner = self.lock_inner();
            match inner.state {
                FlowState::AwaitingSolution => {}
                FlowState::Submitting => {
                    return Err(AppError::Flow(FlowError::SubmissionInFlight));
                }
                other => {
                    return Err(AppError::Flow(FlowError::NotAwaitingSolution {
                        state: other.as_str(),
                    }));
                }
            }

            validate_solution(trimmed)?;
            params.validate()?;

            let session = match inner.session.clone() {
                Some(session) => session,
                None => return Err(AppError::Flow(FlowError::NoActiveChallenge)),
            };

            inner.state = FlowState::Submitting;
            inner.retained_params = Some(params.clone());
            (self.generation.load(Ordering::SeqCst), session)
        };

        info!("📤 正在提交验证码答案 (session={})...", session.session_id);

        let verdict = self
            .gateway
            .submit_candidate(&session, &params, trimmed)
            .await;

        let mut inner = self.lock_inner();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("提交响应已过期 (generation {}), 丢弃", generation);
            return Err(AppError::Flow(FlowError::Superseded));
        }

        match verdict {
            Ok(SubmitVerdict::Accepted { query_id }) => {
                inner.state = FlowState::Succeeded;
                inner.session = None;
                inner.retained_params = None;
                inner.events.push(FlowEvent::SolutionAccepted { query_id });
                Ok(SubmissionOutcome::Success { query_id })
            }
            Ok(SubmitVerdict::CaptchaMismatch { message }) => {
                // 被拒的会话视为已消耗；参数保留给下一次尝试
                inner.state = FlowState::NeedsNewChallenge;
                inner.session = None;
                inner.events.push(FlowEvent::SolutionRejected {
                    reason: message.clone(),
                });
                Ok(SubmissionOutcome::CaptchaRejected { reason: message })
            }
            Ok(SubmitVerdict::Rejected { message }) => {
                inner.state = FlowState::Failed;
                inner.session = None;
                inner.retained_params = None;
                inner.events.push(FlowEvent::AttemptFailed {
                    reason: message.clone(),
                });
                Ok(SubmissionOutcome::SearchFailed { reason: message })
            }
            Err(e) => {
                let reason = e.to_string();
                inner.state = FlowState::Failed;
                inner.session = None;
                inner.retained_params = None;
                inner.events.push(FlowEvent::AttemptFailed {
                    reason: reason.clone(),
                });
                Ok(SubmissionOutcome::NetworkError { reason })
            }
        }
    }

    /// 重置流程
    ///
    /// 任何状态下可调用。在途请求不会被打断，但其响应一定会被
    /// 丢弃（代际前进）。会话、参数与未取走的事件一并清空。
    pub fn reset(&self) {
        self.advance_generation();
        let mut inner = self.lock_inner();
        *inner = FlowInner::fresh();
        debug!("流程已重置");
    }

    /// 当前状态
    pub fn state(&self) -> FlowState {
        self.lock_inner().state
    }

    /// 当前激活的挑战会话
    pub fn active_session(&self) -> Option<ChallengeSession> {
        self.lock_inner().session.clone()
    }

    /// 验证码被拒后保留的查询参数
    ///
    /// 调用方不必重新读取请求文件即可复用参数发起下一次尝试。
    pub fn retained_params(&self) -> Option<SearchParameters> {
        self.lock_inner().retained_params.clone()
    }

    /// 取走所有待处理事件
    pub fn take_events(&self) -> Vec<FlowEvent> {
        std::mem::take(&mut self.lock_inner().events)
    }

    /// 把响应会话装入流程（仅当代际仍是当前代）
    fn install_challenge(
        &self,
        generation: u64,
        session: ChallengeSession,
    ) -> AppResult<ChallengeSession> {
        let mut inner = self.lock_inner();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("验证码响应已过期 (generation {}), 丢弃", generation);
            return Err(AppError::Flow(FlowError::Superseded));
        }

        inner.state = FlowState::AwaitingSolution;
        inner.session = Some(session.clone());
        inner.events.push(FlowEvent::ChallengeIssued {
            session_id: session.session_id.clone(),
        });

        info!(
            "✓ 验证码挑战已就绪: session={} 有效期={}秒",
            session.session_id, session.expires_in
        );
        Ok(session)
    }

    fn advance_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn lock_inner(&self) -> MutexGuard<'_, FlowInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// 答案的本地校验（零网络请求）
fn validate_solution(trimmed: &str) -> AppResult<()> {
    if trimmed.is_empty() {
        return Err(AppError::Validation(ValidationError::EmptySolution));
    }

    let length = trimmed.chars().count();
    if length < MIN_SOLUTION_LEN {
        return Err(AppError::Validation(ValidationError::SolutionTooShort {
            length,
            min_length: MIN_SOLUTION_LEN,
        }));
    }

    Ok(())
}
