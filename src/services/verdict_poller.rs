//! 判题结果轮询 - 业务能力层
//!
//! 固定间隔、固定次数的重试，不做指数退避

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::clients::JudgeApi;
use crate::config::Config;
use crate::error::{SubmitError, SubmitResult};
use crate::models::TestCaseVerdict;
use crate::services::verdict_aggregator;

/// 重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 首次之外的重试次数
    pub retries: usize,
    /// 每次请求前的固定等待
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            retries: config.poll_retries,
            delay: config.poll_delay(),
        }
    }

    /// 总尝试次数
    pub fn attempts(&self) -> usize {
        self.retries + 1
    }
}

/// 判题结果轮询器
///
/// 职责：
/// - 每次尝试前等待 `delay`，再请求判题结果
/// - 请求失败或测试用例为空（评测未完成）都视为需要重试
/// - 凭据缺失不重试，直接返回
/// - 次数耗尽后返回 `VerdictUnavailable`，不返回部分结果
pub struct VerdictPoller {
    api: Arc<dyn JudgeApi>,
    policy: RetryPolicy,
}

impl VerdictPoller {
    pub fn new(api: Arc<dyn JudgeApi>, policy: RetryPolicy) -> Self {
        Self { api, policy }
    }

    /// 获取执行ID对应的测试用例结果
    pub async fn fetch_verdicts(&self, execution_id: &str) -> SubmitResult<Vec<TestCaseVerdict>> {
        let attempts = self.policy.attempts();
        let mut last_error = SubmitError::VerdictPending;

        for attempt in 1..=attempts {
            debug!(
                "等待 {:?} 后获取判题结果 (尝试 {}/{})",
                self.policy.delay, attempt, attempts
            );
            sleep(self.policy.delay).await;

            match self.try_fetch(execution_id).await {
                Ok(cases) => {
                    info!("✓ 获取到 {} 个测试用例结果", cases.len());
                    return Ok(cases);
                }
                Err(e @ SubmitError::CredentialMissing { .. }) => {
                    warn!("获取判题结果失败 (尝试 {}/{}): {}，不再重试", attempt, attempts, e);
                    return Err(e);
                }
                Err(e) => {
                    if attempt < attempts {
                        warn!(
                            "获取判题结果失败 (尝试 {}/{}): {}，{:?} 后重试...",
                            attempt, attempts, e, self.policy.delay
                        );
                    } else {
                        warn!("获取判题结果失败 (尝试 {}/{}): {}", attempt, attempts, e);
                    }
                    last_error = e;
                }
            }
        }

        Err(SubmitError::VerdictUnavailable {
            attempts,
            last: Box::new(last_error),
        })
    }

    async fn try_fetch(&self, execution_id: &str) -> SubmitResult<Vec<TestCaseVerdict>> {
        let payload = self.api.fetch_execution(execution_id).await?;
        let cases = verdict_aggregator::decode(&payload);
        if cases.is_empty() {
            return Err(SubmitError::VerdictPending);
        }
        Ok(cases)
    }
}
