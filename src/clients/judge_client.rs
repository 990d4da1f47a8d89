//! 判题 API 客户端
//!
//! 封装所有与判题 API 相关的调用逻辑
use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::clients::wire::{self, ExecutionPayload};
use crate::config::Config;
use crate::error::{SubmitError, SubmitResult};
use crate::infrastructure::{Credentials, HttpExecutor};
use crate::models::{Score, SourceSubmission};
use crate::utils::truncate_text;

/// 判题端能力
///
/// `SubmissionFlow` 只依赖此 trait，测试时可替换为桩实现
#[async_trait]
pub trait JudgeApi: Send + Sync {
    /// 提交代码，只关心是否被接受
    async fn submit(&self, submission: &SourceSubmission) -> SubmitResult<()>;

    /// 获取题目的执行ID列表，顺序与判题端一致
    async fn list_submission_ids(
        &self,
        question_id: &str,
        module_id: &str,
    ) -> SubmitResult<Vec<String>>;

    /// 按执行ID获取原始判题结果
    async fn fetch_execution(&self, execution_id: &str) -> SubmitResult<ExecutionPayload>;

    /// 获取模块内各题得分状态
    async fn fetch_scores(&self, module_id: &str) -> SubmitResult<Vec<Score>>;
}

/// 判题 API 客户端
pub struct JudgeClient {
    executor: HttpExecutor,
    credentials: Credentials,
    config: Config,
}

impl JudgeClient {
    /// 创建新的判题客户端
    pub fn new(config: &Config, credentials: Credentials) -> SubmitResult<Self> {
        Ok(Self {
            executor: HttpExecutor::new(config)?,
            credentials,
            config: config.clone(),
        })
    }

    /// 发送 GET 请求并返回响应文本，非 2xx 视为请求失败
    async fn get_text(&self, url: &str) -> SubmitResult<String> {
        let token = self.credentials.auth_token().await?;
        let response = self
            .executor
            .get(url, &token)
            .await?
            .error_for_status()
            .map_err(|e| SubmitError::http(url, e))?;

        response.text().await.map_err(|e| SubmitError::http(url, e))
    }
}

#[async_trait]
impl JudgeApi for JudgeClient {
    async fn submit(&self, submission: &SourceSubmission) -> SubmitResult<()> {
        let url = self.config.endpoint(
            &self.config.submit_path,
            &[("moduleId", submission.identity.module_id.as_str())],
        );
        let token = self.credentials.auth_token().await?;
        let body = submission.to_request();

        debug!(
            "提交代码: 题目 {} | 语言 {} | 源码 {} 字节",
            submission.identity.question_id,
            submission.language.name,
            submission.source_code_raw.len()
        );

        // 连接失败、超时等传输错误同样视为提交被拒绝
        let response = match self.executor.post_json(&url, &token, &body).await {
            Ok(response) => response,
            Err(SubmitError::Http { source, .. }) => {
                warn!("⚠️ 提交请求失败: {}", source);
                return Err(SubmitError::SubmissionRejected {
                    status: None,
                    message: source.to_string(),
                });
            }
            Err(e) => return Err(e),
        };
        let status = response.status();

        if status.is_success() {
            info!("✓ 代码已提交");
            return Ok(());
        }

        let message = response.text().await.unwrap_or_default();
        warn!("⚠️ 提交被拒绝: {} {}", status, truncate_text(&message, 200));

        Err(SubmitError::SubmissionRejected {
            status: Some(status.as_u16()),
            message: truncate_text(&message, 200),
        })
    }

    async fn list_submission_ids(
        &self,
        question_id: &str,
        module_id: &str,
    ) -> SubmitResult<Vec<String>> {
        let user_id = self.credentials.user_id().await?;
        let url = self.config.endpoint(
            &self.config.submissions_path,
            &[
                ("problemId", question_id),
                ("userId", user_id.as_str()),
                ("moduleId", module_id),
            ],
        );

        let body = self.get_text(&url).await?;
        let ids = wire::parse_submission_ids(&body)?;

        if ids.is_empty() {
            return Err(SubmitError::NoSubmissionsFound {
                question_id: question_id.to_string(),
            });
        }

        debug!("获取到 {} 条提交记录", ids.len());
        Ok(ids)
    }

    async fn fetch_execution(&self, execution_id: &str) -> SubmitResult<ExecutionPayload> {
        let url = self.config.endpoint(
            &self.config.execution_path,
            &[("executionId", execution_id)],
        );

        let body = self.get_text(&url).await?;
        wire::parse_execution(&body)
    }

    async fn fetch_scores(&self, module_id: &str) -> SubmitResult<Vec<Score>> {
        let user_id = self.credentials.user_id().await?;
        let url = self.config.endpoint(
            &self.config.scores_path,
            &[("moduleId", module_id), ("userId", user_id.as_str())],
        );

        let body = self.get_text(&url).await?;
        wire::parse_scores(&body)
    }
}
