//! 提交流程 - 流程层
//!
//! 核心职责：定义"一次提交"的完整流程
//!
//! 流程顺序：
//! 1. 合并元数据 → 题库索引补齐 module / section → 校验身份
//! 2. 提交代码
//! 3. 获取提交记录，取第一个执行ID
//! 4. 轮询判题结果 → 汇总 → 展示
//!
//! 任一阶段失败都包装为 `SubmissionFailure`，不自动重来

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::clients::JudgeApi;
use crate::config::Config;
use crate::error::{SubmissionFailure, SubmissionStage, SubmitError, SubmitResult};
use crate::infrastructure::Credentials;
use crate::models::{
    AggregateVerdict, Language, ProblemIdentity, ProblemIdentityBuilder, ProblemMeta,
    SourceSubmission,
};
use crate::services::{
    verdict_aggregator, IdentityIndex, MetaCache, RetryPolicy, VerdictPoller, VerdictPresenter,
};
use crate::workflow::submission_ctx::SubmissionCtx;

/// 提交流程
///
/// - 编排一次提交的完整流程，决定每一步何时执行
/// - 不直接发请求，只依赖业务能力（services）和判题端 trait
/// - 共享的索引与元数据缓存由调用方注入
pub struct SubmissionFlow {
    api: Arc<dyn JudgeApi>,
    index: Arc<IdentityIndex>,
    credentials: Credentials,
    poller: VerdictPoller,
    presenter: Arc<dyn VerdictPresenter>,
    meta_cache: Arc<MetaCache>,
    catalog_root: PathBuf,
    default_language: Language,
}

impl SubmissionFlow {
    pub fn new(
        config: &Config,
        api: Arc<dyn JudgeApi>,
        index: Arc<IdentityIndex>,
        credentials: Credentials,
        presenter: Arc<dyn VerdictPresenter>,
        meta_cache: Arc<MetaCache>,
    ) -> Self {
        Self {
            poller: VerdictPoller::new(api.clone(), RetryPolicy::from_config(config)),
            api,
            index,
            credentials,
            presenter,
            meta_cache,
            catalog_root: config.catalog_root.clone(),
            default_language: Language {
                id: config.default_language_id,
                name: config.default_language_name.clone(),
            },
        }
    }

    /// 执行一次提交
    pub async fn run(
        &self,
        header: &ProblemMeta,
        source_code: &str,
        ctx: &SubmissionCtx,
    ) -> Result<AggregateVerdict, SubmissionFailure> {
        let (identity, meta) = self
            .resolve_identity(header, ctx)
            .await
            .map_err(|e| SubmissionFailure::new(SubmissionStage::IdentityResolved, e))?;

        let title = meta.display_title().to_string();
        info!(
            "{} 📋 {} (题目 {} / 模块 {} / 分组 {})",
            ctx, title, identity.question_id, identity.module_id, identity.section_id
        );

        self.dispatch(identity.clone(), &meta, source_code, ctx)
            .await
            .map_err(|e| SubmissionFailure::new(SubmissionStage::Dispatched, e))?;

        let execution_id = self
            .first_execution_id(&identity)
            .await
            .map_err(|e| SubmissionFailure::new(SubmissionStage::Listing, e))?;
        info!("{} 🔖 执行ID: {}", ctx, execution_id);

        let cases = self
            .poller
            .fetch_verdicts(&execution_id)
            .await
            .map_err(|e| SubmissionFailure::new(SubmissionStage::Polling, e))?;

        let verdict = verdict_aggregator::aggregate(cases);
        debug!("{} 判题结果: {}", ctx, verdict.overall_status);

        self.presenter.present(&verdict, &title);

        Ok(verdict)
    }

    /// 合并元数据并补齐位置信息
    ///
    /// 文件头字段优先；缓存的上一次题目只在题目ID一致时用于补齐
    async fn resolve_identity(
        &self,
        header: &ProblemMeta,
        ctx: &SubmissionCtx,
    ) -> SubmitResult<(ProblemIdentity, ProblemMeta)> {
        let cached = self
            .meta_cache
            .get()
            .await
            .filter(|cached| header.id.is_none() || cached.id == header.id);

        let mut meta = match &cached {
            Some(cached) => header.merged_with(cached),
            None => header.clone(),
        };

        let mut builder = ProblemIdentityBuilder::from_meta(&meta);

        if builder.needs_location() {
            if let Some(question_id) = builder.current_question_id().map(str::to_string) {
                match self.index.lookup(&self.catalog_root, &question_id).await {
                    Some(found) => {
                        debug!("{} 从题库补齐: {} / {}", ctx, found.module_id, found.section_id);
                        builder = builder.fill_location(&found.module_id, &found.section_id);
                    }
                    None => warn!("{} ⚠️ 题库中未找到题目 {}", ctx, question_id),
                }
            }
        }

        let identity = builder.build()?;

        meta.module_id = Some(identity.module_id.clone());
        meta.section_id = Some(identity.section_id.clone());
        if let Err(e) = self.meta_cache.record(meta.clone()).await {
            warn!("{} ⚠️ 保存题目缓存失败: {}", ctx, e);
        }

        Ok((identity, meta))
    }

    async fn dispatch(
        &self,
        identity: ProblemIdentity,
        meta: &ProblemMeta,
        source_code: &str,
        ctx: &SubmissionCtx,
    ) -> SubmitResult<()> {
        let user_id = self.credentials.user_id().await?;

        let language = match (meta.language_id, &meta.language_name) {
            (Some(id), Some(name)) => Language {
                id,
                name: name.clone(),
            },
            (Some(id), None) => Language {
                id,
                name: self.default_language.name.clone(),
            },
            (None, Some(name)) => Language {
                id: self.default_language.id,
                name: name.clone(),
            },
            (None, None) => self.default_language.clone(),
        };

        let submission = SourceSubmission {
            identity,
            user_id,
            language,
            source_code_raw: source_code.to_string(),
            time_taken_ms: 0,
        };

        info!("{} 📤 正在提交代码 ({})...", ctx, submission.language.name);
        self.api.submit(&submission).await?;
        info!("{} ✓ 提交成功，等待判题...", ctx);
        Ok(())
    }

    /// 取列表中的第一个执行ID
    async fn first_execution_id(&self, identity: &ProblemIdentity) -> SubmitResult<String> {
        let ids = self
            .api
            .list_submission_ids(&identity.question_id, &identity.module_id)
            .await?;

        ids.into_iter()
            .next()
            .ok_or_else(|| SubmitError::NoSubmissionsFound {
                question_id: identity.question_id.clone(),
            })
    }
}
