//! 批量提交处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责组装依赖并调度各个命令。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：凭据存储、判题客户端、题库索引、题目缓存
//! 2. **并发提交**：使用 Semaphore 限制同时进行的提交数量
//! 3. **凭据管理**：login / logout
//! 4. **得分同步**：更新本地题库后清除索引缓存
//! 5. **全局统计**：汇总所有文件的提交结果

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::clients::{JudgeApi, JudgeClient};
use crate::config::Config;
use crate::infrastructure::{Credentials, TomlSecretStore};
use crate::models::{CatalogLoader, JsonCatalogLoader, ProblemMeta};
use crate::orchestrator::file_processor::{self, FileOutcome};
use crate::services::solution_file::render_header;
use crate::services::{
    ConsolePresenter, HeaderParser, IdentityIndex, MetaCache, ScoreSync, SolutionFile,
    VerdictPresenter,
};
use crate::utils::logging::{log_startup, print_final_stats};
use crate::workflow::SubmissionFlow;

/// 批量提交统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SubmitStats {
    pub accepted: usize,
    pub failed: usize,
    pub total: usize,
}

/// 应用主结构
pub struct App {
    config: Config,
    credentials: Credentials,
    api: Arc<dyn JudgeApi>,
    loader: Arc<dyn CatalogLoader>,
    index: Arc<IdentityIndex>,
    flow: Arc<SubmissionFlow>,
    parser: Arc<HeaderParser>,
}

impl App {
    /// 使用真实的判题端和文件存储初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        let store = TomlSecretStore::new(config.credentials_file.clone());
        let credentials = Credentials::new(Arc::new(store)).with_env_overrides();

        let api: Arc<dyn JudgeApi> = Arc::new(
            JudgeClient::new(&config, credentials.clone()).context("无法创建判题客户端")?,
        );
        let meta_cache = Arc::new(MetaCache::open(config.last_problem_file.clone()).await);
        let presenter: Arc<dyn VerdictPresenter> =
            Arc::new(ConsolePresenter::new(config.verbose_logging));

        Self::from_parts(
            config,
            api,
            Arc::new(JsonCatalogLoader),
            credentials,
            presenter,
            meta_cache,
        )
    }

    /// 使用注入的依赖组装应用
    pub fn from_parts(
        config: Config,
        api: Arc<dyn JudgeApi>,
        loader: Arc<dyn CatalogLoader>,
        credentials: Credentials,
        presenter: Arc<dyn VerdictPresenter>,
        meta_cache: Arc<MetaCache>,
    ) -> Result<Self> {
        let index = Arc::new(IdentityIndex::new(loader.clone()));
        let flow = Arc::new(SubmissionFlow::new(
            &config,
            api.clone(),
            index.clone(),
            credentials.clone(),
            presenter,
            meta_cache,
        ));
        let parser = Arc::new(HeaderParser::new().context("无法编译文件头解析规则")?);

        Ok(Self {
            config,
            credentials,
            api,
            loader,
            index,
            flow,
            parser,
        })
    }

    /// 并发提交多个文件，单个文件失败不影响其他文件
    pub async fn submit_files(&self, paths: Vec<PathBuf>) -> Result<SubmitStats> {
        if paths.is_empty() {
            warn!("⚠️ 没有需要提交的文件");
            return Ok(SubmitStats::default());
        }

        log_startup(&self.config.api_base_url, paths.len());

        let max_concurrent = self.config.max_concurrent_submissions.max(1);
        info!("📋 最大并发提交数: {}", max_concurrent);
        let semaphore = Arc::new(Semaphore::new(max_concurrent));

        let handles = paths.into_iter().enumerate().map(|(idx, path)| {
            let semaphore = semaphore.clone();
            let flow = self.flow.clone();
            let parser = self.parser.clone();
            let file_index = idx + 1;

            tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await?;
                file_processor::process_file(&flow, &parser, &path, file_index).await
            })
        });

        let mut stats = SubmitStats::default();
        for result in join_all(handles).await {
            stats.total += 1;
            match result {
                Ok(Ok(FileOutcome::Accepted)) => stats.accepted += 1,
                Ok(Ok(FileOutcome::Rejected(_))) => stats.failed += 1,
                Ok(Err(e)) => {
                    error!("❌ {:#}", e);
                    stats.failed += 1;
                }
                Err(e) => {
                    error!("任务执行失败: {}", e);
                    stats.failed += 1;
                }
            }
        }

        print_final_stats(stats.accepted, stats.failed, stats.total);
        Ok(stats)
    }

    /// 保存令牌和用户ID
    pub async fn login(&self, token: &str, user_id: &str) -> Result<()> {
        self.credentials
            .store(token, user_id)
            .await
            .context("保存凭据失败")?;
        info!("🔑 已保存凭据 (用户 {})", user_id.trim());
        Ok(())
    }

    /// 清除令牌和用户ID
    pub async fn logout(&self) -> Result<()> {
        self.credentials.clear().await.context("清除凭据失败")?;
        info!("🔒 已清除凭据");
        Ok(())
    }

    /// 同步模块得分到本地题库
    pub async fn sync_scores(&self, module_id: &str) -> Result<usize> {
        let sync = ScoreSync::new(self.api.clone(), self.loader.clone());
        let updated = sync
            .sync(&self.config.catalog_root, module_id)
            .await
            .with_context(|| format!("同步模块 {} 的得分失败", module_id))?;

        // 题库文件已变化
        self.index.clear(&self.config.catalog_root).await;
        Ok(updated)
    }

    /// 解析文件头并用题库补齐位置信息，输出规范化的文件头
    pub async fn show(&self, path: &Path) -> Result<ProblemMeta> {
        let file = SolutionFile::load(path, &self.parser)
            .await
            .with_context(|| format!("无法读取解决方案文件: {}", path.display()))?;
        let mut meta = file.header;

        if meta.module_id.is_none() || meta.section_id.is_none() {
            if let Some(id) = meta.id.clone() {
                if let Some(found) = self.index.lookup(&self.config.catalog_root, &id).await {
                    meta.module_id.get_or_insert(found.module_id);
                    meta.section_id.get_or_insert(found.section_id);
                }
            }
        }

        info!("📄 {}\n{}", path.display(), render_header(&meta));
        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{ExecutionPayload, RawStatus, RawTestCase};
    use crate::error::SubmitResult;
    use crate::infrastructure::{codec, MemorySecretStore};
    use crate::models::{AggregateVerdict, Score, SourceSubmission};
    use async_trait::async_trait;

    /// 只有题目 Q1 的用例全部通过
    struct OnlyQ1Passes;

    #[async_trait]
    impl JudgeApi for OnlyQ1Passes {
        async fn submit(&self, _submission: &SourceSubmission) -> SubmitResult<()> {
            Ok(())
        }

        async fn list_submission_ids(&self, question_id: &str, _m: &str) -> SubmitResult<Vec<String>> {
            Ok(vec![format!("E-{}", question_id)])
        }

        async fn fetch_execution(&self, execution_id: &str) -> SubmitResult<ExecutionPayload> {
            let status = if execution_id == "E-Q1" { "Accepted" } else { "Wrong Answer" };
            Ok(ExecutionPayload {
                test_cases: vec![RawTestCase {
                    status: RawStatus {
                        description: status.to_string(),
                    },
                    stdout: Some(codec::encode("1")),
                    ..Default::default()
                }],
            })
        }

        async fn fetch_scores(&self, _module_id: &str) -> SubmitResult<Vec<Score>> {
            Ok(vec![Score {
                problem_id: "Q1".to_string(),
                status: "Accepted".to_string(),
            }])
        }
    }

    struct Quiet;

    impl VerdictPresenter for Quiet {
        fn present(&self, _verdict: &AggregateVerdict, _title: &str) {}
    }

    fn app(root: &Path) -> App {
        let config = Config {
            catalog_root: root.to_path_buf(),
            poll_delay_secs: 0,
            max_concurrent_submissions: 2,
            ..Config::default()
        };
        App::from_parts(
            config,
            Arc::new(OnlyQ1Passes),
            Arc::new(JsonCatalogLoader),
            Credentials::new(Arc::new(MemorySecretStore::with_credentials("tok", "U1"))),
            Arc::new(Quiet),
            Arc::new(MetaCache::in_memory()),
        )
        .unwrap()
    }

    fn write_catalog(root: &Path) {
        std::fs::create_dir_all(root.join("database")).unwrap();
        std::fs::write(
            root.join("database/allQuestionDescriptions.json"),
            r#"[{"module":{"id":"M1"},"sections":{"S1":{
                "Q1":{"id":"Q1","title":"Two Sum","status":"pending"},
                "Q2":{"id":"Q2","title":"Three Sum"}}}}]"#,
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_submit_files_counts_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path());
        let q1 = dir.path().join("Two_Sum.java");
        let q2 = dir.path().join("Three_Sum.java");
        let orphan = dir.path().join("Orphan.java");
        std::fs::write(&q1, "// Two Sum (Q1)\nclass Main {}\n").unwrap();
        std::fs::write(&q2, "// Three Sum (Q2)\nclass Main {}\n").unwrap();
        std::fs::write(&orphan, "class Main {}\n").unwrap();

        let stats = app(dir.path())
            .submit_files(vec![q1, q2, orphan, dir.path().join("missing.java")])
            .await
            .unwrap();

        assert_eq!(
            stats,
            SubmitStats {
                accepted: 1,
                failed: 3,
                total: 4,
            }
        );
    }

    #[tokio::test]
    async fn test_sync_scores_updates_catalog() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path());

        let updated = app(dir.path()).sync_scores("M1").await.unwrap();

        assert_eq!(updated, 1);
        let content =
            std::fs::read_to_string(dir.path().join("database/allQuestionDescriptions.json")).unwrap();
        assert!(content.contains("\"solved\""));
    }

    #[tokio::test]
    async fn test_show_fills_location_from_catalog() {
        let dir = tempfile::tempdir().unwrap();
        write_catalog(dir.path());
        let path = dir.path().join("Two_Sum.java");
        std::fs::write(&path, "// Two Sum (Q1)\nclass Main {}\n").unwrap();

        let meta = app(dir.path()).show(&path).await.unwrap();

        assert_eq!(meta.module_id.as_deref(), Some("M1"));
        assert_eq!(meta.section_id.as_deref(), Some("S1"));
    }

    #[tokio::test]
    async fn test_login_then_logout() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        app.login("new-token", "U2").await.unwrap();
        assert_eq!(app.credentials.user_id().await.unwrap(), "U2");

        app.logout().await.unwrap();
        assert!(app.credentials.auth_token().await.is_err());
    }
}
