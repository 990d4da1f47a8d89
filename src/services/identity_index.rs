//! 题目身份索引 - 业务能力层
//!
//! 只负责"根据题目ID查找 module / section"能力

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::models::{Catalog, CatalogLoader, ProblemIdentity};

/// 题目所在位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub module_id: String,
    pub section_id: String,
}

/// questionId → 位置
pub type QuestionIndex = HashMap<String, IndexEntry>;

/// 从题库构建扁平索引
///
/// 同一题目ID出现多次时，以后出现的为准
pub fn build_index(catalog: &Catalog) -> QuestionIndex {
    let mut index = QuestionIndex::new();
    for module in catalog {
        for (section_id, questions) in &module.sections {
            for (key, question) in questions {
                let question_id = question.effective_id(key);
                if question_id.is_empty() {
                    continue;
                }
                index.insert(
                    question_id.to_string(),
                    IndexEntry {
                        module_id: module.module.id.clone(),
                        section_id: section_id.clone(),
                    },
                );
            }
        }
    }
    index
}

/// 题目身份索引
///
/// 职责：
/// - 每个题库根目录只构建一次索引，之后复用
/// - 题库损坏或不可读时得到空索引，只记录警告
/// - 不做淘汰；题库更新后需调用 `clear`
pub struct IdentityIndex {
    loader: Arc<dyn CatalogLoader>,
    cache: RwLock<HashMap<PathBuf, Arc<QuestionIndex>>>,
}

impl IdentityIndex {
    pub fn new(loader: Arc<dyn CatalogLoader>) -> Self {
        Self {
            loader,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// 查找题目身份，未找到返回 None
    pub async fn lookup(&self, catalog_root: &Path, question_id: &str) -> Option<ProblemIdentity> {
        if question_id.is_empty() {
            return None;
        }

        let index = self.index_for(catalog_root).await;
        let entry = index.get(question_id)?;

        Some(ProblemIdentity {
            question_id: question_id.to_string(),
            module_id: entry.module_id.clone(),
            section_id: entry.section_id.clone(),
        })
    }

    /// 获取（必要时构建）某个题库根目录的索引
    pub async fn index_for(&self, catalog_root: &Path) -> Arc<QuestionIndex> {
        let key = cache_key(catalog_root).await;

        if let Some(index) = self.cache.read().await.get(&key) {
            return index.clone();
        }

        // 构建过程不持锁；并发首次访问最多重复构建一次，结果相同
        let built = Arc::new(self.build(&key).await);

        let mut cache = self.cache.write().await;
        cache.entry(key).or_insert(built).clone()
    }

    /// 清除某个题库根目录的缓存
    pub async fn clear(&self, catalog_root: &Path) {
        let key = cache_key(catalog_root).await;
        if self.cache.write().await.remove(&key).is_some() {
            debug!("已清除题库索引缓存: {}", key.display());
        }
    }

    pub async fn clear_all(&self) {
        self.cache.write().await.clear();
    }

    async fn build(&self, root: &Path) -> QuestionIndex {
        match self.loader.load(root).await {
            Ok(catalog) => {
                let index = build_index(&catalog);
                info!("📚 题库索引构建完成: {} 道题目", index.len());
                index
            }
            Err(e) => {
                warn!("⚠️ 无法加载题库 {}: {}，使用空索引", root.display(), e);
                QuestionIndex::new()
            }
        }
    }
}

/// 缓存 key 使用绝对路径；无法规范化时退回原路径
async fn cache_key(root: &Path) -> PathBuf {
    tokio::fs::canonicalize(root)
        .await
        .unwrap_or_else(|_| root.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SubmitError, SubmitResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticLoader {
        json: &'static str,
        loads: AtomicUsize,
    }

    impl StaticLoader {
        fn new(json: &'static str) -> Self {
            Self {
                json,
                loads: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CatalogLoader for StaticLoader {
        async fn load(&self, _root: &Path) -> SubmitResult<Catalog> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            serde_json::from_str(self.json).map_err(|e| SubmitError::decode("catalog", e))
        }
    }

    const CATALOG: &str = r#"[
        {"module": {"id": "M1"}, "sections": {
            "S1": {"Q1": {"id": "Q1", "title": "Two Sum"}, "p2": {"title": "No id"}},
            "S2": {"Q3": {"id": "Q3"}}
        }},
        {"module": {"id": "M2"}, "sections": {"S9": {"x": {"id": "Q4"}}}}
    ]"#;

    #[tokio::test]
    async fn test_lookup_resolves_module_and_section() {
        let index = IdentityIndex::new(Arc::new(StaticLoader::new(CATALOG)));

        let identity = index.lookup(Path::new("/catalog"), "Q3").await.unwrap();
        assert_eq!(identity.module_id, "M1");
        assert_eq!(identity.section_id, "S2");

        let identity = index.lookup(Path::new("/catalog"), "Q4").await.unwrap();
        assert_eq!(identity.module_id, "M2");
        assert_eq!(identity.section_id, "S9");
    }

    #[tokio::test]
    async fn test_question_key_used_when_id_missing() {
        let index = IdentityIndex::new(Arc::new(StaticLoader::new(CATALOG)));
        let identity = index.lookup(Path::new("/catalog"), "p2").await.unwrap();
        assert_eq!(identity.section_id, "S1");
    }

    #[tokio::test]
    async fn test_index_built_once_per_root() {
        let loader = Arc::new(StaticLoader::new(CATALOG));
        let index = IdentityIndex::new(loader.clone());

        index.lookup(Path::new("/catalog-a"), "Q1").await;
        index.lookup(Path::new("/catalog-a"), "Q3").await;
        index.lookup(Path::new("/catalog-a"), "missing").await;
        assert_eq!(loader.loads.load(Ordering::SeqCst), 1);

        index.lookup(Path::new("/catalog-b"), "Q1").await;
        assert_eq!(loader.loads.load(Ordering::SeqCst), 2);

        index.clear(Path::new("/catalog-a")).await;
        index.lookup(Path::new("/catalog-a"), "Q1").await;
        assert_eq!(loader.loads.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_malformed_catalog_gives_empty_index() {
        let loader = Arc::new(StaticLoader::new("{ not json"));
        let index = IdentityIndex::new(loader.clone());

        assert!(index.lookup(Path::new("/broken"), "Q1").await.is_none());
        assert!(index.index_for(Path::new("/broken")).await.is_empty());
        // 空索引同样被缓存
        assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_build_index_is_idempotent() {
        let catalog: Catalog = serde_json::from_str(CATALOG).unwrap();
        let first = build_index(&catalog);
        let second = build_index(&catalog);
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn test_later_duplicate_overwrites() {
        let catalog: Catalog = serde_json::from_str(
            r#"[{"module":{"id":"M1"},"sections":{"S1":{"a":{"id":"Q1"}}}},
                {"module":{"id":"M2"},"sections":{"S2":{"b":{"id":"Q1"}}}}]"#,
        )
        .unwrap();
        let index = build_index(&catalog);
        assert_eq!(index["Q1"].module_id, "M2");
    }
}
