//! 上一次题目元数据缓存
//!
//! 解决方案文件头信息不全时，用上一次成功解析的题目补齐

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{SubmitError, SubmitResult};
use crate::models::ProblemMeta;

pub struct MetaCache {
    /// None 表示只保存在内存中
    path: Option<PathBuf>,
    current: RwLock<Option<ProblemMeta>>,
}

impl MetaCache {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            current: RwLock::new(None),
        }
    }

    /// 打开持久化缓存；文件不存在或损坏时视为空
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = read_meta(&path).await;
        Self {
            path: Some(path),
            current: RwLock::new(current),
        }
    }

    pub async fn get(&self) -> Option<ProblemMeta> {
        self.current.read().await.clone()
    }

    /// 记录新的元数据，持久化模式下同时写入文件
    pub async fn record(&self, meta: ProblemMeta) -> SubmitResult<()> {
        if let Some(path) = &self.path {
            let content = serde_json::to_string_pretty(&meta)
                .map_err(|e| SubmitError::decode("last_problem", e))?;
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| SubmitError::io(parent.display().to_string(), e))?;
            }
            fs::write(path, content)
                .await
                .map_err(|e| SubmitError::io(path.display().to_string(), e))?;
        }

        debug!("记录上一次题目: {}", meta.display_title());
        *self.current.write().await = Some(meta);
        Ok(())
    }
}

async fn read_meta(path: &Path) -> Option<ProblemMeta> {
    let content = fs::read_to_string(path).await.ok()?;
    match serde_json::from_str(&content) {
        Ok(meta) => Some(meta),
        Err(e) => {
            warn!("⚠️ 忽略损坏的题目缓存 {}: {}", path.display(), e);
            None
        }
    }
}
