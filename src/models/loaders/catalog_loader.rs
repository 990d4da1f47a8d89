use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::error::{SubmitError, SubmitResult};
use crate::models::catalog::Catalog;

/// 题库文件相对于题库根目录的位置
const CATALOG_FILE: &str = "database/allQuestionDescriptions.json";

/// 题库文件完整路径
pub fn catalog_path(root: &Path) -> PathBuf {
    root.join(CATALOG_FILE)
}

/// 题库加载能力
#[async_trait]
pub trait CatalogLoader: Send + Sync {
    async fn load(&self, root: &Path) -> SubmitResult<Catalog>;
}

/// 从 JSON 文件加载题库
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCatalogLoader;

#[async_trait]
impl CatalogLoader for JsonCatalogLoader {
    async fn load(&self, root: &Path) -> SubmitResult<Catalog> {
        let path = catalog_path(root);
        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| SubmitError::io(path.display().to_string(), e))?;

        let catalog: Catalog = serde_json::from_str(&content)
            .map_err(|e| SubmitError::decode(path.display().to_string(), e))?;

        tracing::debug!("已加载题库 {}，共 {} 个模块", path.display(), catalog.len());

        Ok(catalog)
    }
}

/// 将题库写回 JSON 文件
pub async fn save_catalog(root: &Path, catalog: &Catalog) -> SubmitResult<()> {
    let path = catalog_path(root);
    let content = serde_json::to_string_pretty(catalog)
        .map_err(|e| SubmitError::decode(path.display().to_string(), e))?;
    fs::write(&path, content)
        .await
        .map_err(|e| SubmitError::io(path.display().to_string(), e))
}
