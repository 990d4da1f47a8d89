//! 凭据存储 - 基础设施层
//!
//! 按字符串 key 存取令牌和用户ID，提供文件存储和内存存储两种实现

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{SubmitError, SubmitResult};

pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const USER_ID_KEY: &str = "userId";

/// 密钥存储能力
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get(&self, key: &str) -> SubmitResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> SubmitResult<()>;
    async fn delete(&self, key: &str) -> SubmitResult<()>;
}

/// 内存存储，进程退出即丢失
#[derive(Debug, Default)]
pub struct MemorySecretStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置令牌和用户ID
    pub fn with_credentials(token: impl Into<String>, user_id: impl Into<String>) -> Self {
        let mut values = BTreeMap::new();
        values.insert(AUTH_TOKEN_KEY.to_string(), token.into());
        values.insert(USER_ID_KEY.to_string(), user_id.into());
        Self {
            values: Mutex::new(values),
        }
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get(&self, key: &str) -> SubmitResult<Option<String>> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> SubmitResult<()> {
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> SubmitResult<()> {
        self.values.lock().await.remove(key);
        Ok(())
    }
}

/// TOML 文件存储
///
/// 文件内容为扁平的 `key = "value"` 表；文件不存在视为空表
pub struct TomlSecretStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl TomlSecretStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> SubmitResult<BTreeMap<String, String>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(SubmitError::io(self.path.display().to_string(), e)),
        };
        toml::from_str(&content).map_err(|e| SubmitError::Config(format!("凭据文件格式错误: {}", e)))
    }

    async fn write_all(&self, values: &BTreeMap<String, String>) -> SubmitResult<()> {
        let content = toml::to_string(values)
            .map_err(|e| SubmitError::Config(format!("凭据序列化失败: {}", e)))?;
        fs::write(&self.path, content)
            .await
            .map_err(|e| SubmitError::io(self.path.display().to_string(), e))
    }
}

#[async_trait]
impl SecretStore for TomlSecretStore {
    async fn get(&self, key: &str) -> SubmitResult<Option<String>> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> SubmitResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut values = self.read_all().await?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values).await?;
        debug!("已写入凭据 {} 到 {}", key, self.path.display());
        Ok(())
    }

    async fn delete(&self, key: &str) -> SubmitResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut values = self.read_all().await?;
        if values.remove(key).is_some() {
            self.write_all(&values).await?;
        }
        Ok(())
    }
}

/// 凭据提供者
///
/// 令牌或用户ID缺失时返回 `CredentialMissing`，调用方不应重试
#[derive(Clone)]
pub struct Credentials {
    store: Arc<dyn SecretStore>,
    /// 优先于存储的值（来自环境变量）
    overrides: BTreeMap<&'static str, String>,
}

/// 覆盖令牌的环境变量
pub const AUTH_TOKEN_ENV: &str = "JUDGE_AUTH_TOKEN";
/// 覆盖用户ID的环境变量
pub const USER_ID_ENV: &str = "JUDGE_USER_ID";

impl Credentials {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self {
            store,
            overrides: BTreeMap::new(),
        }
    }

    /// 设置覆盖值，空白值忽略
    pub fn with_overrides(mut self, token: Option<String>, user_id: Option<String>) -> Self {
        for (key, value) in [(AUTH_TOKEN_KEY, token), (USER_ID_KEY, user_id)] {
            if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                self.overrides.insert(key, value.trim().to_string());
            }
        }
        self
    }

    /// 读取 `JUDGE_AUTH_TOKEN` / `JUDGE_USER_ID` 作为覆盖值
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(AUTH_TOKEN_ENV).ok(),
            std::env::var(USER_ID_ENV).ok(),
        )
    }

    pub async fn auth_token(&self) -> SubmitResult<String> {
        self.required(AUTH_TOKEN_KEY).await
    }

    pub async fn user_id(&self) -> SubmitResult<String> {
        self.required(USER_ID_KEY).await
    }

    /// 保存令牌和用户ID
    pub async fn store(&self, token: &str, user_id: &str) -> SubmitResult<()> {
        self.store.set(AUTH_TOKEN_KEY, token.trim()).await?;
        self.store.set(USER_ID_KEY, user_id.trim()).await
    }

    /// 清除令牌和用户ID
    pub async fn clear(&self) -> SubmitResult<()> {
        self.store.delete(AUTH_TOKEN_KEY).await?;
        self.store.delete(USER_ID_KEY).await
    }

    async fn required(&self, key: &str) -> SubmitResult<String> {
        if let Some(value) = self.overrides.get(key) {
            return Ok(value.clone());
        }
        match self.store.get(key).await? {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(SubmitError::CredentialMissing {
                key: key.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_credentials() {
        let credentials = Credentials::new(Arc::new(MemorySecretStore::new()));

        match credentials.auth_token().await {
            Err(SubmitError::CredentialMissing { key }) => assert_eq!(key, AUTH_TOKEN_KEY),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(
            credentials.user_id().await,
            Err(SubmitError::CredentialMissing { .. })
        ));
    }

    #[tokio::test]
    async fn test_blank_value_counts_as_missing() {
        let store = MemorySecretStore::with_credentials("", "U1");
        let credentials = Credentials::new(Arc::new(store));

        assert!(credentials.auth_token().await.is_err());
        assert_eq!(credentials.user_id().await.unwrap(), "U1");
    }

    #[tokio::test]
    async fn test_toml_store_set_get_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(TomlSecretStore::new(dir.path().join("credentials.toml")));
        let credentials = Credentials::new(store.clone());

        credentials.store(" token-123 ", "U42").await.unwrap();
        assert_eq!(credentials.auth_token().await.unwrap(), "token-123");
        assert_eq!(credentials.user_id().await.unwrap(), "U42");

        // 新实例读取同一文件
        let reopened = TomlSecretStore::new(dir.path().join("credentials.toml"));
        assert_eq!(
            reopened.get(USER_ID_KEY).await.unwrap().as_deref(),
            Some("U42")
        );

        credentials.clear().await.unwrap();
        assert!(store.get(AUTH_TOKEN_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overrides_win_over_store() {
        let store = MemorySecretStore::with_credentials("stored-token", "U1");
        let credentials = Credentials::new(Arc::new(store))
            .with_overrides(Some("env-token".to_string()), Some("  ".to_string()));

        assert_eq!(credentials.auth_token().await.unwrap(), "env-token");
        // 空白覆盖值不生效
        assert_eq!(credentials.user_id().await.unwrap(), "U1");
    }
}
