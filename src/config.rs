use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{SubmitError, SubmitResult};

/// 程序配置文件
///
/// 优先级：环境变量 > TOML 配置文件 > 默认值
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 判题 API 根地址
    pub api_base_url: String,
    /// 提交代码接口路径，支持 `{moduleId}` 占位符
    pub submit_path: String,
    /// 提交记录列表接口路径，支持 `{problemId}` `{userId}` `{moduleId}`
    pub submissions_path: String,
    /// 按执行ID查询判题结果接口路径，支持 `{executionId}`
    pub execution_path: String,
    /// 模块得分接口路径，支持 `{moduleId}` `{userId}`
    pub scores_path: String,
    /// 题库目录（包含 database/allQuestionDescriptions.json）
    pub catalog_root: PathBuf,
    /// 凭据存储文件
    pub credentials_file: PathBuf,
    /// 缓存的上一题元数据文件
    pub last_problem_file: PathBuf,
    /// 轮询判题结果的重试次数（不含首次）
    pub poll_retries: usize,
    /// 每次轮询前的固定等待秒数
    pub poll_delay_secs: u64,
    /// 单个 HTTP 请求超时秒数
    pub request_timeout_secs: u64,
    /// 同时提交的文件数量
    pub max_concurrent_submissions: usize,
    /// 默认语言ID（文件头未声明时使用）
    pub default_language_id: u32,
    /// 默认语言名称
    pub default_language_name: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.kodnest.in".to_string(),
            // 接口路径没有可靠的默认值，必须由配置文件或环境变量给出
            submit_path: String::new(),
            submissions_path: String::new(),
            execution_path: String::new(),
            scores_path: String::new(),
            catalog_root: PathBuf::from("."),
            credentials_file: PathBuf::from("credentials.toml"),
            last_problem_file: PathBuf::from("last_problem.json"),
            poll_retries: 3,
            poll_delay_secs: 10,
            request_timeout_secs: 30,
            max_concurrent_submissions: 4,
            default_language_id: 62,
            default_language_name: "Java (OpenJDK 13.0.1)".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 加载配置：可选的 TOML 文件，再叠加环境变量
    ///
    /// 任一接口路径为空时返回 `SubmitError::Config`
    pub fn load(path: Option<&Path>) -> SubmitResult<Self> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        let config = base.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件读取配置，缺失字段使用默认值
    pub fn from_toml_file(path: &Path) -> SubmitResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SubmitError::io(path.display().to_string(), e))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> SubmitResult<Self> {
        toml::from_str(content).map_err(|e| SubmitError::Config(e.to_string()))
    }

    fn with_env_overrides(self) -> Self {
        let default = self;
        Self {
            api_base_url: std::env::var("JUDGE_API_BASE_URL").unwrap_or(default.api_base_url),
            submit_path: std::env::var("JUDGE_SUBMIT_PATH").unwrap_or(default.submit_path),
            submissions_path: std::env::var("JUDGE_SUBMISSIONS_PATH").unwrap_or(default.submissions_path),
            execution_path: std::env::var("JUDGE_EXECUTION_PATH").unwrap_or(default.execution_path),
            scores_path: std::env::var("JUDGE_SCORES_PATH").unwrap_or(default.scores_path),
            catalog_root: std::env::var("CATALOG_ROOT").map(PathBuf::from).unwrap_or(default.catalog_root),
            credentials_file: std::env::var("CREDENTIALS_FILE").map(PathBuf::from).unwrap_or(default.credentials_file),
            last_problem_file: std::env::var("LAST_PROBLEM_FILE").map(PathBuf::from).unwrap_or(default.last_problem_file),
            poll_retries: std::env::var("POLL_RETRIES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.poll_retries),
            poll_delay_secs: std::env::var("POLL_DELAY_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.poll_delay_secs),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            max_concurrent_submissions: std::env::var("MAX_CONCURRENT_SUBMISSIONS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_submissions),
            default_language_id: std::env::var("DEFAULT_LANGUAGE_ID").ok().and_then(|v| v.parse().ok()).unwrap_or(default.default_language_id),
            default_language_name: std::env::var("DEFAULT_LANGUAGE_NAME").unwrap_or(default.default_language_name),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    fn validate(&self) -> SubmitResult<()> {
        let missing: Vec<&str> = [
            ("submit_path", &self.submit_path),
            ("submissions_path", &self.submissions_path),
            ("execution_path", &self.execution_path),
            ("scores_path", &self.scores_path),
        ]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

        if missing.is_empty() {
            return Ok(());
        }
        Err(SubmitError::Config(format!(
            "未配置接口路径: {}",
            missing.join(", ")
        )))
    }

    pub fn poll_delay(&self) -> Duration {
        Duration::from_secs(self.poll_delay_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// 拼接完整接口地址，并替换路径中的占位符
    pub fn endpoint(&self, template: &str, params: &[(&str, &str)]) -> String {
        let mut path = template.to_string();
        for (key, value) in params {
            path = path.replace(&format!("{{{}}}", key), value);
        }
        format!("{}{}", self.api_base_url.trim_end_matches('/'), path)
    }
}
