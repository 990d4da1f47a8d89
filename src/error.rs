use std::fmt;

use thiserror::Error;

/// 提交流程错误类型
///
/// 每个变体对应流水线中一种可区分的失败原因，
/// 由 `SubmissionFlow` 在边界处包装成 [`SubmissionFailure`]。
#[derive(Debug, Error)]
pub enum SubmitError {
    /// 凭据未设置（令牌或用户ID）
    #[error("凭据缺失: {key} 未设置，请先执行 login")]
    CredentialMissing { key: String },

    /// 题目身份不完整，禁止提交
    #[error("题目信息不完整，缺少: {}", .missing.join(", "))]
    IncompleteIdentity { missing: Vec<&'static str> },

    /// 判题端拒绝提交
    #[error("提交被拒绝 (状态码: {status:?}): {message}")]
    SubmissionRejected {
        status: Option<u16>,
        message: String,
    },

    /// 提交记录列表为空
    #[error("未找到题目 {question_id} 的提交记录")]
    NoSubmissionsFound { question_id: String },

    /// 重试次数耗尽仍未拿到判题结果
    #[error("判题结果不可用 (已尝试 {attempts} 次): {last}")]
    VerdictUnavailable {
        attempts: usize,
        #[source]
        last: Box<SubmitError>,
    },

    /// 判题端没有返回任何得分
    #[error("模块 {module_id} 没有得分记录")]
    NoScoresFound { module_id: String },

    /// 判题结果尚未就绪（测试用例为空）
    #[error("判题结果为空，评测可能尚未完成")]
    VerdictPending,

    /// base64 或 JSON 字段解析失败
    #[error("解码失败 ({field}): {reason}")]
    DecodeFailure { field: String, reason: String },

    /// 网络请求失败
    #[error("请求失败 ({endpoint}): {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 文件读写失败
    #[error("文件操作失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 文件头解析用的正则无法编译
    #[error("正则表达式错误: {0}")]
    Pattern(#[from] regex::Error),
}

impl SubmitError {
    /// 创建网络请求错误
    pub fn http(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        SubmitError::Http {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// 创建文件操作错误
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        SubmitError::Io {
            path: path.into(),
            source,
        }
    }

    /// 创建解码错误
    pub fn decode(field: impl Into<String>, reason: impl fmt::Display) -> Self {
        SubmitError::DecodeFailure {
            field: field.into(),
            reason: reason.to_string(),
        }
    }
}

/// 提交流水线的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStage {
    Idle,
    IdentityResolved,
    Dispatched,
    Listing,
    Polling,
    Decoded,
    Presented,
}

impl fmt::Display for SubmissionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubmissionStage::Idle => "空闲",
            SubmissionStage::IdentityResolved => "解析题目信息",
            SubmissionStage::Dispatched => "提交代码",
            SubmissionStage::Listing => "获取提交记录",
            SubmissionStage::Polling => "轮询判题结果",
            SubmissionStage::Decoded => "解析判题结果",
            SubmissionStage::Presented => "展示判题结果",
        };
        f.write_str(name)
    }
}

/// 流水线失败：记录失败的目标阶段及底层原因
///
/// `stage` 是正在尝试进入的阶段，例如身份解析失败记为 `IdentityResolved`。
#[derive(Debug, Error)]
#[error("[{stage}] 阶段失败: {source}")]
pub struct SubmissionFailure {
    pub stage: SubmissionStage,
    #[source]
    pub source: SubmitError,
}

impl SubmissionFailure {
    pub fn new(stage: SubmissionStage, source: SubmitError) -> Self {
        Self { stage, source }
    }
}

/// 库内结果类型
pub type SubmitResult<T> = Result<T, SubmitError>;
