//! 提交上下文
//!
//! 封装"我正在提交第几个文件"这一信息，只用于日志

use std::fmt::Display;

#[derive(Debug, Clone)]
pub struct SubmissionCtx {
    /// 文件在本次批量提交中的序号（从1开始）
    pub file_index: usize,

    /// 文件名
    pub file_name: String,
}

impl SubmissionCtx {
    pub fn new(file_index: usize, file_name: impl Into<String>) -> Self {
        Self {
            file_index,
            file_name: file_name.into(),
        }
    }
}

impl Display for SubmissionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[文件#{} {}]", self.file_index, self.file_name)
    }
}
