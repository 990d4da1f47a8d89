use std::fmt;

use serde::Serialize;

/// 单个测试用例的判题结果（已解码）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestCaseVerdict {
    /// 判题端给出的状态描述，原样透传
    pub status: String,
    pub stdin: String,
    pub stdout: String,
    pub expected_output: String,
    pub compile_output: String,
    pub stderr: String,
    pub time: String,
    /// 该用例解码失败时的原因；此时 `status` 为 "Decode Error"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decode_error: Option<String>,
}

impl TestCaseVerdict {
    /// 仅带状态的用例，测试和占位时使用
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            ..Default::default()
        }
    }
}

/// 整体判题状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OverallStatus {
    Accepted,
    Failed,
    Pending,
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            OverallStatus::Accepted => "Accepted",
            OverallStatus::Failed => "Failed",
            OverallStatus::Pending => "Pending",
        };
        f.write_str(text)
    }
}

/// 汇总后的判题结果，用例顺序与判题端一致
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateVerdict {
    pub overall_status: OverallStatus,
    pub cases: Vec<TestCaseVerdict>,
}
