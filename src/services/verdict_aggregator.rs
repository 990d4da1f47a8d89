//! 判题结果汇总 - 业务能力层
//!
//! 解码每个测试用例并计算整体状态

use serde_json::Value;
use tracing::warn;

use crate::clients::{ExecutionPayload, RawTestCase};
use crate::error::SubmitResult;
use crate::infrastructure::codec;
use crate::models::{AggregateVerdict, OverallStatus, TestCaseVerdict};

/// 解码失败的用例使用的状态
pub const DECODE_ERROR_STATUS: &str = "Decode Error";

const ACCEPTED_MARKER: &str = "accepted";

/// 判断单个用例状态是否为通过
///
/// 不区分大小写的子串匹配（判题端可能返回 "Accepted (partial)" 之类的描述），
/// 但紧跟在否定词之后的 "accepted"（如 "Not Accepted"、"Unaccepted"）不算通过。
pub fn is_accepted_status(status: &str) -> bool {
    let lower = status.to_lowercase();
    let mut search_from = 0;

    while let Some(offset) = lower[search_from..].find(ACCEPTED_MARKER) {
        let start = search_from + offset;
        if !is_negated(&lower[..start]) {
            return true;
        }
        search_from = start + ACCEPTED_MARKER.len();
    }
    false
}

/// `prefix` 是 "accepted" 之前的全部文本
fn is_negated(prefix: &str) -> bool {
    // 直接前缀：unaccepted / nonaccepted
    if prefix.ends_with("un") || prefix.ends_with("non") || prefix.ends_with("non-") {
        return true;
    }
    let previous_word = prefix
        .trim_end()
        .rsplit(|c: char| !c.is_alphanumeric())
        .next()
        .unwrap_or("");
    prefix.ends_with(char::is_whitespace) && matches!(previous_word, "not" | "non" | "never")
}

/// 计算整体状态：空列表为 Pending；全部通过为 Accepted；否则 Failed
pub fn summarize(cases: &[TestCaseVerdict]) -> OverallStatus {
    if cases.is_empty() {
        OverallStatus::Pending
    } else if cases.iter().all(|case| is_accepted_status(&case.status)) {
        OverallStatus::Accepted
    } else {
        OverallStatus::Failed
    }
}

/// 解码整批测试用例，保持判题端顺序
///
/// 单个用例解码失败不会影响其他用例：该用例状态记为 "Decode Error"，
/// 失败原因写入 `decode_error`。
pub fn decode(payload: &ExecutionPayload) -> Vec<TestCaseVerdict> {
    payload
        .test_cases
        .iter()
        .enumerate()
        .map(|(index, raw)| match decode_case(raw) {
            Ok(case) => case,
            Err(e) => {
                warn!("⚠️ 第 {} 个测试用例解码失败: {}", index + 1, e);
                TestCaseVerdict {
                    status: DECODE_ERROR_STATUS.to_string(),
                    time: time_to_string(raw.time.as_ref()),
                    decode_error: Some(e.to_string()),
                    ..Default::default()
                }
            }
        })
        .collect()
}

/// 解码并汇总
pub fn aggregate(cases: Vec<TestCaseVerdict>) -> AggregateVerdict {
    AggregateVerdict {
        overall_status: summarize(&cases),
        cases,
    }
}

fn decode_case(raw: &RawTestCase) -> SubmitResult<TestCaseVerdict> {
    Ok(TestCaseVerdict {
        status: raw.status.description.clone(),
        stdin: decode_field("stdin", raw.stdin.as_deref())?,
        stdout: decode_field("stdout", raw.stdout.as_deref())?,
        expected_output: decode_field("expected_output", raw.expected_output.as_deref())?,
        compile_output: decode_field("compile_output", raw.compile_output.as_deref())?,
        stderr: decode_field("stderr", raw.stderr.as_deref())?,
        time: time_to_string(raw.time.as_ref()),
        decode_error: None,
    })
}

/// 缺失或 null 的字段解码为空字符串
fn decode_field(field: &str, value: Option<&str>) -> SubmitResult<String> {
    match value {
        Some(encoded) => codec::decode(field, encoded),
        None => Ok(String::new()),
    }
}

fn time_to_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
