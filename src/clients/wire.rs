//! 判题 API 响应结构及解析
//!
//! 所有响应都包在 `{ "data": ... }` 里

use serde::Deserialize;
use serde_json::Value;

use crate::error::{SubmitError, SubmitResult};
use crate::models::Score;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ItemList<T> {
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct SubmissionItem {
    id: Value,
}

#[derive(Debug, Deserialize)]
struct ScoreItem {
    id: Value,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExecutionData {
    response: ExecutionPayload,
}

/// 按执行ID查询到的原始判题结果（字段仍是 base64）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutionPayload {
    pub test_cases: Vec<RawTestCase>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTestCase {
    #[serde(default)]
    pub status: RawStatus,
    #[serde(default)]
    pub stdin: Option<String>,
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub expected_output: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(default)]
    pub compile_output: Option<String>,
    /// 判题端可能返回字符串或数字
    #[serde(default)]
    pub time: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStatus {
    #[serde(default)]
    pub description: String,
}

/// 解析提交记录列表，按原顺序返回执行ID
pub fn parse_submission_ids(body: &str) -> SubmitResult<Vec<String>> {
    let envelope: Envelope<ItemList<SubmissionItem>> =
        serde_json::from_str(body).map_err(|e| SubmitError::decode("data.items", e))?;

    envelope
        .data
        .items
        .into_iter()
        .map(|item| id_to_string(item.id, "data.items[].id"))
        .collect()
}

/// 解析执行结果
pub fn parse_execution(body: &str) -> SubmitResult<ExecutionPayload> {
    let envelope: Envelope<ExecutionData> = serde_json::from_str(body)
        .map_err(|e| SubmitError::decode("data.response.test_cases", e))?;
    Ok(envelope.data.response)
}

/// 解析模块得分列表
pub fn parse_scores(body: &str) -> SubmitResult<Vec<Score>> {
    let envelope: Envelope<ItemList<ScoreItem>> =
        serde_json::from_str(body).map_err(|e| SubmitError::decode("data.items", e))?;

    envelope
        .data
        .items
        .into_iter()
        .map(|item| {
            Ok(Score {
                problem_id: id_to_string(item.id, "data.items[].id")?,
                status: item.status.unwrap_or_default(),
            })
        })
        .collect()
}

fn id_to_string(id: Value, field: &str) -> SubmitResult<String> {
    match id {
        Value::String(s) if !s.is_empty() => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(SubmitError::decode(field, format!("非法ID: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_submission_ids_keeps_order() {
        let body = r#"{"data":{"items":[{"id":"E2","status":"x"},{"id":"E1"},{"id":7}]}}"#;
        assert_eq!(parse_submission_ids(body).unwrap(), vec!["E2", "E1", "7"]);
    }

    #[test]
    fn test_parse_submission_ids_empty_list() {
        let body = r#"{"data":{"items":[]}}"#;
        assert!(parse_submission_ids(body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_submission_ids_missing_items() {
        let body = r#"{"data":{}}"#;
        assert!(matches!(
            parse_submission_ids(body),
            Err(SubmitError::DecodeFailure { .. })
        ));
    }

    #[test]
    fn test_parse_execution() {
        let body = r#"{"data":{"response":{"test_cases":[
            {"status":{"id":3,"description":"Accepted"},"stdin":"MQ==","stdout":"Mg==",
             "expected_output":"Mg==","stderr":null,"compile_output":null,"time":"0.01"}
        ]}}}"#;

        let payload = parse_execution(body).unwrap();

        assert_eq!(payload.test_cases.len(), 1);
        let case = &payload.test_cases[0];
        assert_eq!(case.status.description, "Accepted");
        assert_eq!(case.stdin.as_deref(), Some("MQ=="));
        assert!(case.stderr.is_none());
    }

    #[test]
    fn test_parse_execution_missing_test_cases() {
        let body = r#"{"data":{"response":{}}}"#;
        assert!(matches!(
            parse_execution(body),
            Err(SubmitError::DecodeFailure { .. })
        ));
    }

    #[test]
    fn test_parse_scores() {
        let body = r#"{"data":{"items":[{"id":"Q1","status":"Accepted"},{"id":"Q2"}]}}"#;
        let scores = parse_scores(body).unwrap();
        assert_eq!(scores[0].problem_id, "Q1");
        assert_eq!(scores[0].status, "Accepted");
        assert_eq!(scores[1].status, "");
    }
}
