use serde::{Deserialize, Serialize};

use crate::infrastructure::codec;
use crate::models::problem::{Language, ProblemIdentity};

/// 一次提交的全部数据，只在提交时构造，不落盘
#[derive(Debug, Clone)]
pub struct SourceSubmission {
    pub identity: ProblemIdentity,
    pub user_id: String,
    pub language: Language,
    pub source_code_raw: String,
    pub time_taken_ms: u64,
}

impl SourceSubmission {
    /// 转换为判题端要求的请求体
    pub fn to_request(&self) -> SubmitRequestBody {
        SubmitRequestBody {
            user_id: self.user_id.clone(),
            section_id: self.identity.section_id.clone(),
            kind: "programming".to_string(),
            response: SubmitResponseField {
                source_code: codec::encode(&self.source_code_raw),
                language_id: self.language.id,
            },
            question_id: self.identity.question_id.clone(),
            time_taken: self.time_taken_ms,
            language: self.language.clone(),
        }
    }
}

/// 提交接口请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequestBody {
    pub user_id: String,
    pub section_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub response: SubmitResponseField,
    pub question_id: String,
    pub time_taken: u64,
    pub language: Language,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponseField {
    /// base64 编码后的源代码
    pub source_code: String,
    pub language_id: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_wire_shape() {
        let submission = SourceSubmission {
            identity: ProblemIdentity {
                question_id: "Q1".to_string(),
                module_id: "M1".to_string(),
                section_id: "S1".to_string(),
            },
            user_id: "U1".to_string(),
            language: Language {
                id: 62,
                name: "Java (OpenJDK 13.0.1)".to_string(),
            },
            source_code_raw: "hello".to_string(),
            time_taken_ms: 0,
        };

        let body = serde_json::to_value(submission.to_request()).unwrap();

        assert_eq!(
            body,
            json!({
                "user_id": "U1",
                "section_id": "S1",
                "type": "programming",
                "response": { "source_code": "aGVsbG8=", "language_id": 62 },
                "question_id": "Q1",
                "time_taken": 0,
                "language": { "id": 62, "name": "Java (OpenJDK 13.0.1)" }
            })
        );
    }
}
