use serde::{Deserialize, Serialize};

use crate::error::{SubmitError, SubmitResult};

/// 题目身份：提交前三个字段都必须非空
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProblemIdentity {
    pub question_id: String,
    pub module_id: String,
    pub section_id: String,
}

/// 编程语言
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub id: u32,
    pub name: String,
}

/// 题目元数据（可能不完整）
///
/// 来源：解决方案文件头部注释，或上一次提交缓存的元数据
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_name: Option<String>,
}

impl ProblemMeta {
    /// 合并元数据：自身非空字段优先，缺失的字段从 `fallback` 补齐
    pub fn merged_with(&self, fallback: &ProblemMeta) -> ProblemMeta {
        ProblemMeta {
            id: first_present(&self.id, &fallback.id),
            title: first_present(&self.title, &fallback.title),
            module_id: first_present(&self.module_id, &fallback.module_id),
            section_id: first_present(&self.section_id, &fallback.section_id),
            language_id: self.language_id.or(fallback.language_id),
            language_name: first_present(&self.language_name, &fallback.language_name),
        }
    }

    /// 显示用标题
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("未知题目")
    }
}

fn first_present(primary: &Option<String>, fallback: &Option<String>) -> Option<String> {
    non_empty(primary.as_deref())
        .or_else(|| non_empty(fallback.as_deref()))
        .map(str::to_string)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn normalize(value: String) -> Option<String> {
    non_empty(Some(value.as_str())).map(str::to_string)
}

/// 题目身份构建器
///
/// 逐步收集 question/module/section，`build()` 时校验完整性
#[derive(Debug, Clone, Default)]
pub struct ProblemIdentityBuilder {
    question_id: Option<String>,
    module_id: Option<String>,
    section_id: Option<String>,
}

impl ProblemIdentityBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_meta(meta: &ProblemMeta) -> Self {
        Self {
            question_id: non_empty(meta.id.as_deref()).map(str::to_string),
            module_id: non_empty(meta.module_id.as_deref()).map(str::to_string),
            section_id: non_empty(meta.section_id.as_deref()).map(str::to_string),
        }
    }

    pub fn question_id(mut self, value: impl Into<String>) -> Self {
        self.question_id = normalize(value.into());
        self
    }

    pub fn module_id(mut self, value: impl Into<String>) -> Self {
        self.module_id = normalize(value.into());
        self
    }

    pub fn section_id(mut self, value: impl Into<String>) -> Self {
        self.section_id = normalize(value.into());
        self
    }

    /// 只填补尚未设置的 module / section
    pub fn fill_location(mut self, module_id: &str, section_id: &str) -> Self {
        if self.module_id.is_none() {
            self.module_id = non_empty(Some(module_id)).map(str::to_string);
        }
        if self.section_id.is_none() {
            self.section_id = non_empty(Some(section_id)).map(str::to_string);
        }
        self
    }

    /// module 或 section 是否仍缺失
    pub fn needs_location(&self) -> bool {
        self.module_id.is_none() || self.section_id.is_none()
    }

    pub fn current_question_id(&self) -> Option<&str> {
        self.question_id.as_deref()
    }

    pub fn build(self) -> SubmitResult<ProblemIdentity> {
        match (self.question_id, self.module_id, self.section_id) {
            (Some(question_id), Some(module_id), Some(section_id)) => Ok(ProblemIdentity {
                question_id,
                module_id,
                section_id,
            }),
            (question_id, module_id, section_id) => {
                let mut missing = Vec::new();
                if module_id.is_none() {
                    missing.push("moduleId");
                }
                if section_id.is_none() {
                    missing.push("sectionId");
                }
                if question_id.is_none() {
                    missing.push("questionId");
                }
                Err(SubmitError::IncompleteIdentity { missing })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(id: &str, module: Option<&str>, section: Option<&str>) -> ProblemMeta {
        ProblemMeta {
            id: Some(id.to_string()),
            module_id: module.map(str::to_string),
            section_id: section.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_complete_identity() {
        let identity = ProblemIdentityBuilder::from_meta(&meta("Q1", Some("M1"), Some("S1")))
            .build()
            .unwrap();
        assert_eq!(identity.question_id, "Q1");
        assert_eq!(identity.module_id, "M1");
        assert_eq!(identity.section_id, "S1");
    }

    #[test]
    fn test_empty_section_is_incomplete() {
        let result = ProblemIdentityBuilder::from_meta(&meta("Q1", Some("M1"), Some(""))).build();
        match result {
            Err(SubmitError::IncompleteIdentity { missing }) => assert_eq!(missing, vec!["sectionId"]),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_whitespace_counts_as_missing() {
        let builder = ProblemIdentityBuilder::new()
            .question_id("  ")
            .module_id("M1")
            .section_id("S1");
        assert!(matches!(
            builder.build(),
            Err(SubmitError::IncompleteIdentity { .. })
        ));
    }

    #[test]
    fn test_fill_location_keeps_existing_values() {
        let builder = ProblemIdentityBuilder::from_meta(&meta("Q1", Some("M-header"), None))
            .fill_location("M-index", "S-index");
        let identity = builder.build().unwrap();
        assert_eq!(identity.module_id, "M-header");
        assert_eq!(identity.section_id, "S-index");
    }

    #[test]
    fn test_merge_prefers_primary_and_fills_gaps() {
        let header = ProblemMeta {
            id: Some("Q1".to_string()),
            title: Some("Two Sum".to_string()),
            module_id: Some(String::new()),
            ..Default::default()
        };
        let cached = ProblemMeta {
            id: Some("Q0".to_string()),
            module_id: Some("M1".to_string()),
            section_id: Some("S1".to_string()),
            language_id: Some(71),
            ..Default::default()
        };

        let merged = header.merged_with(&cached);

        assert_eq!(merged.id.as_deref(), Some("Q1"));
        assert_eq!(merged.title.as_deref(), Some("Two Sum"));
        assert_eq!(merged.module_id.as_deref(), Some("M1"));
        assert_eq!(merged.section_id.as_deref(), Some("S1"));
        assert_eq!(merged.language_id, Some(71));
    }
}
