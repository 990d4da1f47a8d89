//! 题库数据结构
//!
//! 对应 `database/allQuestionDescriptions.json`：
//! 模块列表 → 每个模块按 sectionId 分组 → 每组按题目 key 存放题目

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 整个题库
pub type Catalog = Vec<CatalogModule>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogModule {
    #[serde(default)]
    pub module: ModuleInfo,
    /// sectionId → (题目 key → 题目)
    #[serde(default)]
    pub sections: BTreeMap<String, BTreeMap<String, CatalogQuestion>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleInfo {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogQuestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// 其余字段（描述、标签、样例、语言模板等）原样保留
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogQuestion {
    /// 题目ID：优先使用 `id` 字段，为空时退回到题目在分组中的 key
    pub fn effective_id<'a>(&'a self, key: &'a str) -> &'a str {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => key,
        }
    }
}

/// 单题得分状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub problem_id: String,
    pub status: String,
}
