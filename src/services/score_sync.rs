//! 得分同步 - 业务能力层
//!
//! 拉取某个模块的得分，规范化状态后写回本地题库

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::clients::JudgeApi;
use crate::error::{SubmitError, SubmitResult};
use crate::models::{save_catalog, Catalog, CatalogLoader, Score};

/// 将判题端的状态描述映射为题库使用的状态
pub fn normalize_score_status(status: &str) -> String {
    let s = status.trim().to_lowercase();
    match s.as_str() {
        "accepted" | "completed" | "solved" | "done" | "passed" | "pass" => "solved".to_string(),
        "wrong answer" | "wa" | "failed" | "fail" => "wrong_answer".to_string(),
        _ if s.contains("error") => "error".to_string(),
        "pending" | "in_progress" | "running" | "queued" => "pending".to_string(),
        _ => status.to_string(),
    }
}

/// 把得分写入题库中对应模块，返回状态发生变化的题目数
pub fn apply_scores(catalog: &mut Catalog, module_id: &str, scores: &[Score]) -> usize {
    let by_problem: HashMap<&str, String> = scores
        .iter()
        .map(|score| (score.problem_id.as_str(), normalize_score_status(&score.status)))
        .collect();

    let mut updated = 0;
    for module in catalog.iter_mut().filter(|m| m.module.id == module_id) {
        for questions in module.sections.values_mut() {
            for (key, question) in questions.iter_mut() {
                let question_id = question.effective_id(key).to_string();
                let Some(status) = by_problem.get(question_id.as_str()) else {
                    continue;
                };
                if question.status.as_deref() != Some(status.as_str()) {
                    question.status = Some(status.clone());
                    updated += 1;
                }
            }
        }
    }
    updated
}

/// 得分同步服务
pub struct ScoreSync {
    api: Arc<dyn JudgeApi>,
    loader: Arc<dyn CatalogLoader>,
}

impl ScoreSync {
    pub fn new(api: Arc<dyn JudgeApi>, loader: Arc<dyn CatalogLoader>) -> Self {
        Self { api, loader }
    }

    /// 同步一个模块的得分；没有变化时不写文件
    pub async fn sync(&self, catalog_root: &Path, module_id: &str) -> SubmitResult<usize> {
        let scores = self.api.fetch_scores(module_id).await?;
        if scores.is_empty() {
            return Err(SubmitError::NoScoresFound {
                module_id: module_id.to_string(),
            });
        }
        info!("📊 模块 {} 获取到 {} 条得分", module_id, scores.len());

        let mut catalog = self.loader.load(catalog_root).await?;
        let updated = apply_scores(&mut catalog, module_id, &scores);

        if updated > 0 {
            save_catalog(catalog_root, &catalog).await?;
        }
        info!("✓ 更新了 {} 道题目的状态", updated);

        Ok(updated)
    }
}
