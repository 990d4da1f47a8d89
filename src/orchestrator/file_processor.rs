//! 单个文件处理器 - 编排层
//!
//! 读取解决方案文件 → 构建上下文 → 委托 `SubmissionFlow` 完成提交

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::models::OverallStatus;
use crate::services::{HeaderParser, SolutionFile};
use crate::workflow::{SubmissionCtx, SubmissionFlow};

/// 单个文件的提交结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// 全部用例通过
    Accepted,
    /// 判题完成但未全部通过
    Rejected(OverallStatus),
}

/// 处理单个解决方案文件
///
/// 流程失败（身份不完整、网络错误、轮询耗尽等）以 `Err` 返回，
/// 错误信息包含失败阶段
pub async fn process_file(
    flow: &SubmissionFlow,
    parser: &HeaderParser,
    path: &Path,
    file_index: usize,
) -> Result<FileOutcome> {
    let file = SolutionFile::load(path, parser)
        .await
        .with_context(|| format!("无法读取解决方案文件: {}", path.display()))?;

    let ctx = SubmissionCtx::new(file_index, file_name(path));
    info!("{} 🔍 开始提交", ctx);

    match flow.run(&file.header, &file.text, &ctx).await {
        Ok(verdict) if verdict.overall_status == OverallStatus::Accepted => {
            info!("{} ✅ 全部通过", ctx);
            Ok(FileOutcome::Accepted)
        }
        Ok(verdict) => {
            info!("{} ❌ 判题结果: {}", ctx, verdict.overall_status);
            Ok(FileOutcome::Rejected(verdict.overall_status))
        }
        Err(failure) => {
            error!("{} {}", ctx, failure);
            Err(failure).with_context(|| format!("{} 提交失败", ctx))
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
