//! 判题结果展示 - 业务能力层
//!
//! 只负责"展示"能力，不关心结果从哪里来

use tracing::{info, warn};

use crate::models::{AggregateVerdict, OverallStatus};
use crate::services::verdict_aggregator::is_accepted_status;
use crate::utils::truncate_text;

/// 展示边界
pub trait VerdictPresenter: Send + Sync {
    fn present(&self, verdict: &AggregateVerdict, problem_title: &str);
}

/// 输出到日志的展示器
pub struct ConsolePresenter {
    /// 是否输出每个用例的输入输出
    show_io: bool,
}

impl ConsolePresenter {
    pub fn new(show_io: bool) -> Self {
        Self { show_io }
    }
}

impl VerdictPresenter for ConsolePresenter {
    fn present(&self, verdict: &AggregateVerdict, problem_title: &str) {
        let passed = verdict
            .cases
            .iter()
            .filter(|case| is_accepted_status(&case.status))
            .count();

        info!("\n{}", "─".repeat(60));
        let badge = match verdict.overall_status {
            OverallStatus::Accepted => "✅",
            OverallStatus::Failed => "❌",
            OverallStatus::Pending => "⏳",
        };
        info!(
            "{} {} - {} ({}/{} 通过)",
            badge,
            problem_title,
            verdict.overall_status,
            passed,
            verdict.cases.len()
        );
        info!("{}", "─".repeat(60));

        for (index, case) in verdict.cases.iter().enumerate() {
            let mark = if is_accepted_status(&case.status) { "✓" } else { "✗" };
            info!("  {} 用例 {}: {} ({}s)", mark, index + 1, case.status, case.time);

            if let Some(reason) = &case.decode_error {
                warn!("    解码失败: {}", reason);
                continue;
            }
            if !case.compile_output.is_empty() {
                info!("    编译输出: {}", truncate_text(&case.compile_output, 300));
            }
            if !case.stderr.is_empty() {
                info!("    stderr: {}", truncate_text(&case.stderr, 300));
            }
            if self.show_io || !is_accepted_status(&case.status) {
                info!("    输入: {}", truncate_text(case.stdin.trim_end(), 120));
                info!("    期望: {}", truncate_text(case.expected_output.trim_end(), 120));
                info!("    实际: {}", truncate_text(case.stdout.trim_end(), 120));
            }
        }
    }
}
