//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责组装依赖和调度命令，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量提交处理器
//! - 管理应用生命周期（初始化、运行）
//! - 控制并发提交数量（Semaphore）
//! - 凭据管理、得分同步、文件头查看
//! - 输出全局统计信息
//!
//! ### `file_processor` - 单个文件处理器
//! - 读取解决方案文件并解析文件头
//! - 构建 `SubmissionCtx`，委托 `SubmissionFlow`
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<PathBuf>)
//!     ↓
//! file_processor (处理单个文件)
//!     ↓
//! workflow::SubmissionFlow (一次提交)
//!     ↓
//! services (能力层：索引 / 轮询 / 汇总 / 展示)
//!     ↓
//! clients + infrastructure (判题端、HTTP、凭据)
//! ```

pub mod batch_processor;
pub mod file_processor;

pub use batch_processor::{App, SubmitStats};
pub use file_processor::{process_file, FileOutcome};
