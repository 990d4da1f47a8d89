//! # Judge Submit
//!
//! 将本地解决方案提交到在线判题服务，轮询判题结果并逐个用例展示
//!
//! ## 架构设计
//!
//! 本系统采用严格的分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有 HTTP 客户端与凭据存储，只暴露能力
//! - `HttpExecutor` - 唯一的 reqwest Client owner
//! - `Credentials` - 令牌 / 用户ID，缺失时立即失败
//!
//! ### ② 客户端层（Clients）
//! - `clients/` - 判题端协议：提交、提交记录、执行结果、得分
//! - `JudgeApi` - 流程层依赖的 trait，测试时可替换
//!
//! ### ③ 业务能力层（Services）
//! - `IdentityIndex` - questionId → module / section
//! - `VerdictPoller` - 固定间隔、固定次数的轮询
//! - `verdict_aggregator` - 解码用例并计算整体状态
//! - `VerdictPresenter` - 展示边界
//! - `HeaderParser` / `MetaCache` / `ScoreSync`
//!
//! ### ④ 流程层（Workflow）
//! - `SubmissionFlow` - 一次提交：身份 → 提交 → 列表 → 轮询 → 汇总 → 展示
//! - `SubmissionCtx` - 日志上下文
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 组装依赖、并发提交、命令调度
//! - `orchestrator/file_processor` - 单个文件的提交
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{JudgeApi, JudgeClient};
pub use config::Config;
pub use error::{SubmissionFailure, SubmissionStage, SubmitError, SubmitResult};
pub use infrastructure::{Credentials, MemorySecretStore, SecretStore, TomlSecretStore};
pub use models::{AggregateVerdict, OverallStatus, ProblemIdentity, ProblemMeta, TestCaseVerdict};
pub use orchestrator::{App, SubmitStats};
pub use services::{IdentityIndex, MetaCache, RetryPolicy, VerdictPoller, VerdictPresenter};
pub use workflow::{SubmissionCtx, SubmissionFlow};
