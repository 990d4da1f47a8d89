pub mod judge_client;
pub mod wire;

pub use judge_client::{JudgeApi, JudgeClient};
pub use wire::{ExecutionPayload, RawStatus, RawTestCase};
