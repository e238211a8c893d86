//! # 数据模型模块
//!
//! 定义运行配置、凭据池和单文件任务的数据模型。
//!
//! ## 依赖关系
//! - 被 `config/`, `batch/`, `transform/` 和 `commands/` 使用
//! - 子模块: configuration, credentials, task

pub mod configuration;
pub mod credentials;
pub mod task;

pub use configuration::{Configuration, OutputMode};
pub use credentials::CredentialPool;
pub use task::{FileTask, TaskState};
