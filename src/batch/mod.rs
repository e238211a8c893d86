//! # 批量处理模块
//!
//! 提供文件发现、并行执行和输出写入能力。
//!
//! ## 功能
//! - 递归收集匹配扩展名的文件
//! - 固定容量线程池并行处理
//! - 后缀/替换两种输出模式
//! - 进度反馈与统计
//!
//! ## 依赖关系
//! - 被 `commands/modify.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod collector;
pub mod runner;
pub mod writer;

pub use collector::FileCollector;
pub use runner::{BatchResult, BatchRunner, ProcessResult, DEFAULT_JOBS};
pub use writer::{resolve_destination, write_output, Destination, WriteOutcome};
