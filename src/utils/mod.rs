//! # 工具函数模块
//!
//! 提供美化输出、进度条、诊断日志等工具。
//!
//! ## 依赖关系
//! - 被 `commands/`, `batch/`, `config/` 模块使用
//! - 子模块: logging, output, progress

pub mod logging;
pub mod output;
pub mod progress;
