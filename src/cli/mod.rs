//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数。
//!
//! ## 命令结构
//! `modify <DIRECTORY> [--config <PATH>] [--jobs <N>] [--verbose]`
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: modify

pub mod modify;

use clap::Parser;

/// modify - 通过远程对话补全服务批量转换文件
#[derive(Parser, Debug)]
#[command(name = "modify")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Batch-transform files through a remote chat-completion service", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub args: modify::ModifyArgs,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}
