//! # modify 命令 CLI 定义
//!
//! 递归转换目录下匹配扩展名的文件。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/modify.rs`

use crate::batch::DEFAULT_JOBS;

use clap::Args;
use std::path::PathBuf;

/// modify 命令参数
#[derive(Args, Debug)]
pub struct ModifyArgs {
    /// Target directory containing files to process
    pub directory: PathBuf,

    /// Path to the configuration JSON file (default: config.json next to the executable)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of parallel workers (0 = auto)
    #[arg(short, long, default_value_t = DEFAULT_JOBS)]
    pub jobs: usize,
}
