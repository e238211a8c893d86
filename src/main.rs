//! # modify - 批量文件转换工具
//!
//! 递归发现目录下匹配扩展名的文件，逐个发送到远程对话补全服务，
//! 把返回的转换结果写到带后缀的新文件或原地替换（保留 .bak 备份）。
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── config/    (配置与凭据加载)
//!   │     ├── batch/     (文件发现、线程池、输出写入)
//!   │     ├── transform/ (远程请求与响应提取)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (输出、进度条、日志)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod config;
mod error;
mod models;
mod transform;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    utils::logging::init(cli.verbose);

    if let Err(e) = commands::run(cli) {
        utils::output::print_error(&format!("Fatal error: {}", e));
        std::process::exit(1);
    }
}
