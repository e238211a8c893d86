//! # 美化输出工具
//!
//! 提供统一的终端输出样式。每条消息一次 `println!`，并发任务的输出行不会交错。
//!
//! ## 依赖关系
//! - 被 `commands/`, `batch/`, `config/` 模块使用
//! - 使用 `colored`, `console`, `tabled` crate

use crate::batch::runner::Failure;

use colored::Colorize;
use console::Term;
use tabled::{Table, Tabled};

/// 打印成功消息
pub fn print_success(msg: &str) {
    println!("{} {}", "[OK]".green().bold(), msg);
}

/// 打印错误消息
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印跳过消息
pub fn print_skip(msg: &str) {
    println!("{} {}", "[SKIP]".dimmed(), msg);
}

/// 打印完成消息
pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// 打印转换成功消息
pub fn print_conversion(from: &str, to: &str) {
    println!(
        "{} {} {} {}",
        "[OK]".green().bold(),
        from.dimmed(),
        "->".cyan(),
        to
    );
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}

/// 打印分隔线
pub fn print_separator() {
    println!("{}", "─".repeat(60).dimmed());
}

#[derive(Tabled)]
struct FailureRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Stage")]
    stage: String,
    #[tabled(rename = "Error")]
    error: String,
}

/// 打印失败文件表格（最多 `limit` 行）
pub fn print_failures(failures: &[Failure], limit: usize) {
    let rows: Vec<FailureRow> = failures
        .iter()
        .take(limit)
        .map(|f| FailureRow {
            file: f.path.display().to_string(),
            stage: f.stage.to_string(),
            error: f.error.clone(),
        })
        .collect();

    println!("{}", Table::new(&rows));
    if failures.len() > limit {
        print_warning(&format!("  ... and {} more", failures.len() - limit));
    }
}

/// 询问 y/n，非交互终端视为否
pub fn confirm(question: &str) -> bool {
    let term = Term::stdout();
    if term
        .write_str(&format!("{} {} (y/n): ", "[?]".cyan().bold(), question))
        .is_err()
    {
        return false;
    }

    match term.read_line() {
        Ok(answer) => answer.trim().eq_ignore_ascii_case("y"),
        Err(_) => false,
    }
}
