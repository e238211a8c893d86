//! # 诊断日志
//!
//! 初始化 `tracing` 订阅器，日志写到 stderr，与逐文件结果输出分开。
//! `RUST_LOG` 优先；否则默认 `warn`，`--verbose` 时为 `debug`。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `tracing-subscriber`

use tracing_subscriber::EnvFilter;

/// 初始化日志，重复调用无副作用
pub fn init(verbose: bool) {
    let default_level = if verbose { "modify=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
