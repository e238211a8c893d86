//! # modify 命令实现
//!
//! 递归发现文件，逐个发送到远程转换服务并写回结果。
//!
//! ## 功能
//! - 加载配置（缺失时可交互创建默认配置）
//! - 定位环境文件并加载凭据池
//! - 固定容量线程池并行处理，每个文件独立成败
//! - 后缀输出或原地替换（保留 .bak 备份）
//! - 运行结束打印统计与失败列表
//!
//! ## 依赖关系
//! - 使用 `cli/modify.rs` 定义的参数
//! - 使用 `config/`, `batch/`, `transform/`, `models/`
//! - 使用 `utils/output.rs`

use crate::batch::{
    resolve_destination, write_output, BatchResult, BatchRunner, Destination, FileCollector,
    ProcessResult, WriteOutcome,
};
use crate::cli::modify::ModifyArgs;
use crate::config::{self, env};
use crate::error::{ModifyError, Result};
use crate::models::{Configuration, CredentialPool, FileTask, OutputMode, TaskState};
use crate::transform::{self, TransformationClient};
use crate::utils::output;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 失败列表最多显示行数
const MAX_FAILURES_SHOWN: usize = 10;

/// 执行 modify 命令
pub fn execute(args: ModifyArgs) -> Result<()> {
    output::print_header("Batch File Transformation");

    let config_path = args.config.unwrap_or_else(config::default_config_path);
    let config = match config::load_config(&config_path) {
        Err(ModifyError::ConfigNotFound { .. }) => return bootstrap_config(&config_path),
        other => other?,
    };

    let client =
        TransformationClient::new(config.request_timeout_secs.map(Duration::from_secs))?;
    let result = run(&args.directory, &config, args.jobs, &client)?;
    print_summary(&result);

    Ok(())
}

/// 配置文件缺失：询问是否写出默认配置
fn bootstrap_config(path: &Path) -> Result<()> {
    let create = output::confirm(&format!(
        "Config file not found at {}. Create a blank one?",
        path.display()
    ));
    create_missing_config(path, create)
}

/// 拒绝创建时只返回错误，由 `main` 统一打印
fn create_missing_config(path: &Path, create: bool) -> Result<()> {
    if !create {
        return Err(ModifyError::ConfigNotFound {
            path: path.display().to_string(),
        });
    }

    config::save_blank_config(path)?;
    output::print_success(&format!("Blank config file created at {}", path.display()));
    Ok(())
}

/// 处理目录下所有匹配文件
///
/// 致命错误（目录、环境文件、凭据、线程池）在读取任何文件之前返回。
pub fn run(
    directory: &Path,
    config: &Configuration,
    jobs: usize,
    client: &TransformationClient,
) -> Result<BatchResult> {
    if !directory.is_dir() {
        return Err(ModifyError::DirectoryNotFound {
            path: directory.display().to_string(),
        });
    }

    let program_dir = config::program_dir();
    let env_path = env::locate_env_file(&config.env_file, &[directory, &program_dir])?;
    let credentials = env::load_credentials(&env_path)?;
    output::print_info(&format!(
        "Loaded {} credential(s) from '{}'",
        credentials.len(),
        env_path.display()
    ));

    let files = discover(directory, config)?;
    if files.is_empty() {
        output::print_warning(&format!(
            "No files ending with '{}' under {}",
            config.file_extension,
            directory.display()
        ));
        return Ok(BatchResult::default());
    }

    let runner = BatchRunner::new(jobs)?;
    output::print_info(&format!(
        "Found {} file(s), processing with {} worker(s)",
        files.len(),
        runner.workers()
    ));
    if config.reference_content.is_some() {
        tracing::debug!("reference content loaded, not sent with requests");
    }

    tracing::debug!(endpoint = client.endpoint(), "sending requests");
    let pipeline = Pipeline::new(config, &credentials, client);
    Ok(runner.run(&files, |path| pipeline.process(path)))
}

/// 发现待处理文件，后缀模式下排除之前的输出
fn discover(directory: &Path, config: &Configuration) -> Result<Vec<PathBuf>> {
    let collector = FileCollector::new(directory, config.file_extension.as_str());
    let collector = match config.output_mode() {
        OutputMode::Suffix(suffix) => collector.excluding_outputs(suffix),
        OutputMode::Replace => collector,
    };
    collector.collect()
}

/// 单文件处理流水线
pub struct Pipeline<'a> {
    config: &'a Configuration,
    credentials: &'a CredentialPool,
    client: &'a TransformationClient,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a Configuration,
        credentials: &'a CredentialPool,
        client: &'a TransformationClient,
    ) -> Self {
        Self {
            config,
            credentials,
            client,
        }
    }

    /// 处理一个文件，所有错误都在此吸收为 `Failed`
    pub fn process(&self, path: &Path) -> ProcessResult {
        let mut task = FileTask::new(path);
        let destination = resolve_destination(path, self.config.output_mode());
        tracing::debug!(
            source = %path.display(),
            destination = %destination.path().display(),
            "task started"
        );

        if destination.already_converted() {
            return skipped(&mut task, destination.marker());
        }

        match self.transform(&mut task, &destination) {
            Ok(WriteOutcome::Written(written)) => match task.advance(TaskState::Done) {
                Ok(()) => ProcessResult::Success {
                    source: path.to_path_buf(),
                    destination: written,
                },
                Err(e) => failed(&mut task, ModifyError::Other(e.to_string())),
            },
            Ok(WriteOutcome::AlreadyConverted(marker)) => skipped(&mut task, &marker),
            Err(e) => failed(&mut task, e),
        }
    }

    fn transform(&self, task: &mut FileTask, destination: &Destination) -> Result<WriteOutcome> {
        let path = task.source_path().to_path_buf();

        advance(task, TaskState::Reading)?;
        let content = fs::read_to_string(&path).map_err(|e| ModifyError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;

        advance(task, TaskState::Requesting)?;
        let credential = self.credentials.select_random();
        let raw = self
            .client
            .invoke(content.trim(), &self.config.prompt_text, credential)?;

        advance(task, TaskState::Extracting)?;
        let text = transform::extract(&raw)?;

        advance(task, TaskState::Writing)?;
        write_output(destination, &text)
    }
}

fn advance(task: &mut FileTask, next: TaskState) -> Result<()> {
    task.advance(next)
        .map_err(|e| ModifyError::Other(e.to_string()))
}

fn skipped(task: &mut FileTask, marker: &Path) -> ProcessResult {
    if let Err(e) = task.advance(TaskState::Skipped) {
        return failed(task, ModifyError::Other(e.to_string()));
    }
    ProcessResult::Skipped {
        source: task.source_path().to_path_buf(),
        reason: format!("converted version already exists ({})", marker.display()),
    }
}

fn failed(task: &mut FileTask, error: ModifyError) -> ProcessResult {
    let stage = task.state();
    tracing::debug!(
        path = %task.source_path().display(),
        stage = %stage,
        error = ?error,
        "task failed"
    );
    if task.advance(TaskState::Failed).is_err() {
        tracing::warn!(stage = %stage, "task failed outside a working state");
    }
    ProcessResult::Failed {
        source: task.source_path().to_path_buf(),
        stage,
        error: error_chain(&error),
    }
}

/// 错误及其 source 链拼成一行
fn error_chain(error: &ModifyError) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// 打印统计
fn print_summary(result: &BatchResult) {
    output::print_separator();
    output::print_done(&format!(
        "Batch complete: {} processed, {} skipped, {} failed",
        result.success, result.skipped, result.failed
    ));

    if !result.failures.is_empty() {
        output::print_warning("Failed files:");
        output::print_failures(&result.failures, MAX_FAILURES_SHOWN);
    }
}
