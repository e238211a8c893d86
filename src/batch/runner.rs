//! # 批量执行器
//!
//! 固定容量的工作线程池：任务队列、N 个工作线程、完成屏障。
//!
//! ## 功能
//! - `WorkerPool::map` 对任意任务函数并行执行，阻塞到所有任务结束
//! - `BatchRunner` 在其上处理文件列表：进度条、逐文件输出、结果汇总
//! - 单个任务失败不影响其他任务，也不会提前结束整个批次
//!
//! ## 依赖关系
//! - 被 `commands/modify.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 线程池

use crate::error::{ModifyError, Result};
use crate::models::TaskState;
use crate::utils::{output, progress};

use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// 默认工作线程数
pub const DEFAULT_JOBS: usize = 10;

/// 单个文件处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessResult {
    /// 处理成功
    Success { source: PathBuf, destination: PathBuf },
    /// 跳过（已转换）
    Skipped { source: PathBuf, reason: String },
    /// 处理失败
    Failed {
        source: PathBuf,
        stage: TaskState,
        error: String,
    },
}

impl ProcessResult {
    pub fn source(&self) -> &Path {
        match self {
            ProcessResult::Success { source, .. }
            | ProcessResult::Skipped { source, .. }
            | ProcessResult::Failed { source, .. } => source,
        }
    }

    /// 对应的任务终止状态
    pub fn state(&self) -> TaskState {
        match self {
            ProcessResult::Success { .. } => TaskState::Done,
            ProcessResult::Skipped { .. } => TaskState::Skipped,
            ProcessResult::Failed { .. } => TaskState::Failed,
        }
    }

    /// 输出一行结果
    pub fn report(&self) {
        match self {
            ProcessResult::Success {
                source,
                destination,
            } => output::print_conversion(
                &source.display().to_string(),
                &destination.display().to_string(),
            ),
            ProcessResult::Skipped { source, reason } => {
                output::print_skip(&format!("{}: {}", source.display(), reason))
            }
            ProcessResult::Failed {
                source,
                stage,
                error,
            } => output::print_error(&format!(
                "{} (while {}): {}",
                source.display(),
                stage,
                error
            )),
        }
    }
}

/// 失败详情
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub path: PathBuf,
    pub stage: TaskState,
    pub error: String,
}

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    /// 成功数量
    pub success: usize,
    /// 跳过数量
    pub skipped: usize,
    /// 失败数量
    pub failed: usize,
    /// 失败详情
    pub failures: Vec<Failure>,
}

impl BatchResult {
    /// 合并处理结果
    pub fn merge(&mut self, result: ProcessResult) {
        match result {
            ProcessResult::Success { .. } => self.success += 1,
            ProcessResult::Skipped { .. } => self.skipped += 1,
            ProcessResult::Failed {
                source,
                stage,
                error,
            } => {
                self.failed += 1;
                self.failures.push(Failure {
                    path: source,
                    stage,
                    error,
                });
            }
        }
    }

    /// 总处理数量
    pub fn total(&self) -> usize {
        self.success + self.skipped + self.failed
    }
}

/// 固定容量工作线程池
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl WorkerPool {
    /// 创建线程池（0 = CPU 核数）
    pub fn new(workers: usize) -> Result<Self> {
        let workers = if workers == 0 { num_cpus::get() } else { workers };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("modify-worker-{}", i))
            .build()
            .map_err(|e| ModifyError::WorkerPool(e.to_string()))?;

        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// 并行执行任务，返回时所有任务均已结束，结果顺序与输入一致
    pub fn map<T, R, F>(&self, items: &[T], task: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        self.pool
            .install(|| items.par_iter().map(|item| task(item)).collect())
    }
}

/// 批量执行器
pub struct BatchRunner {
    pool: WorkerPool,
}

impl BatchRunner {
    /// 创建新的批量执行器
    pub fn new(jobs: usize) -> Result<Self> {
        Ok(Self {
            pool: WorkerPool::new(jobs)?,
        })
    }

    pub fn workers(&self) -> usize {
        self.pool.workers()
    }

    /// 并行处理文件列表
    pub fn run<F>(&self, files: &[PathBuf], processor: F) -> BatchResult
    where
        F: Fn(&Path) -> ProcessResult + Sync + Send,
    {
        let pb = progress::create_progress_bar(files.len() as u64, "Processing");

        let results = self.pool.map(files, |file| {
            let result = processor(file.as_path());
            tracing::debug!(path = %result.source().display(), state = %result.state(), "task finished");
            pb.suspend(|| result.report());
            pb.inc(1);
            result
        });

        pb.finish_and_clear();

        // 汇总结果
        let mut batch_result = BatchResult::default();
        for result in results {
            batch_result.merge(result);
        }

        batch_result
    }
}
