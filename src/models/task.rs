//! # 单文件任务模型
//!
//! 每个被发现的文件对应一个 `FileTask`，其状态只由负责它的工作线程推进。
//!
//! ```text
//! Discovered ─┬─> Skipped
//!             └─> Reading ─> Requesting ─> Extracting ─> Writing ─> Done
//!                    └────────────┴─────────────┴───────────┴─────> Failed
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/modify.rs` 和 `batch/runner.rs` 使用

use std::fmt;
use std::path::{Path, PathBuf};

/// 任务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Discovered,
    Skipped,
    Reading,
    Requesting,
    Extracting,
    Writing,
    Done,
    Failed,
}

impl TaskState {
    /// 是否为终止状态
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Done | TaskState::Skipped | TaskState::Failed)
    }

    /// 状态转换是否合法
    pub fn can_transition_to(self, next: TaskState) -> bool {
        use TaskState::*;
        matches!(
            (self, next),
            (Discovered, Skipped)
                | (Discovered, Reading)
                | (Reading, Requesting)
                | (Requesting, Extracting)
                | (Extracting, Writing)
                | (Writing, Done)
                // 写入阶段发现目标已被创建
                | (Writing, Skipped)
                | (Reading | Requesting | Extracting | Writing, Failed)
        )
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskState::Discovered => "discovered",
            TaskState::Skipped => "skipped",
            TaskState::Reading => "reading",
            TaskState::Requesting => "requesting",
            TaskState::Extracting => "extracting",
            TaskState::Writing => "writing",
            TaskState::Done => "done",
            TaskState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// 非法状态转换
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: TaskState,
    pub to: TaskState,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid task transition {} -> {}", self.from, self.to)
    }
}

/// 单文件任务
#[derive(Debug, Clone)]
pub struct FileTask {
    source_path: PathBuf,
    state: TaskState,
}

impl FileTask {
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        FileTask {
            source_path: source_path.into(),
            state: TaskState::Discovered,
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// 推进到下一个状态
    pub fn advance(&mut self, next: TaskState) -> Result<(), InvalidTransition> {
        if self.state.is_terminal() || !self.state.can_transition_to(next) {
            return Err(InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::trace!(
            path = %self.source_path.display(),
            from = %self.state,
            to = %next,
            "task transition"
        );
        self.state = next;
        Ok(())
    }
}
