//! # 文件收集器
//!
//! 递归遍历目标目录，收集文件名以指定扩展名结尾的文件。
//!
//! ## 遍历策略
//! - 包含隐藏文件与隐藏目录
//! - 不跟随符号链接，因此不会陷入链接循环
//! - 无法读取的目录项跳过并记录 debug 日志
//! - 可排除之前运行产生的后缀输出（如 `notes.converted.json`，仅当 `notes.json` 也存在）
//! - 结果排序，提交顺序确定（完成顺序仍不确定）
//!
//! ## 依赖关系
//! - 被 `commands/modify.rs` 调用
//! - 使用 `walkdir` 遍历目录
//! - 使用 `batch/writer.rs` 识别已有输出

use super::writer::source_of_output;
use crate::error::{ModifyError, Result};

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 文件收集器
pub struct FileCollector {
    /// 根目录
    root: PathBuf,
    /// 文件名后缀过滤器
    extension: String,
    /// 需要排除的输出后缀
    exclude_suffix: Option<String>,
}

impl FileCollector {
    /// 创建新的文件收集器
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
            exclude_suffix: None,
        }
    }

    /// 排除旁边存在对应源文件的后缀输出
    pub fn excluding_outputs(mut self, suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        self.exclude_suffix = (!suffix.is_empty()).then_some(suffix);
        self
    }

    /// 收集所有匹配的文件
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(ModifyError::DirectoryNotFound {
                path: self.root.display().to_string(),
            });
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| self.matches(entry.path()))
            .map(|entry| entry.into_path())
            .collect();

        files.sort();
        tracing::debug!(
            root = %self.root.display(),
            extension = %self.extension,
            count = files.len(),
            "files discovered"
        );
        Ok(files)
    }

    /// 检查文件是否匹配
    fn matches(&self, path: &Path) -> bool {
        let filename = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return false,
        };

        if !filename.ends_with(&self.extension) {
            return false;
        }

        let Some(suffix) = &self.exclude_suffix else {
            return true;
        };
        match source_of_output(path, suffix) {
            Some(source) if source.is_file() => {
                tracing::debug!(
                    path = %path.display(),
                    source = %source.display(),
                    "excluding output of a previous run"
                );
                false
            }
            _ => true,
        }
    }
}
