//! # 输出写入器
//!
//! 根据输出模式确定目标路径并写入转换结果（结尾追加换行）。
//!
//! - 后缀模式：`notes.json` -> `notes.converted.json`，目标已存在则跳过
//! - 替换模式：`a.json` 先重命名为 `a.json.bak` 再原地写入；`.bak` 已存在说明
//!   之前的运行已转换过，跳过。写入失败时把备份改回原名。
//!
//! ## 依赖关系
//! - 被 `commands/modify.rs` 调用
//! - 被 `batch/collector.rs` 用于识别已有输出文件
//! - 使用 `models/configuration.rs` 的 `OutputMode`

use crate::error::{ModifyError, Result};
use crate::models::OutputMode;

use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// 备份文件后缀
pub const BACKUP_EXTENSION: &str = ".bak";

/// 解析后的输出目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// 写入新文件
    Suffix { path: PathBuf },
    /// 原地替换，原文件移到 backup
    Replace { path: PathBuf, backup: PathBuf },
}

/// 写入结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(PathBuf),
    /// 写入时发现已转换（路径为判定依据的那个文件）
    AlreadyConverted(PathBuf),
}

/// 拆分文件名为 (stem, 带点的扩展名)
fn split_name(path: &Path) -> (String, String) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    (stem, ext)
}

/// 后缀模式输出对应的源文件路径（不是任何文件的输出时为 `None`）
///
/// `notes.converted.json` -> `notes.json`，`Makefile.converted` -> `Makefile`。
/// 只做命名推导，不检查文件是否存在。
pub fn source_of_output(path: &Path, suffix: &str) -> Option<PathBuf> {
    if suffix.is_empty() {
        return None;
    }
    let name = path.file_name()?.to_string_lossy().into_owned();
    let (stem, ext) = split_name(path);

    [
        stem.strip_suffix(suffix).map(|base| format!("{}{}", base, ext)),
        name.strip_suffix(suffix).map(str::to_string),
    ]
    .into_iter()
    .flatten()
    .filter(|candidate| !candidate.is_empty())
    .map(|candidate| path.with_file_name(candidate))
    .find(|candidate| resolve_destination(candidate, OutputMode::Suffix(suffix)).path() == path)
}

/// 计算源文件对应的输出目标
pub fn resolve_destination(source: &Path, mode: OutputMode<'_>) -> Destination {
    match mode {
        OutputMode::Suffix(suffix) => {
            let (stem, ext) = split_name(source);
            Destination::Suffix {
                path: source.with_file_name(format!("{}{}{}", stem, suffix, ext)),
            }
        }
        OutputMode::Replace => {
            let mut backup = source.as_os_str().to_owned();
            backup.push(BACKUP_EXTENSION);
            Destination::Replace {
                path: source.to_path_buf(),
                backup: PathBuf::from(backup),
            }
        }
    }
}

impl Destination {
    /// 最终写入的路径
    pub fn path(&self) -> &Path {
        match self {
            Destination::Suffix { path } | Destination::Replace { path, .. } => path,
        }
    }

    /// 判定“已转换”所检查的路径
    pub fn marker(&self) -> &Path {
        match self {
            Destination::Suffix { path } => path,
            Destination::Replace { backup, .. } => backup,
        }
    }

    /// 之前的运行是否已产出结果
    pub fn already_converted(&self) -> bool {
        self.marker().exists()
    }
}

/// 写入转换结果
pub fn write_output(destination: &Destination, text: &str) -> Result<WriteOutcome> {
    let content = format!("{}\n", text);
    match destination {
        Destination::Suffix { path } => write_new(path, &content),
        Destination::Replace { path, backup } => replace_with_backup(path, backup, &content),
    }
}

fn write_new(path: &Path, content: &str) -> Result<WriteOutcome> {
    write_new_with(path, content, |file, bytes| file.write_all(bytes))
}

fn write_new_with<W>(path: &Path, content: &str, write: W) -> Result<WriteOutcome>
where
    W: FnOnce(&mut File, &[u8]) -> io::Result<()>,
{
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Ok(WriteOutcome::AlreadyConverted(path.to_path_buf()));
        }
        Err(e) => {
            return Err(ModifyError::FileWriteError {
                path: path.display().to_string(),
                source: e,
            })
        }
    };

    if let Err(e) = write(&mut file, content.as_bytes()) {
        drop(file);
        // 不留下半截输出，否则下次运行会被当作已转换
        if let Err(remove_err) = fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %remove_err, "failed to remove partial output");
        }
        return Err(ModifyError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        });
    }

    Ok(WriteOutcome::Written(path.to_path_buf()))
}

fn replace_with_backup(path: &Path, backup: &Path, content: &str) -> Result<WriteOutcome> {
    replace_with_backup_using(path, backup, content, |path, content| fs::write(path, content))
}

fn replace_with_backup_using<W>(
    path: &Path,
    backup: &Path,
    content: &str,
    write: W,
) -> Result<WriteOutcome>
where
    W: FnOnce(&Path, &str) -> io::Result<()>,
{
    if backup.exists() {
        return Ok(WriteOutcome::AlreadyConverted(backup.to_path_buf()));
    }

    fs::rename(path, backup).map_err(|e| ModifyError::BackupError {
        path: path.display().to_string(),
        backup: backup.display().to_string(),
        source: e,
    })?;

    if let Err(e) = write(path, content) {
        // 写入可能已截断或创建了目标文件，rename 会覆盖它
        match fs::rename(backup, path) {
            Ok(()) => tracing::debug!(path = %path.display(), "restored original after failed write"),
            Err(rollback_err) => tracing::error!(
                path = %path.display(),
                backup = %backup.display(),
                error = %rollback_err,
                "failed to restore original, it is kept in the backup file"
            ),
        }
        return Err(ModifyError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        });
    }

    Ok(WriteOutcome::Written(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_suffix_naming() {
        let dest = resolve_destination(Path::new("dir/notes.json"), OutputMode::Suffix(".converted"));
        assert_eq!(dest.path(), Path::new("dir/notes.converted.json"));

        let dest = resolve_destination(Path::new("archive.tar.gz"), OutputMode::Suffix("-x"));
        assert_eq!(dest.path(), Path::new("archive.tar-x.gz"));

        let dest = resolve_destination(Path::new("Makefile"), OutputMode::Suffix(".converted"));
        assert_eq!(dest.path(), Path::new("Makefile.converted"));
    }

    #[test]
    fn test_replace_naming() {
        let dest = resolve_destination(Path::new("dir/a.json"), OutputMode::Replace);
        assert_eq!(
            dest,
            Destination::Replace {
                path: PathBuf::from("dir/a.json"),
                backup: PathBuf::from("dir/a.json.bak"),
            }
        );
        assert_eq!(dest.marker(), Path::new("dir/a.json.bak"));
    }

    #[test]
    fn test_source_of_output() {
        assert_eq!(
            source_of_output(Path::new("dir/notes.converted.json"), ".converted"),
            Some(PathBuf::from("dir/notes.json"))
        );
        assert_eq!(
            source_of_output(Path::new("Makefile.converted"), ".converted"),
            Some(PathBuf::from("Makefile"))
        );
        assert_eq!(source_of_output(Path::new("notes.json"), ".converted"), None);
        assert_eq!(source_of_output(Path::new(".converted.json"), ".converted"), None);
        assert_eq!(source_of_output(Path::new("notes.converted.json"), ""), None);
    }

    #[test]
    fn test_suffix_write_appends_newline_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("notes.json");
        fs::write(&source, "{}").unwrap();
        let dest = resolve_destination(&source, OutputMode::Suffix(".converted"));

        assert!(!dest.already_converted());
        let outcome = write_output(&dest, "first").unwrap();
        assert_eq!(outcome, WriteOutcome::Written(dir.path().join("notes.converted.json")));
        assert_eq!(fs::read_to_string(dest.path()).unwrap(), "first\n");

        assert!(dest.already_converted());
        let outcome = write_output(&dest, "second").unwrap();
        assert!(matches!(outcome, WriteOutcome::AlreadyConverted(_)));
        assert_eq!(fs::read_to_string(dest.path()).unwrap(), "first\n");
        assert_eq!(fs::read_to_string(&source).unwrap(), "{}");
    }

    #[test]
    fn test_replace_keeps_original_in_backup() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.json");
        fs::write(&source, b"{\"original\": true}").unwrap();
        let dest = resolve_destination(&source, OutputMode::Replace);

        assert!(!dest.already_converted());
        write_output(&dest, "transformed").unwrap();

        assert_eq!(
            fs::read(dir.path().join("a.json.bak")).unwrap(),
            b"{\"original\": true}"
        );
        assert_eq!(fs::read_to_string(&source).unwrap(), "transformed\n");
        assert!(dest.already_converted());

        // 第二次不再覆盖备份
        let outcome = write_output(&dest, "again").unwrap();
        assert!(matches!(outcome, WriteOutcome::AlreadyConverted(_)));
        assert_eq!(fs::read_to_string(&source).unwrap(), "transformed\n");
    }

    #[test]
    fn test_replace_fails_when_source_is_missing() {
        let dir = TempDir::new().unwrap();
        let dest = resolve_destination(&dir.path().join("gone.json"), OutputMode::Replace);
        let err = write_output(&dest, "x").unwrap_err();
        assert!(matches!(err, ModifyError::BackupError { .. }));
        assert!(!dir.path().join("gone.json").exists());
    }

    #[test]
    fn test_suffix_write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let dest = resolve_destination(&dir.path().join("missing/n.json"), OutputMode::Suffix(".c"));
        assert!(matches!(
            write_output(&dest, "x"),
            Err(ModifyError::FileWriteError { .. })
        ));
    }

    #[test]
    fn test_failed_replace_restores_original() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.json");
        let backup = dir.path().join("a.json.bak");
        fs::write(&source, b"{\"original\": true}").unwrap();

        let err = replace_with_backup_using(&source, &backup, "transformed\n", |path, _| {
            // 模拟写到一半失败
            fs::write(path, "trans")?;
            Err(io::Error::new(ErrorKind::Other, "disk full"))
        })
        .unwrap_err();

        assert!(matches!(err, ModifyError::FileWriteError { .. }));
        assert_eq!(fs::read(&source).unwrap(), b"{\"original\": true}");
        assert!(!backup.exists());
    }

    #[test]
    fn test_failed_suffix_write_leaves_no_partial_output() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("notes.converted.json");

        let err = write_new_with(&output, "complete\n", |file, bytes| {
            file.write_all(&bytes[..3])?;
            Err(io::Error::new(ErrorKind::Other, "disk full"))
        })
        .unwrap_err();

        assert!(matches!(err, ModifyError::FileWriteError { .. }));
        assert!(!output.exists());
    }
}
