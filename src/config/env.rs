//! # 凭据环境文件
//!
//! 依次在目标目录和程序目录中查找环境文件，收集所有以 `API_KEY_` 开头的变量。
//! 只读取文件内容，不修改进程环境变量，也不读取已有的进程环境变量。
//!
//! ## 依赖关系
//! - 被 `commands/modify.rs` 调用
//! - 构造 `models/credentials.rs` 中的 `CredentialPool`
//! - 使用 `dotenvy` 解析文件

use crate::error::{ModifyError, Result};
use crate::models::credentials::{CredentialPool, CREDENTIAL_PREFIX};

use std::path::{Path, PathBuf};

/// 按顺序查找环境文件
pub fn locate_env_file(name: &str, search_dirs: &[&Path]) -> Result<PathBuf> {
    search_dirs
        .iter()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| ModifyError::EnvFileNotFound {
            name: name.to_string(),
            searched: search_dirs
                .iter()
                .map(|d| d.display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

/// 从环境文件加载凭据池
pub fn load_credentials(path: &Path) -> Result<CredentialPool> {
    let parse_error = |e: dotenvy::Error| ModifyError::EnvFileParse {
        path: path.display().to_string(),
        source: e,
    };

    let mut keys = Vec::new();
    for item in dotenvy::from_path_iter(path).map_err(parse_error)? {
        let (name, value) = item.map_err(parse_error)?;
        if name.starts_with(CREDENTIAL_PREFIX) && !value.is_empty() {
            keys.push(value);
        }
    }

    tracing::debug!(
        env_file = %path.display(),
        count = keys.len(),
        "credentials loaded"
    );
    CredentialPool::new(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_target_dir_takes_precedence() {
        let target = TempDir::new().unwrap();
        let program = TempDir::new().unwrap();
        fs::write(target.path().join(".modify.env"), "API_KEY_1=t\n").unwrap();
        fs::write(program.path().join(".modify.env"), "API_KEY_1=p\n").unwrap();

        let found = locate_env_file(".modify.env", &[target.path(), program.path()]).unwrap();
        assert_eq!(found, target.path().join(".modify.env"));
    }

    #[test]
    fn test_falls_back_to_program_dir() {
        let target = TempDir::new().unwrap();
        let program = TempDir::new().unwrap();
        fs::write(program.path().join(".modify.env"), "API_KEY_1=p\n").unwrap();

        let found = locate_env_file(".modify.env", &[target.path(), program.path()]).unwrap();
        assert_eq!(found, program.path().join(".modify.env"));
    }

    #[test]
    fn test_missing_env_file_is_fatal() {
        let target = TempDir::new().unwrap();
        let err = locate_env_file(".modify.env", &[target.path()]).unwrap_err();
        assert!(matches!(err, ModifyError::EnvFileNotFound { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_only_prefixed_variables_are_collected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".modify.env");
        fs::write(
            &path,
            "# keys\nAPI_KEY_1=first\nOTHER=ignored\nAPI_KEY_2=\"second\"\nMY_API_KEY_3=nope\n",
        )
        .unwrap();

        let pool = load_credentials(&path).unwrap();
        assert_eq!(pool.len(), 2);
        let selected = pool.select_random();
        assert!(selected == "first" || selected == "second");
    }

    #[test]
    fn test_env_file_without_keys_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".modify.env");
        fs::write(&path, "OTHER=1\n").unwrap();

        let err = load_credentials(&path).unwrap_err();
        assert!(matches!(err, ModifyError::NoCredentials { .. }));
    }
}
