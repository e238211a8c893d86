//! # 配置加载模块
//!
//! 读取 JSON 配置文件，解析 prompt/reference 外部文件，生成本次运行不可变的
//! `Configuration`；配置文件缺失时可写出默认配置。
//!
//! ## 依赖关系
//! - 被 `commands/modify.rs` 调用
//! - 使用 `models/configuration.rs`
//! - 子模块: env（凭据环境文件）

pub mod env;

use crate::error::{ModifyError, Result};
use crate::models::Configuration;
use crate::utils::output;

use std::fs;
use std::path::{Path, PathBuf};

/// 默认配置文件名（与可执行文件同目录）
pub const DEFAULT_CONFIG_NAME: &str = "config.json";

/// 可执行文件所在目录，无法确定时退回当前目录
pub fn program_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// 默认配置文件路径
pub fn default_config_path() -> PathBuf {
    program_dir().join(DEFAULT_CONFIG_NAME)
}

/// 加载并解析配置文件，外部文件解析完成后校验
pub fn load_config(path: &Path) -> Result<Configuration> {
    if !path.is_file() {
        return Err(ModifyError::ConfigNotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| ModifyError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut config: Configuration =
        serde_json::from_str(&content).map_err(|e| ModifyError::ConfigParse {
            path: path.display().to_string(),
            source: e,
        })?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    resolve_external_files(&mut config, base_dir)?;
    config.validate()?;

    tracing::debug!(config = ?config, "configuration loaded");
    Ok(config)
}

/// 写出默认配置
pub fn save_blank_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ModifyError::FileWriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let json = serde_json::to_string_pretty(&Configuration::default())
        .map_err(|e| ModifyError::Other(format!("Failed to serialize config: {}", e)))?;

    fs::write(path, json + "\n").map_err(|e| ModifyError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

/// 读取 prompt_file / reference_file
///
/// 相对路径以配置文件所在目录为基准。配置了但不存在的文件只给出警告。
pub fn resolve_external_files(config: &mut Configuration, base_dir: &Path) -> Result<()> {
    if let Some(reference_file) = &config.reference_file {
        if let Some(content) = read_optional(&base_dir.join(reference_file), "reference")? {
            config.reference_content = Some(content);
        }
    }

    if let Some(prompt_file) = &config.prompt_file {
        if let Some(content) = read_optional(&base_dir.join(prompt_file), "prompt")? {
            config.prompt_text = content;
        }
    }

    Ok(())
}

fn read_optional(path: &Path, kind: &str) -> Result<Option<String>> {
    if !path.is_file() {
        output::print_warning(&format!(
            "{} file '{}' not found, ignoring",
            kind,
            path.display()
        ));
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| ModifyError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(Some(content.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::configuration::DEFAULT_PROMPT_TEXT;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = load_config(&dir.path().join("config.json")).unwrap_err();
        assert!(matches!(err, ModifyError::ConfigNotFound { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_blank_config_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        save_blank_config(&path).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config, Configuration::default());
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(ModifyError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_empty_extension_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"file_extension": ""}"#).unwrap();
        assert!(matches!(
            load_config(&path),
            Err(ModifyError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_prompt_and_reference_files_are_resolved() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("prompt.txt"), "  Uppercase every key.\n").unwrap();
        fs::write(dir.path().join("ref.txt"), "reference body\n").unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"prompt_file": "prompt.txt", "reference_file": "ref.txt", "prompt_text": "ignored"}"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.prompt_text, "Uppercase every key.");
        assert_eq!(config.reference_content.as_deref(), Some("reference body"));
    }

    #[test]
    fn test_missing_prompt_file_keeps_prompt_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"prompt_file": "absent.txt"}"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.prompt_text, DEFAULT_PROMPT_TEXT);
        assert_eq!(config.reference_content, None);
    }
}
