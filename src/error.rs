//! # 统一错误处理模块
//!
//! 定义 modify 的所有错误类型，使用 `thiserror` 派生。
//!
//! 错误分为两类：
//! - 致命错误：配置、环境文件、凭据、目标目录问题，在处理任何文件之前终止整个运行
//! - 单任务错误：读写、远程请求、响应解析失败，仅使对应文件的任务失败
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// modify 统一错误类型
#[derive(Error, Debug)]
pub enum ModifyError {
    // ─────────────────────────────────────────────────────────────
    // 配置错误（致命）
    // ─────────────────────────────────────────────────────────────
    #[error("Config file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Failed to parse config file: {path}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Environment file '{name}' not found in {searched}")]
    EnvFileNotFound { name: String, searched: String },

    #[error("Failed to parse environment file: {path}")]
    EnvFileParse {
        path: String,
        #[source]
        source: dotenvy::Error,
    },

    #[error("No credentials with prefix '{prefix}' found in the environment file")]
    NoCredentials { prefix: String },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),

    // ─────────────────────────────────────────────────────────────
    // I/O 错误（单任务）
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to back up {path} to {backup}")]
    BackupError {
        path: String,
        backup: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 远程服务错误（单任务）
    // ─────────────────────────────────────────────────────────────
    #[error("Transformation request failed: {0}")]
    TransformationRequest(#[from] reqwest::Error),

    #[error("Transformation service returned status {status}: {body}")]
    TransformationStatus { status: u16, body: String },

    #[error("Failed to extract transformed content: {reason}")]
    ExtractionError { reason: String },

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

impl ModifyError {
    /// 是否为致命错误（在处理文件之前终止整个运行）
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ModifyError::ConfigNotFound { .. }
                | ModifyError::ConfigParse { .. }
                | ModifyError::InvalidConfig(_)
                | ModifyError::EnvFileNotFound { .. }
                | ModifyError::EnvFileParse { .. }
                | ModifyError::NoCredentials { .. }
                | ModifyError::DirectoryNotFound { .. }
                | ModifyError::WorkerPool(_)
        )
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, ModifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(ModifyError::NoCredentials {
            prefix: "API_KEY_".to_string()
        }
        .is_fatal());
        assert!(ModifyError::ConfigNotFound {
            path: "config.json".to_string()
        }
        .is_fatal());
        assert!(!ModifyError::ExtractionError {
            reason: "empty choices".to_string()
        }
        .is_fatal());
        assert!(!ModifyError::TransformationStatus {
            status: 500,
            body: "boom".to_string()
        }
        .is_fatal());
    }
}
