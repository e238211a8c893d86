//! # 运行配置数据模型
//!
//! 对应 JSON 配置文件的结构。所有字段都有默认值，缺失字段按默认值补齐，
//! 未知字段忽略。加载完成后（prompt/reference 文件已解析）整个运行期间不可变。
//!
//! ## 依赖关系
//! - 被 `config/` 加载与保存
//! - 被 `batch/writer.rs`, `batch/collector.rs`, `commands/modify.rs` 使用

use crate::error::{ModifyError, Result};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 默认的发送给远程服务的指令
pub const DEFAULT_PROMPT_TEXT: &str = "Return back the original file again with no changes.";

/// 默认的环境文件名
pub const DEFAULT_ENV_FILE: &str = ".modify.env";

/// 默认请求超时（秒）
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

/// 运行配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// 文件扩展名过滤器（文件名以此结尾）
    pub file_extension: String,

    /// 非替换模式下输出文件名后缀
    pub output_suffix: String,

    /// 是否原地替换（原文件备份为 .bak）
    pub replace_original: bool,

    /// 覆盖 prompt_text 的外部文件
    pub prompt_file: Option<PathBuf>,

    /// 发送给远程服务的指令
    pub prompt_text: String,

    /// 参考内容文件
    pub reference_file: Option<PathBuf>,

    /// 参考文件内容（运行时填充，不写入配置文件）
    #[serde(skip)]
    pub reference_content: Option<String>,

    /// 凭据环境文件名
    pub env_file: String,

    /// 单次请求超时（秒），null 表示使用传输层默认值
    pub request_timeout_secs: Option<u64>,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            file_extension: ".json".to_string(),
            output_suffix: ".converted".to_string(),
            replace_original: false,
            prompt_file: None,
            prompt_text: DEFAULT_PROMPT_TEXT.to_string(),
            reference_file: None,
            reference_content: None,
            env_file: DEFAULT_ENV_FILE.to_string(),
            request_timeout_secs: Some(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

/// 输出模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode<'a> {
    /// 写入 `{stem}{suffix}{ext}`
    Suffix(&'a str),
    /// 原文件重命名为 `.bak` 后原地写入
    Replace,
}

impl Configuration {
    /// 当前配置对应的输出模式
    pub fn output_mode(&self) -> OutputMode<'_> {
        if self.replace_original {
            OutputMode::Replace
        } else {
            OutputMode::Suffix(&self.output_suffix)
        }
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if self.file_extension.is_empty() {
            return Err(ModifyError::InvalidConfig(
                "file_extension must not be empty".to_string(),
            ));
        }
        // 空后缀会让输出路径与源文件相同
        if !self.replace_original && self.output_suffix.is_empty() {
            return Err(ModifyError::InvalidConfig(
                "output_suffix must not be empty unless replace_original is set".to_string(),
            ));
        }
        if self.env_file.trim().is_empty() {
            return Err(ModifyError::InvalidConfig(
                "env_file must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
