//! # 转换服务客户端
//!
//! 以固定的五条消息构造对话请求，携带 Bearer 凭据同步 POST 到远程服务。
//! 每个文件每次运行只请求一次，不重试。
//!
//! ## 依赖关系
//! - 被 `commands/modify.rs` 调用
//! - 使用 `reqwest` 阻塞客户端（在 rayon 工作线程中调用）

use super::RawResponse;
use crate::error::{ModifyError, Result};

use serde::Serialize;
use std::time::Duration;

/// 远程服务地址
pub const DEFAULT_ENDPOINT: &str = "https://api.perplexity.ai/chat/completions";

/// 模型标识
pub const MODEL: &str = "llama-3.1-sonar-huge-128k-online";

/// 采样温度
pub const TEMPERATURE: u8 = 0;

const FRAMING_INSTRUCTION: &str = "I am going to give you a file to process and then a prompt with instructions for how to transform it. First I will give you the file to process, then I will give you the prompt with instructions in the subsequent message.";
const FILE_ACKNOWLEDGMENT: &str = "I understand. First, please provide the file to process.";
const PROMPT_ACKNOWLEDGMENT: &str = "Thank you for the file contents. Now please provide the prompt with instructions for how to transform the file.";

/// 错误信息中保留的响应体长度
const BODY_PREVIEW_LIMIT: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage<'a> {
    pub role: Role,
    pub content: &'a str,
}

impl<'a> ChatMessage<'a> {
    pub fn new(role: Role, content: &'a str) -> Self {
        ChatMessage { role, content }
    }
}

/// 发送给远程服务的请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransformationRequest<'a> {
    pub model: &'static str,
    pub temperature: u8,
    pub messages: Vec<ChatMessage<'a>>,
}

impl<'a> TransformationRequest<'a> {
    /// 固定顺序：说明、确认、文件内容、确认、指令
    pub fn new(content: &'a str, prompt: &'a str) -> Self {
        TransformationRequest {
            model: MODEL,
            temperature: TEMPERATURE,
            messages: vec![
                ChatMessage::new(Role::User, FRAMING_INSTRUCTION),
                ChatMessage::new(Role::Assistant, FILE_ACKNOWLEDGMENT),
                ChatMessage::new(Role::User, content),
                ChatMessage::new(Role::Assistant, PROMPT_ACKNOWLEDGMENT),
                ChatMessage::new(Role::User, prompt),
            ],
        }
    }
}

/// 转换服务客户端
#[derive(Debug, Clone)]
pub struct TransformationClient {
    http: reqwest::blocking::Client,
    endpoint: String,
}

impl TransformationClient {
    /// 创建客户端，`timeout` 为 None 时使用传输层默认值
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ModifyError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        })
    }

    /// 替换服务地址
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 发送一次请求，非 2xx 状态或传输失败均返回错误
    pub fn invoke(&self, content: &str, prompt: &str, credential: &str) -> Result<RawResponse> {
        let payload = TransformationRequest::new(content, prompt);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(credential)
            .json(&payload)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            // 状态码优先，读不到响应体也要保留
            let body = response.text().unwrap_or_else(|e| {
                tracing::debug!(error = %e, "failed to read error response body");
                String::new()
            });
            return Err(ModifyError::TransformationStatus {
                status: status.as_u16(),
                body: preview_body(&body),
            });
        }

        let body = response.text()?;
        tracing::debug!(
            endpoint = %self.endpoint,
            status = status.as_u16(),
            bytes = body.len(),
            "transformation response received"
        );

        Ok(RawResponse(body))
    }
}

fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    let mut preview: String = trimmed.chars().take(BODY_PREVIEW_LIMIT).collect();
    if trimmed.chars().count() > BODY_PREVIEW_LIMIT {
        preview.push_str("...");
    }
    preview
}
