//! # 远程转换模块
//!
//! 构造发送给远程对话补全服务的请求，并从响应中提取转换后的文本。
//!
//! ## 依赖关系
//! - 被 `commands/modify.rs` 使用
//! - 子模块: client（HTTP 调用）, extract（响应解析）

pub mod client;
pub mod extract;

pub use client::TransformationClient;
pub use extract::extract;

/// 远程服务返回的原始响应体
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse(pub String);

impl RawResponse {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
