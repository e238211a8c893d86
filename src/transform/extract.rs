//! # 响应内容提取
//!
//! 解析 `{"choices":[{"message":{"content": ...}}]}` 包装，取第一条消息内容；
//! 若内容中有三反引号围栏块，返回第一个围栏块内的文本，否则返回整段内容。
//! 纯函数，无 I/O。
//!
//! ## 依赖关系
//! - 被 `commands/modify.rs` 调用
//! - 使用 `serde_json` 解析, `regex` 匹配围栏

use super::RawResponse;
use crate::error::{ModifyError, Result};

use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

static FENCED_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```(.*?)```").unwrap());

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// 从原始响应提取转换结果
pub fn extract(raw: &RawResponse) -> Result<String> {
    let message = extract_agent_message(raw)?;
    Ok(extract_content(&message))
}

/// 取第一条选择的消息内容
pub fn extract_agent_message(raw: &RawResponse) -> Result<String> {
    let response: CompletionResponse =
        serde_json::from_str(raw.as_str()).map_err(|e| ModifyError::ExtractionError {
            reason: format!("unexpected response shape: {}", e),
        })?;

    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| ModifyError::ExtractionError {
            reason: "response contains no choices".to_string(),
        })
}

/// 优先取围栏块内容，否则取整段内容（均去除首尾空白）
pub fn extract_content(message: &str) -> String {
    match FENCED_BLOCK.captures(message) {
        Some(caps) => caps[1].trim().to_string(),
        None => message.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(content: &str) -> RawResponse {
        RawResponse(
            serde_json::json!({
                "id": "cmpl-1",
                "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
            })
            .to_string(),
        )
    }

    #[test]
    fn test_fenced_block_is_extracted() {
        let raw = wrap("prefix ```EXTRACTED``` suffix");
        assert_eq!(extract(&raw).unwrap(), "EXTRACTED");
    }

    #[test]
    fn test_plain_text_is_returned_trimmed() {
        assert_eq!(extract(&wrap("plain text")).unwrap(), "plain text");
        assert_eq!(extract(&wrap("\n  plain text \n")).unwrap(), "plain text");
    }

    #[test]
    fn test_first_fenced_block_wins() {
        let content = "a ```\n{\"k\": 1}\n``` b ```second```";
        assert_eq!(extract_content(content), "{\"k\": 1}");
    }

    #[test]
    fn test_multiline_fenced_block() {
        let content = "Here you go:\n```\nline one\nline two\n```\nDone.";
        assert_eq!(extract_content(content), "line one\nline two");
    }

    #[test]
    fn test_unclosed_fence_falls_back_to_full_content() {
        assert_eq!(extract_content(" ```open only "), "```open only");
    }

    #[test]
    fn test_empty_choices_is_an_error() {
        let raw = RawResponse(r#"{"choices": []}"#.to_string());
        let err = extract(&raw).unwrap_err();
        assert!(matches!(err, ModifyError::ExtractionError { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_malformed_wrapper_is_an_error() {
        for body in ["not json", r#"{"data": 1}"#, r#"{"choices": [{"message": {}}]}"#] {
            let raw = RawResponse(body.to_string());
            assert!(extract(&raw).is_err(), "body = {}", body);
        }
    }

    #[test]
    fn test_agent_message_is_first_choice() {
        let raw = RawResponse(
            r#"{"choices":[{"message":{"content":"first"}},{"message":{"content":"second"}}]}"#
                .to_string(),
        );
        assert_eq!(extract_agent_message(&raw).unwrap(), "first");
    }
}
