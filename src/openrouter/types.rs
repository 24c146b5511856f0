//! Chat-completion wire structs.

use serde::{Deserialize, Serialize};

/// One chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `system` or `user`
    pub role: String,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// System message
    pub fn system(content: &str) -> Self {
        Self { role: "system".to_string(), content: content.to_string() }
    }

    /// User message
    pub fn user(content: &str) -> Self {
        Self { role: "user".to_string(), content: content.to_string() }
    }
}

/// Request body for `POST /chat/completions`
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model identifier
    pub model: String,
    /// Ordered messages
    pub messages: Vec<ChatMessage>,
    /// Response length cap, only set by the probe
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}
