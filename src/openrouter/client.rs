use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde_json::Value;

use super::types::{ChatMessage, ChatRequest};
use crate::config::LlmSettings;
use crate::error::{GeneratorError, Result};

/// Longest body or snippet echoed back inside an error message
pub const MAX_SNIPPET_CHARS: usize = 500;

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:json)?\s*\n?(.*?)```").expect("code fence regex"));

/// Anything that can answer one system/user prompt pair with a decoded JSON value
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Sends one prompt pair and returns the parsed JSON payload
    async fn complete(&self, system_prompt: &str, user_content: &str) -> Result<Value>;
}

/// Client for the OpenRouter chat-completion endpoint
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenRouterClient {
    /// Builds a client for one API key and model
    pub fn new(settings: &LlmSettings, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key: api_key.to_string(),
            model: settings.model.clone(),
        })
    }

    /// Model this client talks to
    pub fn model(&self) -> &str {
        &self.model
    }

    pub(crate) async fn post(&self, request: &ChatRequest) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;
        Ok(response)
    }

    pub(crate) fn chat_request(&self, messages: Vec<ChatMessage>) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages,
            max_tokens: None,
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenRouterClient {
    async fn complete(&self, system_prompt: &str, user_content: &str) -> Result<Value> {
        let request = self.chat_request(vec![
            ChatMessage::system(system_prompt),
            ChatMessage::user(user_content),
        ]);
        debug!("POST {} (model {})", self.endpoint, self.model);

        let response = self.post(&request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeneratorError::Api {
                status: status.as_u16(),
                body: truncate_chars(&body, MAX_SNIPPET_CHARS),
            });
        }

        let data: Value = response.json().await?;
        let content = data["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                GeneratorError::Transport(
                    "OpenRouter response missing choices[0].message.content".to_string(),
                )
            })?;

        parse_model_json(content)
    }
}

/// Strips markdown fences and surrounding prose, then parses the JSON object.
pub fn parse_model_json(content: &str) -> Result<Value> {
    let raw_json = strip_markdown_json(content);
    serde_json::from_str(raw_json).map_err(|_| GeneratorError::InvalidJson {
        hint: if raw_json.contains("```") {
            " (Response may be in a code block; strip failed.)".to_string()
        } else {
            String::new()
        },
        snippet: truncate_chars(raw_json, MAX_SNIPPET_CHARS),
    })
}

/// Recovers the JSON object from a model reply.
///
/// Handles plain JSON, ```` ```json ```` fences, bare ```` ``` ```` fences and
/// objects embedded in narrative text. Text that already parses as JSON is
/// returned as is, so fences inside string values are left alone. The
/// balanced-brace scan only runs when the remaining text does not already
/// start with `{`.
pub fn strip_markdown_json(raw: &str) -> &str {
    let mut trimmed = raw.trim().trim_start_matches('\u{feff}').trim_start();

    if trimmed.starts_with('{') && serde_json::from_str::<serde::de::IgnoredAny>(trimmed).is_ok() {
        return trimmed;
    }

    if let Some(inner) = CODE_FENCE.captures(trimmed).and_then(|caps| caps.get(1)) {
        trimmed = inner.as_str().trim();
    }

    if !trimmed.starts_with('{') {
        if let Some(object) = balanced_object(trimmed) {
            trimmed = object;
        }
    }
    trimmed
}

fn balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    for (offset, ch) in text[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Calls the backend and runs the response through a validator.
///
/// Validator failures are re-labelled with `step` so the failing AI step is obvious.
pub async fn complete_validated<B, T, F>(
    backend: &B,
    system_prompt: &str,
    user_content: &str,
    validate: F,
    step: &str,
) -> Result<T>
where
    B: CompletionBackend + ?Sized,
    F: FnOnce(Value) -> Result<T>,
{
    let parsed = backend.complete(system_prompt, user_content).await?;
    validate(parsed).map_err(|err| match err {
        GeneratorError::Validation(message) => GeneratorError::StepValidation {
            step: step.to_string(),
            message,
        },
        other => other,
    })
}

/// Truncates to at most `max` characters without splitting a code point
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case("```json\n{\"a\":1}\n```" ; "json fence")]
    #[test_case("```\n{\"a\":1}\n```" ; "bare fence")]
    #[test_case("{\"a\":1}" ; "plain")]
    #[test_case("here is the answer: {\"a\":1} thanks" ; "embedded in prose")]
    #[test_case("Sure!\n```json\n{\"a\":1}\n```\nLet me know if you need more." ; "fence wrapped in prose")]
    #[test_case("```json\nResult follows: {\"a\":1}\n```" ; "prose inside fence")]
    #[test_case("\u{feff}  {\"a\":1}  " ; "bom and whitespace")]
    fn test_strip_recovers_object(raw: &str) {
        let value: Value = serde_json::from_str(strip_markdown_json(raw)).unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test_case("{\"a\":1,\"example\":\"```js\\nuseX()\\n```\"}" ; "fenced snippet in a string")]
    #[test_case("{\"a\":1,\"example\":\"wrap it: ```{ x }```\"}" ; "braces inside inline fence")]
    fn test_strip_leaves_valid_json_alone(raw: &str) {
        assert_eq!(strip_markdown_json(raw), raw);
        let value: Value = serde_json::from_str(strip_markdown_json(raw)).unwrap();
        assert_eq!(value["a"], 1);
        assert!(value["example"].as_str().unwrap().contains("```"));
    }

    #[test]
    fn test_strip_keeps_nested_braces() {
        let raw = r#"The metadata: {"exports": {"a": {"type": "function"}}, "hooks": []} done"#;
        let value: Value = serde_json::from_str(strip_markdown_json(raw)).unwrap();
        assert_eq!(value["exports"]["a"]["type"], "function");
    }

    #[test]
    fn test_parse_model_json_reports_snippet() {
        let err = parse_model_json("no json here at all").unwrap_err();
        match err {
            GeneratorError::InvalidJson { hint, snippet } => {
                assert!(hint.is_empty());
                assert_eq!(snippet, "no json here at all");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_model_json_hints_at_fences() {
        let err = parse_model_json("```json {\"a\": 1").unwrap_err();
        assert!(err.to_string().contains("code block"), "{}", err);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("ok", 500), "ok");
        assert_eq!(truncate_chars(&"x".repeat(900), 500).len(), 500);
    }
}
