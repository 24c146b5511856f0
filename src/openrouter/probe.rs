//! Liveness probe run before the multi-step AI flow.
//!
//! One tiny request tells a dead credential apart from a rate-limited
//! model so the run can stop with an actionable message instead of
//! burning several requests.

use log::{debug, warn};
use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use serde_json::Value;

use super::client::{truncate_chars, OpenRouterClient, MAX_SNIPPET_CHARS};
use super::types::ChatMessage;
use crate::error::{GeneratorError, Result};

/// Why the probe was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// 401: the key is missing, revoked or wrong
    InvalidCredentials,
    /// 429: the model (or the free tier) is throttled
    RateLimited,
}

/// Details of a refused probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthDenial {
    /// Refusal class
    pub reason: DenialReason,
    /// Provider message, with retry guidance when given
    pub message: String,
}

/// Result of [`OpenRouterClient::probe`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Credentials accepted and the model answered
    Ready,
    /// Credentials rejected or model throttled
    Denied(AuthDenial),
}

impl ProbeOutcome {
    /// Converts a denial into the matching [`GeneratorError::Auth`]
    pub fn into_result(self, model: &str) -> Result<()> {
        match self {
            ProbeOutcome::Ready => Ok(()),
            ProbeOutcome::Denied(denial) => Err(GeneratorError::Auth {
                reason: denial.reason,
                model: model.to_string(),
                message: denial.message,
            }),
        }
    }
}

impl OpenRouterClient {
    /// Issues a one-token request against the configured endpoint and model.
    ///
    /// 401 and 429 become [`ProbeOutcome::Denied`]; any other failure is an error.
    pub async fn probe(&self) -> Result<ProbeOutcome> {
        let mut request = self.chat_request(vec![ChatMessage::user("ping")]);
        request.max_tokens = Some(1);

        let response = self.post(&request).await?;
        let status = response.status();
        debug!("Probe for {} returned {}", self.model(), status);

        if status.is_success() {
            return Ok(ProbeOutcome::Ready);
        }

        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.unwrap_or_default();

        match status {
            StatusCode::UNAUTHORIZED => Ok(ProbeOutcome::Denied(AuthDenial {
                reason: DenialReason::InvalidCredentials,
                message: provider_message(&body),
            })),
            StatusCode::TOO_MANY_REQUESTS => {
                let mut message = provider_message(&body);
                if let Some(value) = retry_after {
                    message.push_str(&retry_hint(&value));
                }
                warn!("Model {} is rate-limited", self.model());
                Ok(ProbeOutcome::Denied(AuthDenial {
                    reason: DenialReason::RateLimited,
                    message,
                }))
            }
            _ => Err(GeneratorError::Api {
                status: status.as_u16(),
                body: truncate_chars(&body, MAX_SNIPPET_CHARS),
            }),
        }
    }
}

/// Suffix for a `Retry-After` value: delta-seconds get an `s`, an HTTP date is quoted as sent
fn retry_hint(value: &str) -> String {
    let value = value.trim();
    match value.parse::<u64>() {
        Ok(seconds) => format!(" (retry after {}s)", seconds),
        Err(_) => format!(" (retry after {})", value),
    }
}

/// Pulls `error.message` out of a provider error body, falling back to the raw text.
fn provider_message(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|v| v["error"]["message"].as_str().or_else(|| v["message"].as_str()))
        .map(str::to_string);

    match message {
        Some(message) => message,
        None if body.trim().is_empty() => "no details returned".to_string(),
        None => truncate_chars(body.trim(), MAX_SNIPPET_CHARS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_provider_message_prefers_error_message() {
        let body = r#"{"error": {"message": "User not found.", "code": 401}}"#;
        assert_eq!(provider_message(body), "User not found.");
    }

    #[test]
    fn test_provider_message_falls_back_to_body() {
        assert_eq!(provider_message("Too Many Requests"), "Too Many Requests");
        assert_eq!(provider_message("   "), "no details returned");
    }

    #[test_case("30", " (retry after 30s)" ; "delta seconds")]
    #[test_case(" 5 ", " (retry after 5s)" ; "padded seconds")]
    #[test_case("Wed, 21 Oct 2026 07:28:00 GMT", " (retry after Wed, 21 Oct 2026 07:28:00 GMT)" ; "http date")]
    fn test_retry_hint(value: &str, expected: &str) {
        assert_eq!(retry_hint(value), expected);
    }

    #[test]
    fn test_into_result() {
        assert!(ProbeOutcome::Ready.into_result("m").is_ok());

        let denied = ProbeOutcome::Denied(AuthDenial {
            reason: DenialReason::RateLimited,
            message: "slow down".into(),
        });
        match denied.into_result("m") {
            Err(GeneratorError::Auth { reason, model, .. }) => {
                assert_eq!(reason, DenialReason::RateLimited);
                assert_eq!(model, "m");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
