use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::openrouter::probe::DenialReason;

/// Custom result type alias for the application
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Errors that can occur while generating package metadata
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// I/O errors
    #[error("IO error: {0}")]
    IO(#[from] io::Error),

    /// HTTP transport errors (connection, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-success status from the completion endpoint
    #[error("OpenRouter API error {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// Response arrived but did not carry the expected fields
    #[error("{0}")]
    Transport(String),

    /// Model output could not be parsed as JSON after stripping
    #[error("OpenRouter returned invalid JSON.{hint} Raw (first 500 chars): {snippet}")]
    InvalidJson {
        /// Extra hint when code fences survived stripping
        hint: String,
        /// Truncated text that failed to parse
        snippet: String,
    },

    /// A guardrail rejected a response
    #[error("{0}")]
    Validation(String),

    /// A guardrail rejected the response of a named AI step
    #[error("[AI step \"{step}\"] Validation failed: {message}")]
    StepValidation {
        /// Step label, e.g. `package-overview`
        step: String,
        /// Validator message
        message: String,
    },

    /// The liveness probe was refused before the AI flow started
    #[error("{}", auth_message(.reason, .model, .message))]
    Auth {
        /// Why the probe was refused
        reason: DenialReason,
        /// Model that was probed
        model: String,
        /// Message returned by the provider
        message: String,
    },

    /// Missing or unreadable package manifest
    #[error("{message} ({})", .path.display())]
    Manifest {
        /// Resolved manifest path
        path: PathBuf,
        /// What went wrong
        message: String,
    },

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
}

fn auth_message(reason: &DenialReason, model: &str, message: &str) -> String {
    match reason {
        DenialReason::InvalidCredentials => format!(
            "OpenRouter rejected the API key: {}. Check --api-key or OPEN_ROUTER_API_KEY.",
            message
        ),
        DenialReason::RateLimited => format!(
            "Model \"{}\" is rate-limited: {}. Wait and retry, switch models with --model, \
             or add your own provider key in OpenRouter settings.",
            model, message
        ),
    }
}

impl GeneratorError {
    /// Creates a validation error naming the offending field
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Checks if this error is transient and retryable
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) | Self::IO(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Auth { reason, .. } => matches!(reason, DenialReason::RateLimited),
            _ => false,
        }
    }
}
