//! OpenRouter chat-completion access: the request client, the response
//! stripping that recovers JSON from chatty model output, and the
//! credential/rate-limit probe.

/// Chat-completion client and model-reply parsing
pub mod client;
/// One-token credential and rate-limit check
pub mod probe;
/// Request and response wire types
pub mod types;

pub use client::{complete_validated, strip_markdown_json, CompletionBackend, OpenRouterClient};
pub use probe::{AuthDenial, DenialReason, ProbeOutcome};
