#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(clippy::all)]

//! hayagriva-llm - LLM-oriented metadata for JavaScript and TypeScript packages
//!
//! Reads `package.json` from a package root and writes two artifacts next to it:
//! `llm.package.json` (structured metadata) and `llm.package.txt` (a flat text
//! rendering). Content comes either from a static scan of the entry file or from
//! a multi-step OpenRouter prompting flow.
//!
//! ## Usage
//! ```rust,no_run
//! use hayagriva_llm::{generate, GenerateOptions, Mode};
//! use std::path::Path;
//!
//! async fn example() -> hayagriva_llm::Result<()> {
//!     let options = GenerateOptions { mode: Mode::Static, ..Default::default() };
//!     let report = generate(Path::new("."), &options, |_| {}).await?;
//!     println!("{} exports", report.export_count);
//!     Ok(())
//! }
//! ```

/// Configuration module for the application
pub mod config;
/// Package root detection of the entry source file
pub mod entry;
/// Error handling types and utilities
pub mod error;
/// Generation driver writing both artifacts
pub mod generate;
/// Shape checks for model responses
pub mod guardrails;
/// Logging configuration and utilities
pub mod logging;
/// `package.json` access
pub mod manifest;
/// Canonical structure assembly and text rendering
pub mod metadata;
/// OpenRouter chat-completion client and credential probe
pub mod openrouter;
/// Multi-step AI protocol
pub mod orchestrator;
/// System prompts for every AI step
pub mod prompts;
/// Regex based export scanner
pub mod static_mode;
/// Shared data types
pub mod types;
/// Terminal output
pub mod ui;

pub use config::{Config, LlmSettings};
pub use error::{GeneratorError, Result};
pub use generate::{generate, GenerateOptions, GenerateReport};
pub use orchestrator::{run_ai_mode, AiModeInput, AiProgress};
pub use types::{ExportKind, ExportMeta, ExportsMap, LlmPackageJson, Mode, PackageOverview};

/// Name used in the `generatedBy` field
pub const PKG_NAME: &str = "hayagriva-llm";

/// Provenance string, `hayagriva-llm@<crate version>`
pub fn generated_by() -> String {
    format!("{}@{}", PKG_NAME, env!("CARGO_PKG_VERSION"))
}
