//! Core types for llm.package metadata.
//!
//! Records that the model or third-party adapters may extend carry an
//! `extra` map so unknown keys survive validation, merge and serialization.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Model used when neither flags, environment nor config file name one
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// Kind of an exported symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    /// Function or function-valued constant
    Function,
    /// Class declaration
    Class,
    /// Interface, type alias, enum or other non-callable export
    Type,
}

impl ExportKind {
    /// Parses the exact wire value; anything else is rejected
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "function" => Some(Self::Function),
            "class" => Some(Self::Class),
            "type" => Some(Self::Type),
            _ => None,
        }
    }
}

/// Metadata for a single exported symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMeta {
    /// Symbol kind
    #[serde(rename = "type")]
    pub kind: ExportKind,
    /// One-line description
    pub description: String,
    /// Whether the symbol is a hook
    pub hook: bool,
    /// Parameter summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<String>,
    /// Return type or one-liner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,
    /// True when calling the export performs IO or mutates shared state
    #[serde(rename = "sideEffect", skip_serializing_if = "Option::is_none")]
    pub side_effect: Option<bool>,
    /// Usage snippet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    /// Any other keys supplied by the model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExportMeta {
    /// Creates an entry with only the required fields set
    pub fn new(kind: ExportKind, description: impl Into<String>, hook: bool) -> Self {
        Self {
            kind,
            description: description.into(),
            hook,
            params: None,
            returns: None,
            side_effect: None,
            example: None,
            extra: Map::new(),
        }
    }
}

/// Export name -> metadata. Keys are unique and iterate in lexicographic order.
pub type ExportsMap = BTreeMap<String, ExportMeta>;

/// Generation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Syntax scan of the entry file, no network
    Static,
    /// Multi-step remote model flow
    Ai,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Static => write!(f, "static"),
            Mode::Ai => write!(f, "ai"),
        }
    }
}

/// Package-level descriptive fields returned by the overview step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageOverview {
    /// 1-4 sentence summary, trimmed
    pub summary: String,
    /// Package-level side effects
    pub side_effects: Vec<String>,
    /// Search hints
    pub keywords: Vec<String>,
    /// Frameworks the package targets
    pub frameworks: Vec<String>,
    /// When a developer should reach for this package
    pub when_to_use: Option<String>,
    /// Reasons to pick this package
    pub reason_to_use: Option<Vec<String>>,
    /// Typical use cases
    pub use_cases: Option<Vec<String>>,
    /// Documentation URL or pointer
    pub documentation: Option<String>,
    /// Related or alternative packages
    pub related_packages: Option<Vec<String>>,
    /// Unrecognised top-level keys, preserved verbatim
    pub extra: Map<String, Value>,
}

/// Validated result of one export-description batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportsStepResult {
    /// Described exports
    pub exports: ExportsMap,
    /// Names flagged as hooks
    pub hooks: Vec<String>,
}

/// Merged output of the whole AI flow
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AiRawResponse {
    /// Overview step result
    pub overview: PackageOverview,
    /// All batches merged
    pub exports: ExportsMap,
    /// Hook names in first-seen order
    pub hooks: Vec<String>,
}

/// The persisted `llm.package.json` structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmPackageJson {
    /// Package name from the manifest
    pub name: String,
    /// Package version from the manifest
    pub version: String,
    /// Manifest description
    pub description: String,
    /// One-paragraph summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Package-level side effects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_effects: Option<Vec<String>>,
    /// Search hints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    /// When to use the package
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when_to_use: Option<String>,
    /// Reasons to use the package
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason_to_use: Option<Vec<String>>,
    /// Typical use cases
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_cases: Option<Vec<String>>,
    /// Documentation pointer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    /// Related packages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_packages: Option<Vec<String>>,
    /// Exported symbols
    pub exports: ExportsMap,
    /// Hook names
    pub hooks: Vec<String>,
    /// Frameworks
    pub frameworks: Vec<String>,
    /// `hayagriva-llm@<version>`
    pub generated_by: String,
    /// Mode that produced the file
    pub mode: Mode,
    /// Keys this tool does not own
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
