//! Assembly of the canonical `llm.package.json` structure and its flat-text rendering.

/// Building, extending and merging the JSON metadata
pub mod json;
/// Plain-text rendering
pub mod txt;

pub use json::{build_json_metadata, extras_from_ai_response, merge_with_existing, JsonMetadataInput, GENERATED_KEYS};
pub use txt::build_txt_metadata;
