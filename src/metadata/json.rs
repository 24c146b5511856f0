use serde_json::{Map, Value};

use crate::manifest::PackageManifest;
use crate::types::{AiRawResponse, ExportsMap, LlmPackageJson, Mode, PackageOverview};

/// Top-level keys this tool owns. Every other key in an existing file is carried forward.
pub const GENERATED_KEYS: &[&str] = &[
    "name",
    "version",
    "description",
    "summary",
    "sideEffects",
    "keywords",
    "whenToUse",
    "reasonToUse",
    "useCases",
    "documentation",
    "relatedPackages",
    "exports",
    "hooks",
    "frameworks",
    "generatedBy",
    "mode",
];

fn is_generated_key(key: &str) -> bool {
    GENERATED_KEYS.contains(&key)
}

/// Everything needed to assemble one `llm.package.json`
#[derive(Debug)]
pub struct JsonMetadataInput<'a> {
    /// Source of name, version and description
    pub manifest: &'a PackageManifest,
    /// Described exports
    pub exports: ExportsMap,
    /// Hook names
    pub hooks: Vec<String>,
    /// Frameworks
    pub frameworks: Vec<String>,
    /// Mode that produced the content
    pub mode: Mode,
    /// Provenance string
    pub generated_by: String,
    /// Package overview, when the mode produced one
    pub overview: Option<PackageOverview>,
    /// Additional keys; known keys always win over these
    pub extras: Map<String, Value>,
}

/// Builds the canonical structure. Optional fields are only set when their source is defined.
pub fn build_json_metadata(input: JsonMetadataInput<'_>) -> LlmPackageJson {
    let JsonMetadataInput {
        manifest,
        exports,
        hooks,
        frameworks,
        mode,
        generated_by,
        overview,
        extras,
    } = input;

    let mut meta = LlmPackageJson {
        name: manifest.name().unwrap_or("unknown").to_string(),
        version: manifest.version().unwrap_or("0.0.0").to_string(),
        description: manifest.description().unwrap_or_default().to_string(),
        summary: None,
        side_effects: None,
        keywords: None,
        when_to_use: None,
        reason_to_use: None,
        use_cases: None,
        documentation: None,
        related_packages: None,
        exports,
        hooks,
        frameworks,
        generated_by,
        mode,
        extra: Map::new(),
    };

    if let Some(overview) = overview {
        meta.summary = Some(overview.summary);
        meta.side_effects = Some(overview.side_effects);
        meta.keywords = Some(overview.keywords);
        meta.when_to_use = overview.when_to_use;
        meta.reason_to_use = overview.reason_to_use;
        meta.use_cases = overview.use_cases;
        meta.documentation = overview.documentation;
        meta.related_packages = overview.related_packages;
    }

    for (key, value) in extras {
        if !value.is_null() && !is_generated_key(&key) {
            meta.extra.entry(key).or_insert(value);
        }
    }
    meta
}

/// Extra top-level keys the model returned alongside the overview
pub fn extras_from_ai_response(result: &AiRawResponse) -> Map<String, Value> {
    result
        .overview
        .extra
        .iter()
        .filter(|(key, value)| !is_generated_key(key) && !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Layers a fresh result over an existing file.
///
/// Generated keys always come from `fresh`; every other key of `existing`
/// is copied over, replacing any same-named extra.
pub fn merge_with_existing(mut fresh: LlmPackageJson, existing: &Map<String, Value>) -> LlmPackageJson {
    for (key, value) in existing {
        if !is_generated_key(key) {
            fresh.extra.insert(key.clone(), value.clone());
        }
    }
    fresh
}
