//! Strict validators for model responses.
//!
//! Package-level fields fail loudly. Per-export noise is tolerated: each
//! entry of a batch is normalised to an [`EntryOutcome`] and dropped entries
//! never void their siblings.

use log::debug;
use serde_json::{Map, Value};

use crate::error::{GeneratorError, Result};
use crate::types::{ExportKind, ExportMeta, ExportsMap, ExportsStepResult, PackageOverview};

const OVERVIEW_KEYS: &[&str] = &[
    "summary",
    "sideEffects",
    "keywords",
    "frameworks",
    "whenToUse",
    "reasonToUse",
    "useCases",
    "documentation",
    "relatedPackages",
];

const EXPORT_KEYS: &[&str] = &[
    "type",
    "description",
    "hook",
    "params",
    "returns",
    "sideEffect",
    "example",
];

fn as_object(value: &Value) -> Result<&Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| GeneratorError::validation("Response must be a JSON object"))
}

fn string_array(value: Option<&Value>) -> Option<Vec<String>> {
    value?
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

fn required_string_array(obj: &Map<String, Value>, key: &str) -> Result<Vec<String>> {
    string_array(obj.get(key)).ok_or_else(|| {
        GeneratorError::validation(format!("\"{}\" must be an array of strings", key))
    })
}

fn optional_string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Validates the package-overview step.
///
/// `summary`, `sideEffects`, `keywords` and `frameworks` are required; the
/// extended fields are kept only when they have the right type.
pub fn validate_package_overview(parsed: Value) -> Result<PackageOverview> {
    let obj = as_object(&parsed)?;

    let summary = obj
        .get("summary")
        .and_then(Value::as_str)
        .ok_or_else(|| GeneratorError::validation("Missing or invalid \"summary\" (must be a string)"))?
        .trim()
        .to_string();
    let side_effects = required_string_array(obj, "sideEffects")?;
    let keywords = required_string_array(obj, "keywords")?;
    let frameworks = required_string_array(obj, "frameworks")?;

    let extra = obj
        .iter()
        .filter(|(key, value)| !OVERVIEW_KEYS.contains(&key.as_str()) && !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(PackageOverview {
        summary,
        side_effects,
        keywords,
        frameworks,
        when_to_use: optional_string(obj, "whenToUse"),
        reason_to_use: string_array(obj.get("reasonToUse")),
        use_cases: string_array(obj.get("useCases")),
        documentation: optional_string(obj, "documentation"),
        related_packages: string_array(obj.get("relatedPackages")),
        extra,
    })
}

/// Result of normalising one entry of an export batch
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    /// Entry is well-formed
    Keep(ExportMeta),
    /// Entry was discarded
    Drop(&'static str),
}

/// Normalises a single `exports` entry.
pub fn normalize_export_entry(value: &Value) -> EntryOutcome {
    let Some(entry) = value.as_object() else {
        return EntryOutcome::Drop("entry is not an object");
    };
    let Some(kind) = entry.get("type").and_then(Value::as_str).and_then(ExportKind::parse) else {
        return EntryOutcome::Drop("type is not function, class or type");
    };

    let description = optional_string(entry, "description").unwrap_or_default();
    let hook = entry.get("hook").map(truthy).unwrap_or(false);

    let mut meta = ExportMeta::new(kind, description, hook);
    meta.params = optional_string(entry, "params");
    meta.returns = optional_string(entry, "returns");
    meta.side_effect = entry.get("sideEffect").and_then(Value::as_bool);
    meta.example = optional_string(entry, "example");
    meta.extra = entry
        .iter()
        .filter(|(key, value)| !EXPORT_KEYS.contains(&key.as_str()) && !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    EntryOutcome::Keep(meta)
}

/// Loose boolean coercion for the `hook` flag.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Validates one export-description batch.
///
/// `exports` must be an object. A missing or malformed `hooks` array becomes empty.
pub fn validate_exports_step(parsed: Value) -> Result<ExportsStepResult> {
    let obj = as_object(&parsed)?;
    let entries = obj
        .get("exports")
        .and_then(Value::as_object)
        .ok_or_else(|| GeneratorError::validation("Missing or invalid \"exports\" (must be an object)"))?;

    let mut exports = ExportsMap::new();
    for (name, value) in entries {
        match normalize_export_entry(value) {
            EntryOutcome::Keep(meta) => {
                exports.insert(name.clone(), meta);
            }
            EntryOutcome::Drop(reason) => debug!("Dropping export {}: {}", name, reason),
        }
    }

    let hooks = string_array(obj.get("hooks")).unwrap_or_default();
    Ok(ExportsStepResult { exports, hooks })
}

/// Validates the "list export names" step.
pub fn validate_export_names_list(parsed: Value) -> Result<Vec<String>> {
    let obj = as_object(&parsed)?;
    string_array(obj.get("names")).ok_or_else(|| {
        GeneratorError::validation("Missing or invalid \"names\" (must be an array of strings)")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    fn overview() -> Value {
        json!({
            "summary": "  Tiny fetch wrapper.  ",
            "sideEffects": ["reads process.env"],
            "keywords": ["http", "fetch"],
            "frameworks": []
        })
    }

    #[test]
    fn test_overview_trims_summary_and_keeps_arrays() {
        let result = validate_package_overview(overview()).unwrap();
        assert_eq!(result.summary, "Tiny fetch wrapper.");
        assert_eq!(result.side_effects, vec!["reads process.env"]);
        assert_eq!(result.keywords, vec!["http", "fetch"]);
        assert!(result.frameworks.is_empty());
        assert!(result.when_to_use.is_none());
    }

    #[test_case("summary" ; "summary")]
    #[test_case("sideEffects" ; "side effects")]
    #[test_case("keywords" ; "keywords")]
    #[test_case("frameworks" ; "frameworks")]
    fn test_overview_missing_field_names_it(field: &str) {
        let mut value = overview();
        value.as_object_mut().unwrap().remove(field);
        let err = validate_package_overview(value).unwrap_err();
        assert!(err.to_string().contains(field), "{}", err);
    }

    #[test_case("summary", json!(42))]
    #[test_case("keywords", json!("http"))]
    #[test_case("frameworks", json!(["react", 1]))]
    fn test_overview_mistyped_field_names_it(field: &str, bad: Value) {
        let mut value = overview();
        value[field] = bad;
        let err = validate_package_overview(value).unwrap_err();
        assert!(err.to_string().contains(field), "{}", err);
    }

    #[test]
    fn test_overview_extended_fields_are_optional() {
        let mut value = overview();
        value["whenToUse"] = json!("When you need fetch with retries.");
        value["reasonToUse"] = json!(["small", 3]);
        value["useCases"] = json!(["API clients"]);
        value["documentation"] = json!({"url": "nope"});
        value["license"] = json!("MIT");
        value["ignored"] = Value::Null;

        let result = validate_package_overview(value).unwrap();
        assert_eq!(result.when_to_use.as_deref(), Some("When you need fetch with retries."));
        assert!(result.reason_to_use.is_none());
        assert_eq!(result.use_cases, Some(vec!["API clients".to_string()]));
        assert!(result.documentation.is_none());
        assert_eq!(result.extra.get("license"), Some(&json!("MIT")));
        assert!(!result.extra.contains_key("ignored"));
    }

    #[test]
    fn test_overview_rejects_non_object() {
        assert!(validate_package_overview(json!(["summary"])).is_err());
    }

    #[test]
    fn test_exports_drops_bad_type_keeps_sibling() {
        let parsed = json!({
            "exports": {
                "fetchJson": {"type": "function", "description": "Fetches JSON", "hook": false},
                "Broken": {"type": "variable", "description": "nope"}
            },
            "hooks": []
        });
        let result = validate_exports_step(parsed).unwrap();
        assert_eq!(result.exports.len(), 1);
        assert!(result.exports.contains_key("fetchJson"));
    }

    #[test]
    fn test_exports_entry_normalisation() {
        let parsed = json!({
            "exports": {
                "useThing": {
                    "type": "function",
                    "hook": 1,
                    "params": "id: string",
                    "returns": 7,
                    "sideEffect": "yes",
                    "example": "useThing('a')",
                    "since": "2.0",
                    "deprecated": null
                },
                "notAnObject": "function"
            }
        });
        let result = validate_exports_step(parsed).unwrap();
        assert!(result.hooks.is_empty());
        assert_eq!(result.exports.len(), 1);

        let entry = &result.exports["useThing"];
        assert_eq!(entry.kind, ExportKind::Function);
        assert_eq!(entry.description, "");
        assert!(entry.hook);
        assert_eq!(entry.params.as_deref(), Some("id: string"));
        assert!(entry.returns.is_none());
        assert!(entry.side_effect.is_none());
        assert_eq!(entry.example.as_deref(), Some("useThing('a')"));
        assert_eq!(entry.extra.get("since"), Some(&json!("2.0")));
        assert!(!entry.extra.contains_key("deprecated"));
    }

    #[test]
    fn test_exports_requires_exports_object() {
        let err = validate_exports_step(json!({"exports": [], "hooks": []})).unwrap_err();
        assert!(err.to_string().contains("exports"));
    }

    #[test]
    fn test_exports_malformed_hooks_default_empty() {
        let result = validate_exports_step(json!({"exports": {}, "hooks": "useX"})).unwrap();
        assert!(result.hooks.is_empty());
    }

    #[test]
    fn test_names_list() {
        let names = validate_export_names_list(json!({"names": ["a", "b"]})).unwrap();
        assert_eq!(names, vec!["a", "b"]);

        let err = validate_export_names_list(json!({"names": ["a", 2]})).unwrap_err();
        assert!(err.to_string().contains("names"));
        assert!(validate_export_names_list(json!({})).is_err());
    }
}
