//! Top-level control flow for one run: load inputs, dispatch on mode,
//! assemble, merge with the previous file and write both artifacts.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::config::LlmSettings;
use crate::entry::detect_entry_file;
use crate::error::{GeneratorError, Result};
use crate::manifest::PackageManifest;
use crate::metadata::{
    build_json_metadata, build_txt_metadata, extras_from_ai_response, merge_with_existing, JsonMetadataInput,
};
use crate::openrouter::OpenRouterClient;
use crate::orchestrator::{run_ai_mode, AiModeInput, AiProgress};
use crate::static_mode::{extract_static_exports, hooks_from_exports};
use crate::types::{ExportsMap, Mode};

/// Structured metadata file name
pub const JSON_FILE: &str = "llm.package.json";
/// Flat text rendering file name
pub const TXT_FILE: &str = "llm.package.txt";

/// Options for one generation run
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Static extraction or the AI protocol
    pub mode: Mode,
    /// Remote model settings; the key is only required in AI mode
    pub settings: LlmSettings,
    /// Send the entry file source to the model
    pub include_src: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Static,
            settings: LlmSettings::default(),
            include_src: false,
        }
    }
}

/// What a finished run wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    /// Written `llm.package.json`
    pub json_path: PathBuf,
    /// Written `llm.package.txt`
    pub txt_path: PathBuf,
    /// The JSON file existed before this run
    pub json_existed: bool,
    /// The text file existed before this run
    pub txt_existed: bool,
    /// Mode that produced the content
    pub mode: Mode,
    /// Number of exports in the written file
    pub export_count: usize,
    /// A readable previous JSON file was merged into the result
    pub merged: bool,
}

/// Generates both metadata files in `cwd`.
///
/// Nothing is written unless every step succeeds. In AI mode the credential
/// is probed before any orchestration request is sent.
pub async fn generate<P>(cwd: &Path, options: &GenerateOptions, on_progress: P) -> Result<GenerateReport>
where
    P: FnMut(AiProgress),
{
    let json_path = cwd.join(JSON_FILE);
    let txt_path = cwd.join(TXT_FILE);
    let json_existed = json_path.exists();
    let txt_existed = txt_path.exists();

    let existing = load_existing(&json_path);
    if existing.is_some() {
        info!("Using existing {} as reference", JSON_FILE);
    }

    let manifest = PackageManifest::load(cwd)?;
    let entry_path = detect_entry_file(&manifest, cwd);
    match &entry_path {
        Some(path) => info!("Entry: {}", path.display()),
        None => info!("No entry file found"),
    }

    let fresh = match options.mode {
        Mode::Static => {
            let exports = match &entry_path {
                Some(path) => extract_static_exports(path)?,
                None => ExportsMap::new(),
            };
            let hooks = hooks_from_exports(&exports);
            build_json_metadata(JsonMetadataInput {
                manifest: &manifest,
                exports,
                hooks,
                frameworks: Vec::new(),
                mode: Mode::Static,
                generated_by: crate::generated_by(),
                overview: None,
                extras: Map::new(),
            })
        }
        Mode::Ai => {
            let api_key = options
                .settings
                .api_key
                .as_deref()
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .ok_or_else(|| {
                    GeneratorError::Config(
                        "AI mode requires --api-key or OPEN_ROUTER_API_KEY (or OPENROUTER_API_KEY)".into(),
                    )
                })?;

            let client = OpenRouterClient::new(&options.settings, api_key)?;
            info!("Checking API key against {}", client.model());
            client.probe().await?.into_result(client.model())?;

            let input = AiModeInput {
                package_json_content: manifest.to_pretty_json()?,
                entry_path: entry_path.clone(),
                include_src: options.include_src,
                existing_llm_package_json: existing
                    .as_ref()
                    .map(|map| serde_json::to_string_pretty(map))
                    .transpose()?,
            };
            let result = run_ai_mode(&client, &input, on_progress).await?;
            let extras = extras_from_ai_response(&result);
            let frameworks = result.overview.frameworks.clone();

            build_json_metadata(JsonMetadataInput {
                manifest: &manifest,
                exports: result.exports,
                hooks: result.hooks,
                frameworks,
                mode: Mode::Ai,
                generated_by: crate::generated_by(),
                overview: Some(result.overview),
                extras,
            })
        }
    };

    let merged = existing.is_some();
    let meta = match &existing {
        Some(existing) => merge_with_existing(fresh, existing),
        None => fresh,
    };

    let json = format!("{}\n", serde_json::to_string_pretty(&meta)?);
    let txt = build_txt_metadata(&meta);

    write_pair(&json_path, &json, &txt_path, &txt)?;
    debug!("Wrote {} and {}", json_path.display(), txt_path.display());

    Ok(GenerateReport {
        json_path,
        txt_path,
        json_existed,
        txt_existed,
        mode: options.mode,
        export_count: meta.exports.len(),
        merged,
    })
}

/// Previous metadata file as an object; unreadable or non-object content is ignored
fn load_existing(path: &Path) -> Option<Map<String, Value>> {
    if !path.exists() {
        return None;
    }
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Ignoring unreadable {}: {}", path.display(), e);
            return None;
        }
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) => {
            warn!("Ignoring {}: top level is not an object", path.display());
            None
        }
        Err(e) => {
            warn!("Ignoring invalid {}: {}", path.display(), e);
            None
        }
    }
}

/// Temp file next to `path` holding `content`, ready to be renamed into place
fn stage(path: &Path, content: &str) -> Result<NamedTempFile> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(content.as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// Replaces both artifacts or neither.
///
/// Both temp files are filled before the first rename. If the text file
/// cannot be renamed into place, the JSON file is put back to its previous
/// bytes (or removed when there was none) and the rename error is returned.
fn write_pair(json_path: &Path, json: &str, txt_path: &Path, txt: &str) -> Result<()> {
    let staged_json = stage(json_path, json)?;
    let staged_txt = stage(txt_path, txt)?;
    let previous_json = if json_path.is_file() {
        Some(fs::read(json_path)?)
    } else {
        None
    };

    staged_json
        .persist(json_path)
        .map_err(|e| GeneratorError::IO(e.error))?;

    if let Err(e) = staged_txt.persist(txt_path) {
        let restored = match previous_json {
            Some(bytes) => fs::write(json_path, bytes),
            None => fs::remove_file(json_path),
        };
        if let Err(restore_err) = restored {
            warn!("Could not restore {}: {}", json_path.display(), restore_err);
        }
        return Err(GeneratorError::IO(e.error));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_existing_ignores_non_objects() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(JSON_FILE);
        assert!(load_existing(&path).is_none());

        fs::write(&path, "[1, 2]").unwrap();
        assert!(load_existing(&path).is_none());

        fs::write(&path, "{ not json").unwrap();
        assert!(load_existing(&path).is_none());

        fs::write(&path, r#"{"customField": "x"}"#).unwrap();
        assert_eq!(load_existing(&path).unwrap()["customField"], "x");
    }

    #[test]
    fn test_write_pair_replaces_content() {
        let dir = TempDir::new().unwrap();
        let json_path = dir.path().join(JSON_FILE);
        let txt_path = dir.path().join(TXT_FILE);
        write_pair(&json_path, "{}\n", &txt_path, "first\n").unwrap();
        write_pair(&json_path, "{\"a\": 1}\n", &txt_path, "second\n").unwrap();

        assert_eq!(fs::read_to_string(&json_path).unwrap(), "{\"a\": 1}\n");
        assert_eq!(fs::read_to_string(&txt_path).unwrap(), "second\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_write_pair_removes_new_json_when_txt_fails() {
        let dir = TempDir::new().unwrap();
        let json_path = dir.path().join(JSON_FILE);
        let txt_path = dir.path().join(TXT_FILE);
        fs::create_dir(&txt_path).unwrap();

        assert!(write_pair(&json_path, "{}\n", &txt_path, "text\n").is_err());

        assert!(!json_path.exists());
        assert!(txt_path.is_dir());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_ai_mode_without_key_writes_nothing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"name": "foo", "version": "1.2.0"}"#).unwrap();
        let options = GenerateOptions {
            mode: Mode::Ai,
            ..Default::default()
        };

        let err = generate(dir.path(), &options, |_| {}).await.unwrap_err();

        assert!(matches!(err, GeneratorError::Config(_)));
        assert!(err.to_string().contains("OPEN_ROUTER_API_KEY"));
        assert!(!dir.path().join(JSON_FILE).exists());
        assert!(!dir.path().join(TXT_FILE).exists());
    }

    #[tokio::test]
    async fn test_missing_manifest() {
        let dir = TempDir::new().unwrap();
        let err = generate(dir.path(), &GenerateOptions::default(), |_| {}).await.unwrap_err();
        assert!(matches!(err, GeneratorError::Manifest { .. }));
    }
}
