//! AI mode: a strictly sequential multi-step prompting protocol.
//!
//! 1. list export names
//! 2. package overview
//! 3. one export-description call per batch of [`EXPORT_BATCH_SIZE`] names
//!
//! Any failing step aborts the whole run; nothing partial is returned.

use std::collections::HashSet;
use std::path::Path;

use log::{debug, info};
use serde_json::Value;

use crate::error::Result;
use crate::guardrails::{validate_export_names_list, validate_exports_step, validate_package_overview};
use crate::openrouter::{complete_validated, CompletionBackend};
use crate::prompts;
use crate::types::{AiRawResponse, ExportsMap, ExportsStepResult};

/// Names described per export-detail request
pub const EXPORT_BATCH_SIZE: usize = 8;

const FALLBACK_PACKAGE_LABEL: &str = "this package";

/// Progress event emitted after each completed step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiProgress {
    /// Steps completed so far
    pub current: usize,
    /// `2 + number_of_batches`, known once the names are listed
    pub total: usize,
    /// Human readable description of the finished step
    pub message: String,
}

/// Inputs that make up the shared user prompt
#[derive(Debug, Clone, Default)]
pub struct AiModeInput {
    /// Pretty-printed package manifest
    pub package_json_content: String,
    /// Entry file, if one was detected
    pub entry_path: Option<std::path::PathBuf>,
    /// Append the entry file source to the prompt
    pub include_src: bool,
    /// Existing llm.package.json, pretty-printed, used as reference
    pub existing_llm_package_json: Option<String>,
}

/// Builds the user content shared by every step
pub fn build_user_content(input: &AiModeInput) -> String {
    let mut content = format!("Package manifest:\n{}", input.package_json_content);

    if let Some(existing) = &input.existing_llm_package_json {
        content.push_str(
            "\n\nCurrent llm.package.json (use as reference; update sections as needed):\n",
        );
        content.push_str(existing);
    }

    if input.include_src {
        if let Some(source) = input.entry_path.as_deref().and_then(read_entry_source) {
            content.push_str("\n\nEntry file source:\n");
            content.push_str(&source);
        }
    }
    content
}

fn read_entry_source(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(source) => Some(source),
        Err(e) => {
            debug!("Omitting entry source {}: {}", path.display(), e);
            None
        }
    }
}

/// `name@version` from the manifest text, or a generic label
pub fn package_label(package_json_content: &str) -> String {
    let Ok(manifest) = serde_json::from_str::<Value>(package_json_content) else {
        return FALLBACK_PACKAGE_LABEL.to_string();
    };
    match (manifest["name"].as_str(), manifest["version"].as_str()) {
        (Some(name), Some(version)) => format!("{}@{}", name, version),
        (Some(name), None) => name.to_string(),
        _ => FALLBACK_PACKAGE_LABEL.to_string(),
    }
}

/// Runs the full protocol, reporting progress after every step
pub async fn run_ai_mode<B, P>(backend: &B, input: &AiModeInput, mut on_progress: P) -> Result<AiRawResponse>
where
    B: CompletionBackend + ?Sized,
    P: FnMut(AiProgress),
{
    let user_content = build_user_content(input);

    info!("AI step: listing export names");
    let names = complete_validated(
        backend,
        prompts::STEP_EXPORT_NAMES,
        &user_content,
        validate_export_names_list,
        "export-names",
    )
    .await?;

    let batches: Vec<&[String]> = names.chunks(EXPORT_BATCH_SIZE).collect();
    let total = 2 + batches.len();
    on_progress(AiProgress {
        current: 1,
        total,
        message: format!("Listed {} export names", names.len()),
    });

    info!("AI step: package overview");
    let overview = complete_validated(
        backend,
        prompts::STEP_OVERVIEW,
        &user_content,
        validate_package_overview,
        "package-overview",
    )
    .await?;
    on_progress(AiProgress {
        current: 2,
        total,
        message: "Package overview".to_string(),
    });

    let label = package_label(&input.package_json_content);
    let mut results = Vec::with_capacity(batches.len());
    for (index, batch) in batches.iter().enumerate() {
        debug!("AI step: export batch {}/{} ({} names)", index + 1, batches.len(), batch.len());
        let batch_content = format!(
            "{}\n\nPackage: {}\nDescribe only these exports (JSON array of names): {}",
            user_content,
            label,
            serde_json::to_string(batch)?
        );
        let step = format!("exports-batch-{}", index + 1);
        let result = complete_validated(
            backend,
            prompts::STEP_EXPORT_BATCH,
            &batch_content,
            validate_exports_step,
            &step,
        )
        .await?;
        results.push(result);

        on_progress(AiProgress {
            current: 3 + index,
            total,
            message: format!("Exports batch {}/{}", index + 1, batches.len()),
        });
    }

    let merged = merge_export_batches(results);
    Ok(AiRawResponse {
        overview,
        exports: merged.exports,
        hooks: merged.hooks,
    })
}

/// Unions batch results.
///
/// Exports are shallow-merged with later batches overwriting duplicate names;
/// hook names keep their first-seen order with duplicates suppressed.
pub fn merge_export_batches<I>(batches: I) -> ExportsStepResult
where
    I: IntoIterator<Item = ExportsStepResult>,
{
    let mut exports = ExportsMap::new();
    let mut hooks = Vec::new();
    let mut seen = HashSet::new();

    for batch in batches {
        exports.extend(batch.exports);
        for hook in batch.hooks {
            if seen.insert(hook.clone()) {
                hooks.push(hook);
            }
        }
    }
    ExportsStepResult { exports, hooks }
}
