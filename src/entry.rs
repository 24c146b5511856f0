//! Resolves the entry file used for export extraction.
//!
//! Priority: `source` -> `module` -> `main` -> conventional index files.

use std::path::{Path, PathBuf};

use crate::manifest::PackageManifest;

const MANIFEST_ENTRY_FIELDS: &[&str] = &["source", "module", "main"];

const FALLBACK_PATHS: &[&str] = &["src/index.ts", "index.ts", "src/index.js", "index.js"];

/// Returns the first existing entry candidate, resolved against `cwd`
pub fn detect_entry_file(manifest: &PackageManifest, cwd: &Path) -> Option<PathBuf> {
    let declared = MANIFEST_ENTRY_FIELDS
        .iter()
        .filter_map(|field| manifest.field(field))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| cwd.join(value));
    let fallbacks = FALLBACK_PATHS.iter().map(|rel| cwd.join(rel));

    declared.chain(fallbacks).find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn touch(dir: &Path, rel: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "export {}\n").unwrap();
    }

    #[test]
    fn test_prefers_source_over_module_and_main() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/cli.ts");
        touch(dir.path(), "dist/cli.mjs");
        touch(dir.path(), "dist/cli.cjs");
        let manifest = PackageManifest::from_value(json!({
            "source": "src/cli.ts", "module": "dist/cli.mjs", "main": "dist/cli.cjs"
        }))
        .unwrap();

        let entry = detect_entry_file(&manifest, dir.path()).unwrap();
        assert!(entry.ends_with("src/cli.ts"));
    }

    #[test]
    fn test_skips_missing_declared_entries() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "dist/index.cjs");
        let manifest = PackageManifest::from_value(json!({
            "source": "nonexistent.ts", "module": "  ", "main": "dist/index.cjs"
        }))
        .unwrap();

        let entry = detect_entry_file(&manifest, dir.path()).unwrap();
        assert!(entry.ends_with("dist/index.cjs"));
    }

    #[test]
    fn test_falls_back_to_index_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "index.js");
        touch(dir.path(), "src/index.ts");
        let manifest = PackageManifest::from_value(json!({})).unwrap();

        let entry = detect_entry_file(&manifest, dir.path()).unwrap();
        assert!(entry.ends_with("src/index.ts"));
    }

    #[test]
    fn test_returns_none_when_nothing_exists() {
        let dir = TempDir::new().unwrap();
        let manifest = PackageManifest::from_value(json!({
            "source": "nonexistent.ts", "module": "nope.js", "main": "missing.js"
        }))
        .unwrap();
        assert!(detect_entry_file(&manifest, dir.path()).is_none());
    }
}
