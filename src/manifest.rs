//! `package.json` loading.

use std::path::{Path, PathBuf};

use log::debug;
use serde_json::{Map, Value};

use crate::error::{GeneratorError, Result};

/// File name of the manifest looked up in the working directory
pub const MANIFEST_FILE: &str = "package.json";

/// A parsed package manifest. Only string-typed fields are exposed.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageManifest {
    fields: Map<String, Value>,
}

impl PackageManifest {
    /// Wraps an already decoded manifest; fails unless it is a JSON object
    pub fn from_value(value: Value) -> std::result::Result<Self, String> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err("package.json must contain a JSON object".to_string()),
        }
    }

    /// Loads `<cwd>/package.json`
    pub fn load(cwd: &Path) -> Result<Self> {
        let path = cwd.join(MANIFEST_FILE);
        if !path.exists() {
            return Err(manifest_error(
                path,
                "No package.json found. Run this command from your package root (where package.json lives)",
            ));
        }
        debug!("Loading {}", path.display());

        let raw = std::fs::read_to_string(&path)
            .map_err(|e| manifest_error(path.clone(), format!("Failed to read package.json: {}", e)))?;
        let value: Value = serde_json::from_str(&raw)
            .map_err(|e| manifest_error(path.clone(), format!("Failed to parse package.json: {}", e)))?;
        Self::from_value(value).map_err(|message| manifest_error(path, message))
    }

    /// String value of a top-level field
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// `name`
    pub fn name(&self) -> Option<&str> {
        self.field("name")
    }

    /// `version`
    pub fn version(&self) -> Option<&str> {
        self.field("version")
    }

    /// `description`
    pub fn description(&self) -> Option<&str> {
        self.field("description")
    }

    /// Manifest as 2-space indented JSON, as sent to the model
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.fields)?)
    }
}

fn manifest_error(path: PathBuf, message: impl Into<String>) -> GeneratorError {
    GeneratorError::Manifest {
        path,
        message: message.into(),
    }
}
