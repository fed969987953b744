//! Plugin manifest parsing
//!
//! Only `id` matters for syncing. The other fields are shown in summaries,
//! so a wrongly typed `name` or `version` is dropped rather than rejected.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

use super::artifacts::MANIFEST_FILE;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{} is not a JSON object", .path.display())]
    NotAnObject { path: PathBuf },

    #[error("{} has no \"id\" field", .path.display())]
    MissingId { path: PathBuf },
}

/// Contents of a plugin's `manifest.json`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub id: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
    pub min_app_version: Option<String>,
}

impl Manifest {
    /// Returns the manifest path inside a source directory
    pub fn path_in(source_dir: &Path) -> PathBuf {
        source_dir.join(MANIFEST_FILE)
    }

    /// Reads and parses `manifest.json` from a source directory.
    ///
    /// The document must be a JSON object. `id` counts only as a string;
    /// the display fields accept strings and numbers and ignore anything else.
    pub fn load(source_dir: &Path) -> Result<Self, ManifestError> {
        let path = Self::path_in(source_dir);

        let content = fs::read_to_string(&path).map_err(|source| ManifestError::Read {
            path: path.clone(),
            source,
        })?;

        let document: Value = serde_json::from_str(&content).map_err(|source| {
            ManifestError::Parse {
                path: path.clone(),
                source,
            }
        })?;

        let fields = document
            .as_object()
            .ok_or(ManifestError::NotAnObject { path })?;

        Ok(Self {
            id: fields.get("id").and_then(Value::as_str).map(str::to_string),
            name: display_field(fields, "name"),
            version: display_field(fields, "version"),
            min_app_version: display_field(fields, "minAppVersion"),
        })
    }

    /// Returns the non-empty `id` of a manifest loaded from `source_dir`
    pub fn require_id(&self, source_dir: &Path) -> Result<&str, ManifestError> {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(ManifestError::MissingId {
                path: Self::path_in(source_dir),
            }),
        }
    }

    /// Human-readable label, e.g. `Demo Plugin v1.0.2`
    pub fn label(&self) -> Option<String> {
        let name = self.name.as_deref().or(self.id.as_deref())?;
        Some(match &self.version {
            Some(version) => format!("{} v{}", name, version),
            None => name.to_string(),
        })
    }
}

fn display_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
