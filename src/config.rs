//! Configuration handling
//!
//! Two layers:
//! - [`Settings`]: optional TOML file (`--config`, `$OBSIDIAN_PLUGIN_SYNC_CONFIG`,
//!   or `~/.config/obsidian-plugin-sync/config.toml`)
//! - [`SyncOptions`]: the per-invocation options from the command line,
//!   validated once at startup

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Build command used when the settings file does not name one
pub const DEFAULT_BUILD_COMMAND: &str = "npm run build";

/// Debounce applied to filesystem notifications in watch mode
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Source directory {0} does not exist.")]
    SourceNotFound(PathBuf),

    #[error("Vault directory {0} does not exist.")]
    VaultNotFound(PathBuf),

    #[error("Could not determine plugin ID. Please provide it with --plugin-id.")]
    MissingPluginId,

    #[error("Failed to resolve path {path}: {source}")]
    InvalidPath {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Output format preference stored in the settings file
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FormatPreference {
    #[default]
    Text,
    Json,
}

/// Build step settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Shell command run in the source directory
    pub command: String,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            command: DEFAULT_BUILD_COMMAND.to_string(),
        }
    }
}

/// Watch mode settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchSettings {
    /// Allow `--watch` at all
    pub enabled: bool,

    /// Debounce delay in milliseconds
    pub debounce_ms: u64,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

/// User settings, all optional
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Output format used when `--format` is not given
    pub default_format: FormatPreference,

    pub build: BuildSettings,

    pub watch: WatchSettings,
}

impl Settings {
    /// Returns the default settings file location
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("md", "obsidian", "obsidian-plugin-sync")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads settings from an explicit path, or from the default location.
    ///
    /// An explicit path must exist. A missing default file yields defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Loads settings from a specific file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content).map_err(|message| SettingsError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}

/// Options for a single run, after validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Absolute path of the plugin development directory
    pub source: PathBuf,

    /// Absolute path of the vault root
    pub vault: PathBuf,

    /// Plugin ID given on the command line
    pub plugin_id: Option<String>,

    /// Run the build before syncing
    pub build: bool,

    /// Keep watching after startup
    pub watch: bool,
}

impl SyncOptions {
    /// Makes both paths absolute and checks that they are existing directories.
    ///
    /// Nothing beyond the two `is_dir` probes touches the filesystem here.
    pub fn validate(
        source: &Path,
        vault: &Path,
        plugin_id: Option<String>,
        build: bool,
        watch: bool,
    ) -> Result<Self, ConfigError> {
        let source = absolute(source)?;
        if !source.is_dir() {
            return Err(ConfigError::SourceNotFound(source));
        }

        let vault = absolute(vault)?;
        if !vault.is_dir() {
            return Err(ConfigError::VaultNotFound(vault));
        }

        Ok(Self {
            source,
            vault,
            plugin_id: plugin_id.filter(|id| !id.is_empty()),
            build,
            watch,
        })
    }
}

fn absolute(path: &Path) -> Result<PathBuf, ConfigError> {
    std::path::absolute(path).map_err(|source| ConfigError::InvalidPath {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_settings() {
        let settings = Settings::default();

        assert_eq!(settings.default_format, FormatPreference::Text);
        assert_eq!(settings.build.command, "npm run build");
        assert!(settings.watch.enabled);
        assert_eq!(settings.watch.debounce_ms, 500);
    }

    #[test]
    fn parse_partial_settings() {
        let toml = r#"
default_format = "json"

[build]
command = "pnpm build"
"#;

        let settings = Settings::parse(toml).unwrap();
        assert_eq!(settings.default_format, FormatPreference::Json);
        assert_eq!(settings.build.command, "pnpm build");
        // Untouched sections keep their defaults
        assert!(settings.watch.enabled);
        assert_eq!(settings.watch.debounce_ms, 500);
    }

    #[test]
    fn parse_watch_settings() {
        let toml = r#"
[watch]
enabled = false
debounce_ms = 50
"#;

        let settings = Settings::parse(toml).unwrap();
        assert!(!settings.watch.enabled);
        assert_eq!(settings.watch.debounce_ms, 50);
    }

    #[test]
    fn load_explicit_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let result = Settings::load(Some(&dir.path().join("nope.toml")));

        assert!(matches!(result, Err(SettingsError::Read { .. })));
    }

    #[test]
    fn load_invalid_toml_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_format = [").unwrap();

        let result = Settings::load_from(&path);
        assert!(matches!(result, Err(SettingsError::Parse { .. })));
    }

    #[test]
    fn validate_accepts_existing_dirs() {
        let source = TempDir::new().unwrap();
        let vault = TempDir::new().unwrap();

        let options =
            SyncOptions::validate(source.path(), vault.path(), None, true, false).unwrap();

        assert!(options.source.is_absolute());
        assert!(options.vault.is_absolute());
        assert!(options.build);
        assert!(!options.watch);
        assert_eq!(options.plugin_id, None);
    }

    #[test]
    fn validate_rejects_missing_source() {
        let vault = TempDir::new().unwrap();
        let missing = vault.path().join("missing");

        let result = SyncOptions::validate(&missing, vault.path(), None, false, false);
        assert!(matches!(result, Err(ConfigError::SourceNotFound(_))));
    }

    #[test]
    fn validate_rejects_missing_vault() {
        let source = TempDir::new().unwrap();
        let missing = source.path().join("missing");

        let result = SyncOptions::validate(source.path(), &missing, None, false, false);
        assert!(matches!(result, Err(ConfigError::VaultNotFound(_))));
    }

    #[test]
    fn validate_rejects_file_as_vault() {
        let source = TempDir::new().unwrap();
        let file = source.path().join("vault.txt");
        fs::write(&file, "").unwrap();

        let result = SyncOptions::validate(source.path(), &file, None, false, false);
        assert!(matches!(result, Err(ConfigError::VaultNotFound(_))));
    }

    #[test]
    fn validate_drops_empty_plugin_id() {
        let source = TempDir::new().unwrap();
        let vault = TempDir::new().unwrap();

        let options = SyncOptions::validate(
            source.path(),
            vault.path(),
            Some(String::new()),
            false,
            false,
        )
        .unwrap();
        assert_eq!(options.plugin_id, None);
    }
}
