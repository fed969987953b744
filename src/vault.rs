//! Vault layout
//!
//! Obsidian keeps community plugins under `<vault>/.obsidian/plugins/<id>/`.

use std::path::PathBuf;

/// Vault configuration directory name
pub const CONFIG_DIR: &str = ".obsidian";

/// Plugins directory inside the configuration directory
pub const PLUGINS_DIR: &str = "plugins";

/// An Obsidian vault on disk
#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
}

impl Vault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the `.obsidian/plugins` directory
    pub fn plugins_dir(&self) -> PathBuf {
        self.root.join(CONFIG_DIR).join(PLUGINS_DIR)
    }

    /// Returns the install directory for a plugin
    pub fn plugin_dir(&self, plugin_id: &str) -> PathBuf {
        self.plugins_dir().join(plugin_id)
    }
}
