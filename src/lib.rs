//! Obsidian Plugin Sync - copy plugin builds into a vault
//!
//! Copies `main.js`, `manifest.json` and `styles.css` from a plugin
//! development directory into `<vault>/.obsidian/plugins/<id>/`, optionally
//! building first and optionally re-syncing whenever the sources change.

pub mod build;
pub mod cli;
pub mod config;
pub mod plugin;
pub mod vault;
pub mod watch;

pub use build::{BuildCommand, BuildError};
pub use config::{ConfigError, Settings, SyncOptions};
pub use plugin::{sync_artifacts, Manifest, SyncReport, TRACKED_ARTIFACTS};
pub use vault::Vault;
