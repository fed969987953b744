//! # Plugin Artifacts
//!
//! What makes up a built Obsidian plugin and how it gets into a vault.
//!
//! ## Tracked Artifacts
//!
//! | File | Produced by | Purpose |
//! |------|-------------|---------|
//! | `main.js` | build | Compiled plugin script |
//! | `manifest.json` | author | Plugin id and metadata |
//! | `styles.css` | build or author | Optional stylesheet |
//!
//! The set is fixed. Nothing else in the source directory is ever copied.
//!
//! ## Key Types
//!
//! - [`Manifest`] - Parsed `manifest.json`, source of the plugin id
//! - [`SyncReport`] - Outcome of copying the artifacts into a vault

mod artifacts;
mod manifest;

pub use artifacts::{
    is_native_source, is_tracked, sync_artifacts, CopyFailure, SyncReport, MAIN_SCRIPT,
    MANIFEST_FILE, NATIVE_SOURCE_EXTENSION, STYLESHEET, TRACKED_ARTIFACTS,
};
pub use manifest::{Manifest, ManifestError};
