//! # Watch Mode
//!
//! Support for re-syncing when the plugin source changes.
//!
//! ## Pieces
//!
//! | Type | Role |
//! |------|------|
//! | [`ChangeSource`] | Blocking stream of changed paths (notify-backed) |
//! | [`Capability`] | Result of [`detect`]: a source, or why there is none |
//! | [`ChangeFilter`] | Decides which changed paths matter |
//! | [`ChangeBatch`] | Relevant files from one debounced batch |
//! | [`CancelToken`] | Set on Ctrl+C, checked by the loop |
//!
//! ## Relevance
//!
//! A changed path is relevant when its file name is a tracked artifact or
//! it is a `*.ts` source. Sources and `manifest.json` also ask for a rebuild.
//! Directories, the destination directory (when it lives inside the source
//! tree), `node_modules/` and `.git/` are ignored.
//!
//! Watchers may report paths through symlinks resolved (macOS reports
//! `/private/var/...` for a `/var/...` root), so both roots are matched in
//! the form they were given and in canonical form.

mod cancel;
mod source;

use std::fs;
use std::path::{Component, Path, PathBuf};

pub use cancel::CancelToken;
pub use source::{detect, Capability, ChangeSource, WatchError, WatchEvent};

use crate::plugin::{is_native_source, is_tracked, MANIFEST_FILE};

/// Directories under the source tree whose changes never matter
const IGNORED_DIRS: [&str; 2] = ["node_modules", ".git"];

/// How a single changed path should be treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relevance {
    /// Not something we sync or build from
    Ignored,
    /// A tracked artifact; sync only
    Artifact,
    /// A source file or the manifest; rebuild (if enabled) then sync
    Rebuild,
}

/// Classifies changed paths for one source/destination pair
#[derive(Debug, Clone)]
pub struct ChangeFilter {
    /// Source root as given, then canonical if that differs
    source_dirs: Vec<PathBuf>,
    /// Destination as given, then canonical if that differs
    target_dirs: Vec<PathBuf>,
}

impl ChangeFilter {
    pub fn new(source_dir: impl Into<PathBuf>, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dirs: spellings(source_dir.into()),
            target_dirs: spellings(target_dir.into()),
        }
    }

    /// Classifies one changed path
    pub fn relevance(&self, path: &Path) -> Relevance {
        if path.is_dir() || self.is_ignored_location(path) {
            return Relevance::Ignored;
        }

        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return Relevance::Ignored;
        };

        if file_name == MANIFEST_FILE || is_native_source(path) {
            Relevance::Rebuild
        } else if is_tracked(file_name) {
            Relevance::Artifact
        } else {
            Relevance::Ignored
        }
    }

    fn is_ignored_location(&self, path: &Path) -> bool {
        // Our own writes into a destination nested in the source tree
        if self.target_dirs.iter().any(|target| path.starts_with(target)) {
            return true;
        }

        let relative = self
            .source_dirs
            .iter()
            .find_map(|source| path.strip_prefix(source).ok())
            .unwrap_or(path);
        relative.components().any(|component| match component {
            Component::Normal(name) => IGNORED_DIRS.iter().any(|dir| name == *dir),
            _ => false,
        })
    }
}

/// Returns `path`, plus its canonical form when that is different.
///
/// The destination may not exist yet, so the deepest existing ancestor is
/// resolved and the rest re-joined.
fn spellings(path: PathBuf) -> Vec<PathBuf> {
    let canonical = path.ancestors().find_map(|ancestor| {
        let resolved = fs::canonicalize(ancestor).ok()?;
        let rest = path.strip_prefix(ancestor).ok()?;
        Some(if rest.as_os_str().is_empty() {
            resolved
        } else {
            resolved.join(rest)
        })
    });

    match canonical {
        Some(canonical) if canonical != path => vec![path, canonical],
        _ => vec![path],
    }
}

/// Relevant changes from one debounced batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeBatch {
    /// File names of relevant changes, first-seen order, no duplicates
    pub files: Vec<String>,

    /// True if any relevant change asks for a rebuild
    pub needs_rebuild: bool,
}

impl ChangeBatch {
    /// Filters a batch of changed paths
    pub fn collect<'a>(paths: impl IntoIterator<Item = &'a PathBuf>, filter: &ChangeFilter) -> Self {
        let mut batch = Self::default();

        for path in paths {
            let relevance = filter.relevance(path);
            if relevance == Relevance::Ignored {
                continue;
            }

            batch.needs_rebuild |= relevance == Relevance::Rebuild;

            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if !batch.files.contains(&name) {
                batch.files.push(name);
            }
        }

        batch
    }

    /// Returns true if nothing in the batch was relevant
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
