//! Copying tracked artifacts from a source directory into a plugin directory

use std::fs::{self, File, FileTimes, Metadata};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

/// Compiled plugin script
pub const MAIN_SCRIPT: &str = "main.js";

/// Plugin manifest
pub const MANIFEST_FILE: &str = "manifest.json";

/// Optional stylesheet
pub const STYLESHEET: &str = "styles.css";

/// Files that make up an installed plugin, in copy order
pub const TRACKED_ARTIFACTS: [&str; 3] = [MAIN_SCRIPT, MANIFEST_FILE, STYLESHEET];

/// Extension of the plugin's TypeScript sources
pub const NATIVE_SOURCE_EXTENSION: &str = "ts";

/// Returns true if the file name is one of the tracked artifacts
pub fn is_tracked(file_name: &str) -> bool {
    TRACKED_ARTIFACTS.contains(&file_name)
}

/// Returns true for plugin source files (`*.ts`)
pub fn is_native_source(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == NATIVE_SOURCE_EXTENSION)
        .unwrap_or(false)
}

/// A tracked file paired with what went wrong while copying it
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CopyFailure {
    pub file: String,
    pub error: String,
}

/// Outcome of one sync
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Destination directory
    pub target: PathBuf,

    /// Files copied, in [`TRACKED_ARTIFACTS`] order
    pub copied: Vec<String>,

    /// Tracked files not present in the source
    pub missing: Vec<String>,

    /// Tracked files present in the source whose copy failed
    pub failed: Vec<CopyFailure>,

    /// Copied files whose access/modification times could not be carried over.
    /// Each one is also listed in `copied`.
    pub warnings: Vec<CopyFailure>,
}

impl SyncReport {
    /// Returns true if nothing was copied
    pub fn is_empty(&self) -> bool {
        self.copied.is_empty()
    }

    fn record(&mut self, file: &str, outcome: CopyOutcome) {
        match outcome {
            CopyOutcome::Copied => self.copied.push(file.to_string()),
            CopyOutcome::TimesNotPreserved(error) => {
                self.copied.push(file.to_string());
                self.warnings.push(CopyFailure {
                    file: file.to_string(),
                    error: error.to_string(),
                });
            }
            CopyOutcome::Failed(error) => self.failed.push(CopyFailure {
                file: file.to_string(),
                error: error.to_string(),
            }),
        }
    }
}

/// Result of copying a single artifact
#[derive(Debug)]
enum CopyOutcome {
    Copied,
    /// Contents are in place but the timestamps are the copy's own
    TimesNotPreserved(io::Error),
    Failed(io::Error),
}

/// Copies every tracked artifact present in `source_dir` into `target_dir`.
///
/// The target directory is created if needed; failing to create it is the
/// only error returned. Per-file failures land in [`SyncReport::failed`]
/// and never stop the remaining copies.
pub fn sync_artifacts(source_dir: &Path, target_dir: &Path) -> Result<SyncReport> {
    fs::create_dir_all(target_dir).with_context(|| {
        format!(
            "Failed to create plugin directory: {}",
            target_dir.display()
        )
    })?;

    let mut report = SyncReport {
        target: target_dir.to_path_buf(),
        ..Default::default()
    };

    for file in TRACKED_ARTIFACTS {
        let source_file = source_dir.join(file);
        if !source_file.exists() {
            report.missing.push(file.to_string());
            continue;
        }

        let outcome = copy_preserving(&source_file, &target_dir.join(file));
        report.record(file, outcome);
    }

    Ok(report)
}

/// Copies a file, keeping permissions and access/modification times
fn copy_preserving(from: &Path, to: &Path) -> CopyOutcome {
    // fs::copy carries permissions over
    if let Err(e) = fs::copy(from, to) {
        return CopyOutcome::Failed(e);
    }

    match fs::metadata(from).and_then(|metadata| preserve_times(&metadata, to)) {
        Ok(()) => CopyOutcome::Copied,
        Err(e) => CopyOutcome::TimesNotPreserved(e),
    }
}

fn preserve_times(metadata: &Metadata, path: &Path) -> io::Result<()> {
    let mut times = FileTimes::new().set_modified(metadata.modified()?);
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }

    // Windows needs write access for SetFileTime; unix only needs ownership,
    // which keeps read-only copies working
    let file = if cfg!(windows) {
        File::options().write(true).open(path)?
    } else {
        File::open(path)?
    };

    file.set_times(times)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn classifies_paths() {
        assert!(is_tracked("main.js"));
        assert!(is_tracked("manifest.json"));
        assert!(is_tracked("styles.css"));
        assert!(!is_tracked("main.ts"));
        assert!(!is_tracked("package.json"));

        assert!(is_native_source(Path::new("src/main.ts")));
        assert!(is_native_source(Path::new("settings.ts")));
        assert!(!is_native_source(Path::new("main.js")));
        assert!(!is_native_source(Path::new("ts")));
    }

    #[test]
    fn copies_only_present_files() {
        let source = TempDir::new().unwrap();
        let vault = TempDir::new().unwrap();
        let target = vault.path().join(".obsidian/plugins/demo-plugin");

        write(source.path(), "main.js", "console.log('hi');");
        write(source.path(), "manifest.json", r#"{"id": "demo-plugin"}"#);
        write(source.path(), "main.ts", "export {};");

        let report = sync_artifacts(source.path(), &target).unwrap();

        assert_eq!(report.copied, vec!["main.js", "manifest.json"]);
        assert_eq!(report.missing, vec!["styles.css"]);
        assert!(report.failed.is_empty());
        assert_eq!(report.target, target);

        assert!(target.join("main.js").is_file());
        assert!(target.join("manifest.json").is_file());
        assert!(!target.join("styles.css").exists());
        assert!(!target.join("main.ts").exists());
    }

    #[test]
    fn empty_source_creates_target_and_copies_nothing() {
        let source = TempDir::new().unwrap();
        let vault = TempDir::new().unwrap();
        let target = vault.path().join("a/b/c");

        let report = sync_artifacts(source.path(), &target).unwrap();

        assert!(report.is_empty());
        assert_eq!(report.missing.len(), 3);
        assert!(target.is_dir());
    }

    #[test]
    fn leaves_untracked_target_files_alone() {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();

        write(source.path(), "main.js", "new");
        write(target.path(), "main.js", "old");
        write(target.path(), "data.json", r#"{"setting": true}"#);

        sync_artifacts(source.path(), target.path()).unwrap();

        assert_eq!(fs::read_to_string(target.path().join("main.js")).unwrap(), "new");
        assert_eq!(
            fs::read_to_string(target.path().join("data.json")).unwrap(),
            r#"{"setting": true}"#
        );
    }

    #[test]
    fn second_sync_is_idempotent() {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();

        write(source.path(), "main.js", "console.log(1);");
        write(source.path(), "styles.css", ".x { color: red; }");

        let first = sync_artifacts(source.path(), target.path()).unwrap();
        let js_after_first = fs::read(target.path().join("main.js")).unwrap();

        let second = sync_artifacts(source.path(), target.path()).unwrap();
        let js_after_second = fs::read(target.path().join("main.js")).unwrap();

        assert_eq!(first, second);
        assert_eq!(js_after_first, js_after_second);
        assert_eq!(
            fs::read(target.path().join("styles.css")).unwrap(),
            fs::read(source.path().join("styles.css")).unwrap()
        );
    }

    #[test]
    fn preserves_modification_time() {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();

        write(source.path(), "main.js", "console.log(1);");
        let past = SystemTime::now() - Duration::from_secs(3600 * 24);
        File::options()
            .write(true)
            .open(source.path().join("main.js"))
            .unwrap()
            .set_modified(past)
            .unwrap();

        sync_artifacts(source.path(), target.path()).unwrap();

        let copied = fs::metadata(target.path().join("main.js"))
            .unwrap()
            .modified()
            .unwrap();
        let original = fs::metadata(source.path().join("main.js"))
            .unwrap()
            .modified()
            .unwrap();
        assert_eq!(copied, original);
    }

    #[test]
    fn copy_failure_does_not_stop_batch() {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();

        // A directory named like an artifact exists but cannot be copied
        fs::create_dir(source.path().join("main.js")).unwrap();
        write(source.path(), "manifest.json", r#"{"id": "x"}"#);
        write(source.path(), "styles.css", "");

        let report = sync_artifacts(source.path(), target.path()).unwrap();

        assert_eq!(report.copied, vec!["manifest.json", "styles.css"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].file, "main.js");
        assert!(report.missing.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn lost_timestamps_still_count_as_copied() {
        let mut report = SyncReport::default();

        report.record(MAIN_SCRIPT, CopyOutcome::Copied);
        report.record(
            MANIFEST_FILE,
            CopyOutcome::TimesNotPreserved(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "operation not permitted",
            )),
        );
        report.record(
            STYLESHEET,
            CopyOutcome::Failed(io::Error::new(io::ErrorKind::NotFound, "gone")),
        );

        assert_eq!(report.copied, vec!["main.js", "manifest.json"]);
        assert_eq!(
            report.warnings,
            vec![CopyFailure {
                file: "manifest.json".to_string(),
                error: "operation not permitted".to_string(),
            }]
        );
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].file, "styles.css");
    }

    #[test]
    fn copy_outcome_for_present_and_absent_files() {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        write(source.path(), "main.js", "console.log(1);");

        let outcome = copy_preserving(&source.path().join("main.js"), &target.path().join("main.js"));
        assert!(matches!(outcome, CopyOutcome::Copied), "{:?}", outcome);

        let missing_source = copy_preserving(
            &source.path().join("styles.css"),
            &target.path().join("styles.css"),
        );
        assert!(matches!(missing_source, CopyOutcome::Failed(_)));
        assert!(!target.path().join("styles.css").exists());
    }

    #[test]
    fn target_under_a_file_fails() {
        let source = TempDir::new().unwrap();
        let blocker = TempDir::new().unwrap();
        write(blocker.path(), "plugins", "not a directory");

        let result = sync_artifacts(source.path(), &blocker.path().join("plugins/demo"));
        assert!(result.is_err());
    }
}
