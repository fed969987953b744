//! Watch loop: rebuild and re-sync on source changes
//!
//! The loop reacts to one debounced batch at a time. A failed build skips the
//! sync that would follow it, same as the up-front build does.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;

use super::output::Output;
use super::sync_cmd::report_copy_failures;
use crate::build::BuildCommand;
use crate::plugin::sync_artifacts;
use crate::watch::{CancelToken, ChangeBatch, ChangeFilter, ChangeSource, WatchEvent};

/// How long to block on the watcher before checking for cancellation
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// What the loop works on
pub struct WatchSession<'a> {
    pub source_dir: &'a Path,
    pub target_dir: &'a Path,
    /// Set when `--build` was given
    pub build: Option<&'a BuildCommand>,
}

/// Counters reported when the loop stops
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WatchStats {
    pub reactions: usize,
    pub syncs: usize,
    pub build_failures: usize,
}

/// Runs until `cancel` is set or the watcher goes away
pub fn run(
    session: &WatchSession<'_>,
    changes: &mut dyn ChangeSource,
    cancel: &CancelToken,
    output: &Output,
) -> Result<WatchStats> {
    let filter = ChangeFilter::new(session.source_dir, session.target_dir);
    let mut stats = WatchStats::default();

    if output.is_json() {
        output.data(&serde_json::json!({
            "status": "watching",
            "source": session.source_dir.display().to_string(),
            "target": session.target_dir.display().to_string(),
        }));
    } else {
        println!("Watching for changes in {}", session.source_dir.display());
        println!("Press Ctrl+C to stop");
        println!("---");
    }

    while !cancel.is_cancelled() {
        match changes.next_event(POLL_INTERVAL)? {
            WatchEvent::Idle => {}
            WatchEvent::Error(error) => {
                output.error(&format!("Watch error: {}", error));
            }
            WatchEvent::Changed(paths) => {
                let batch = ChangeBatch::collect(&paths, &filter);
                if batch.is_empty() {
                    output.verbose_ctx("watch", &format!("Ignored {} change(s)", paths.len()));
                    continue;
                }

                react(session, &batch, output, &mut stats);
            }
        }
    }

    output.verbose_ctx("watch", "Cancellation requested, stopping");
    Ok(stats)
}

fn react(session: &WatchSession<'_>, batch: &ChangeBatch, output: &Output, stats: &mut WatchStats) {
    stats.reactions += 1;

    if output.is_json() {
        output.data(&serde_json::json!({
            "event": "change",
            "files": batch.files,
        }));
    } else {
        for file in &batch.files {
            println!("Change detected in {}", file);
        }
    }

    if let Some(build) = session.build.filter(|_| batch.needs_rebuild) {
        output.info("Building plugin...");
        match build.run(session.source_dir) {
            Ok(_) => output.info("Build successful!"),
            Err(e) => {
                stats.build_failures += 1;
                output.error(&e.to_string());
                output.info("Sync skipped until the build succeeds");
                output.info("---");
                return;
            }
        }
    }

    let report = match sync_artifacts(session.source_dir, session.target_dir) {
        Ok(report) => report,
        Err(e) => {
            output.error(&format!("{:#}", e));
            return;
        }
    };
    stats.syncs += 1;
    report_copy_failures(output, &report);

    if report.is_empty() {
        output.verbose_ctx("watch", "Nothing to copy");
        return;
    }

    let time = chrono::Local::now().format("%H:%M:%S").to_string();
    if output.is_json() {
        output.data(&serde_json::json!({
            "event": "synced",
            "time": time,
            "copied": report.copied,
            "failed": report.failed,
            "warnings": report.warnings,
        }));
    } else {
        println!("Synced files: {}", report.copied.join(", "));
        println!("Sync completed at {}", time);
        println!("---");
    }
}
