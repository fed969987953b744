//! One-shot sync and startup orchestration

use anyhow::Result;

use super::output::Output;
use super::watch_cmd::{self, WatchSession};
use crate::build::BuildCommand;
use crate::config::{ConfigError, Settings, SyncOptions};
use crate::plugin::{sync_artifacts, Manifest, SyncReport};
use crate::vault::Vault;
use crate::watch::{self, CancelToken, Capability};

pub fn run(options: &SyncOptions, settings: &Settings, output: &Output) -> Result<()> {
    let plugin_id = resolve_plugin_id(options, output)?;
    let target_dir = Vault::new(&options.vault).plugin_dir(&plugin_id);
    output.verbose_ctx("sync", &format!("Target directory: {}", target_dir.display()));

    // Pick the watch backend before building so an unusable --watch does nothing
    let changes = if options.watch {
        match watch::detect(&options.source, &settings.watch) {
            Capability::Available(changes) => Some(changes),
            Capability::Unavailable(reason) => {
                report_watch_unavailable(output, &reason);
                return Ok(());
            }
        }
    } else {
        None
    };

    let build = options
        .build
        .then(|| BuildCommand::new(settings.build.command.as_str()));

    if let Some(build) = &build {
        run_build(build, options, output)?;
    }

    match changes {
        Some(mut changes) => {
            let cancel = CancelToken::on_interrupt()?;
            let session = WatchSession {
                source_dir: &options.source,
                target_dir: &target_dir,
                build: build.as_ref(),
            };

            let result = watch_cmd::run(&session, changes.as_mut(), &cancel, output);
            // Release the subscription before reporting
            drop(changes);
            let stats = result?;

            if output.is_json() {
                output.data(&serde_json::json!({
                    "status": "stopped",
                    "plugin_id": plugin_id,
                    "changes": stats.reactions,
                    "syncs": stats.syncs,
                    "build_failures": stats.build_failures,
                }));
            } else {
                output.verbose_ctx(
                    "watch",
                    &format!(
                        "Reacted to {} change batch(es), {} build failure(s)",
                        stats.reactions, stats.build_failures
                    ),
                );
                output.success(&format!(
                    "Stopped watching after {} sync(s)",
                    stats.syncs
                ));
            }
        }
        None => {
            let report = sync_artifacts(&options.source, &target_dir)?;
            print_summary(output, &plugin_id, &report);
        }
    }

    Ok(())
}

/// Returns the explicit id, or reads it from the manifest.
///
/// The manifest is not touched when an id was given.
fn resolve_plugin_id(options: &SyncOptions, output: &Output) -> Result<String> {
    if let Some(id) = &options.plugin_id {
        output.verbose_ctx("manifest", &format!("Using plugin ID from --plugin-id: {}", id));
        return Ok(id.clone());
    }

    let resolved = Manifest::load(&options.source).and_then(|manifest| {
        let id = manifest.require_id(&options.source)?.to_string();
        Ok((id, manifest))
    });

    match resolved {
        Ok((id, manifest)) => {
            if let Some(label) = manifest.label() {
                output.verbose_ctx("manifest", &format!("Plugin: {}", label));
            }
            output.verbose_ctx("manifest", &format!("Read plugin ID from manifest.json: {}", id));
            Ok(id)
        }
        Err(e) => {
            output.error(&format!("Could not read manifest.json: {}", e));
            Err(ConfigError::MissingPluginId.into())
        }
    }
}

/// Runs the up-front build; a failure ends the run before anything is copied
fn run_build(build: &BuildCommand, options: &SyncOptions, output: &Output) -> Result<()> {
    output.info("Building plugin...");
    output.verbose_ctx("build", &format!("Running '{}' in {}", build.as_str(), options.source.display()));

    let result = build.run(&options.source)?;
    output.verbose_ctx("build", result.stdout.trim_end());
    if !result.stderr.trim().is_empty() {
        // Bundlers print warnings on stderr even when the build succeeds
        output.verbose_ctx("build", result.stderr.trim_end());
    }
    output.info("Build successful!");

    Ok(())
}

fn report_watch_unavailable(output: &Output, reason: &str) {
    if output.is_json() {
        output.data(&serde_json::json!({
            "status": "watch_unavailable",
            "reason": reason,
        }));
    } else {
        println!("File watching is unavailable: {}", reason);
        println!("Nothing was synced. Run again without --watch for a one-time sync.");
    }
}

pub(super) fn report_copy_failures(output: &Output, report: &SyncReport) {
    for failure in &report.failed {
        output.error(&format!("Could not copy {}: {}", failure.file, failure.error));
    }
    for warning in &report.warnings {
        output.warning(&format!(
            "Copied {} but kept new timestamps: {}",
            warning.file, warning.error
        ));
    }
}

fn print_summary(output: &Output, plugin_id: &str, report: &SyncReport) {
    report_copy_failures(output, report);

    if output.is_json() {
        output.data(&serde_json::json!({
            "plugin_id": plugin_id,
            "target": report.target.display().to_string(),
            "copied": report.copied,
            "missing": report.missing,
            "failed": report.failed,
            "warnings": report.warnings,
        }));
        return;
    }

    if !report.missing.is_empty() {
        output.verbose_ctx("sync", &format!("Not present in source: {}", report.missing.join(", ")));
    }

    if report.is_empty() {
        println!("No files were copied. Please ensure the required files exist in the source directory.");
    } else {
        println!(
            "Successfully copied {} to {}",
            report.copied.join(", "),
            report.target.display()
        );
        println!("Plugin sync complete! Please reload or enable the plugin in Obsidian.");
    }
}
