//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use super::output::{Output, OutputFormat};
use super::sync_cmd;
use crate::config::{Settings, SyncOptions};

#[derive(Parser)]
#[command(name = "obsidian-plugin-sync")]
#[command(author, version, about = "Sync Obsidian plugin development files to a vault")]
pub struct Cli {
    /// Source directory of the plugin development
    #[arg(long)]
    pub source: PathBuf,

    /// Target Obsidian vault directory
    #[arg(long, env = "OBSIDIAN_VAULT")]
    pub vault: PathBuf,

    /// Plugin ID (read from manifest.json if not provided)
    #[arg(long)]
    pub plugin_id: Option<String>,

    /// Run the build command before syncing
    #[arg(long)]
    pub build: bool,

    /// Watch for changes and sync automatically
    #[arg(long)]
    pub watch: bool,

    /// Output format (defaults to the settings file, then text)
    #[arg(long, short = 'f')]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Settings file
    #[arg(long, env = "OBSIDIAN_PLUGIN_SYNC_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref())?;
    let format = cli
        .format
        .unwrap_or_else(|| settings.default_format.into());
    let output = Output::new(format, cli.verbose);

    output.verbose("obsidian-plugin-sync starting");
    match &cli.config {
        Some(path) => output.verbose_ctx("config", &format!("Settings file: {}", path.display())),
        None => output.verbose_ctx(
            "config",
            &format!(
                "Settings file: {}",
                Settings::default_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(none)".to_string())
            ),
        ),
    }

    let options =
        SyncOptions::validate(&cli.source, &cli.vault, cli.plugin_id, cli.build, cli.watch)?;
    output.verbose_ctx(
        "config",
        &format!(
            "source={}, vault={}, build={}, watch={}",
            options.source.display(),
            options.vault.display(),
            options.build,
            options.watch
        ),
    );

    sync_cmd::run(&options, &settings, &output)?;

    output.verbose("Command completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_all_flags() {
        let cli = Cli::try_parse_from([
            "obsidian-plugin-sync",
            "--source",
            "dev",
            "--vault",
            "vault",
            "--plugin-id",
            "demo-plugin",
            "--build",
            "--watch",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.source, PathBuf::from("dev"));
        assert_eq!(cli.vault, PathBuf::from("vault"));
        assert_eq!(cli.plugin_id.as_deref(), Some("demo-plugin"));
        assert!(cli.build);
        assert!(cli.watch);
        assert_eq!(cli.format, Some(OutputFormat::Json));
    }

    #[test]
    fn source_is_required() {
        let result = Cli::try_parse_from(["obsidian-plugin-sync", "--vault", "vault"]);
        assert!(result.is_err());
    }
}
