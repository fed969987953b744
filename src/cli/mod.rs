//! # Command-Line Interface
//!
//! Flag parsing, orchestration and output formatting.
//!
//! ## Flags
//!
//! | Flag | Purpose |
//! |------|---------|
//! | `--source <path>` | Plugin development directory (required) |
//! | `--vault <path>` | Vault root, or `$OBSIDIAN_VAULT` (required) |
//! | `--plugin-id <id>` | Skip reading `manifest.json` |
//! | `--build` | Run the build command first |
//! | `--watch` | Keep syncing on changes until Ctrl+C |
//!
//! ## Output Formats
//!
//! `--format`:
//! - `text` (default) - Human-readable output
//! - `json` - One JSON object per line
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output on stderr:
//! ```bash
//! obsidian-plugin-sync --verbose --source . --vault ~/Notes
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute.

mod app;
mod output;
mod sync_cmd;
mod watch_cmd;

pub use app::{run, Cli};
pub use output::{Output, OutputFormat};
