//! Obsidian Plugin Sync - sync plugin development files into a vault

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = obsidian_plugin_sync::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
