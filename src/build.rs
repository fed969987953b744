//! Running the plugin's build command
//!
//! The command is a shell string (default `npm run build`) run through the
//! platform shell in the source directory. There is no timeout.

use std::path::Path;
use std::process::{Command, Output};

use thiserror::Error;

use crate::config::DEFAULT_BUILD_COMMAND;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Failed to run build command '{command}': {source}")]
    Launch {
        command: String,
        source: std::io::Error,
    },

    #[error("Build failed with error: {message}")]
    Failed { message: String },
}

/// Captured output of a successful build
#[derive(Debug, Clone, Default)]
pub struct BuildOutput {
    pub stdout: String,
    pub stderr: String,
}

/// A build command bound to a shell string
#[derive(Debug, Clone)]
pub struct BuildCommand {
    command: String,
}

impl Default for BuildCommand {
    fn default() -> Self {
        Self::new(DEFAULT_BUILD_COMMAND)
    }
}

impl BuildCommand {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Returns the shell command string
    pub fn as_str(&self) -> &str {
        &self.command
    }

    /// Runs the build in `source_dir`, blocking until it exits
    pub fn run(&self, source_dir: &Path) -> Result<BuildOutput, BuildError> {
        let output = self
            .shell()
            .current_dir(source_dir)
            .output()
            .map_err(|source| BuildError::Launch {
                command: self.command.clone(),
                source,
            })?;

        Self::interpret(output)
    }

    #[cfg(unix)]
    fn shell(&self) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(&self.command);
        cmd
    }

    #[cfg(windows)]
    fn shell(&self) -> Command {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(&self.command);
        cmd
    }

    fn interpret(output: Output) -> Result<BuildOutput, BuildError> {
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            return Ok(BuildOutput { stdout, stderr });
        }

        // Some toolchains report errors on stdout only
        let message = if !stderr.trim().is_empty() {
            stderr.trim().to_string()
        } else if !stdout.trim().is_empty() {
            stdout.trim().to_string()
        } else {
            match output.status.code() {
                Some(code) => format!("exited with status {} and no output", code),
                None => "terminated by a signal".to_string(),
            }
        };

        Err(BuildError::Failed { message })
    }
}
