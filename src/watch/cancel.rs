//! Cancellation for the watch loop
//!
//! [`CancelToken`] wraps an `Arc<AtomicBool>`. The Ctrl+C handler sets it and
//! the watch loop checks it between waits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

/// A cheaply-clonable flag requesting the watch loop to stop
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a token that is set when the process receives Ctrl+C.
    ///
    /// Only one handler can be installed per process.
    pub fn on_interrupt() -> Result<Self> {
        let token = Self::new();
        let handler_token = token.clone();

        ctrlc::set_handler(move || handler_token.cancel())
            .context("Failed to install Ctrl+C handler")?;

        Ok(token)
    }

    /// Requests cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Returns true once [`Self::cancel`] has been called
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
