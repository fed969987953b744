//! Filesystem change sources
//!
//! [`detect`] picks the backend once at startup. With the `watch` feature the
//! backend is notify's recommended watcher behind a mini debouncer.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::config::WatchSettings;

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Failed to start file watcher: {0}")]
    Start(String),

    #[error("File watcher stopped unexpectedly")]
    Disconnected,
}

/// Result of waiting on a [`ChangeSource`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A debounced batch of changed paths
    Changed(Vec<PathBuf>),

    /// The watcher reported an error; watching continues
    Error(String),

    /// Nothing happened before the timeout
    Idle,
}

/// Something that reports changed paths under a directory tree
pub trait ChangeSource {
    /// Blocks for at most `timeout` waiting for the next event
    fn next_event(&mut self, timeout: Duration) -> Result<WatchEvent, WatchError>;
}

/// Whether watching can be used in this environment
pub enum Capability {
    Available(Box<dyn ChangeSource>),
    Unavailable(String),
}

impl std::fmt::Debug for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::Available(_) => f.write_str("Available"),
            Capability::Unavailable(reason) => f.debug_tuple("Unavailable").field(reason).finish(),
        }
    }
}

/// Selects a change source for `root`
pub fn detect(root: &Path, settings: &WatchSettings) -> Capability {
    if !settings.enabled {
        return Capability::Unavailable(
            "File watching is disabled in settings ([watch] enabled = false).".to_string(),
        );
    }

    native_source(root, Duration::from_millis(settings.debounce_ms))
}

#[cfg(feature = "watch")]
fn native_source(root: &Path, debounce: Duration) -> Capability {
    match native::NotifySource::new(root, debounce) {
        Ok(source) => Capability::Available(Box::new(source)),
        Err(e) => Capability::Unavailable(e.to_string()),
    }
}

#[cfg(not(feature = "watch"))]
fn native_source(_root: &Path, _debounce: Duration) -> Capability {
    Capability::Unavailable(
        "File watching support is not included in this build. Rebuild with `--features watch`."
            .to_string(),
    )
}

#[cfg(feature = "watch")]
mod native {
    use std::path::{Path, PathBuf};
    use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
    use std::time::Duration;

    use notify::{RecommendedWatcher, RecursiveMode, Watcher};
    use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};

    use super::{ChangeSource, WatchError, WatchEvent};

    /// Recursive notify subscription, released on drop
    pub struct NotifySource {
        root: PathBuf,
        debouncer: Debouncer<RecommendedWatcher>,
        rx: Receiver<DebounceEventResult>,
    }

    impl NotifySource {
        pub fn new(root: &Path, debounce: Duration) -> Result<Self, WatchError> {
            let (tx, rx) = mpsc::channel();

            let mut debouncer =
                new_debouncer(debounce, tx).map_err(|e| WatchError::Start(e.to_string()))?;

            debouncer
                .watcher()
                .watch(root, RecursiveMode::Recursive)
                .map_err(|e| WatchError::Start(e.to_string()))?;

            Ok(Self {
                root: root.to_path_buf(),
                debouncer,
                rx,
            })
        }
    }

    impl ChangeSource for NotifySource {
        fn next_event(&mut self, timeout: Duration) -> Result<WatchEvent, WatchError> {
            match self.rx.recv_timeout(timeout) {
                Ok(Ok(events)) => Ok(WatchEvent::Changed(
                    events.into_iter().map(|event| event.path).collect(),
                )),
                Ok(Err(error)) => Ok(WatchEvent::Error(format!("{:?}", error))),
                Err(RecvTimeoutError::Timeout) => Ok(WatchEvent::Idle),
                Err(RecvTimeoutError::Disconnected) => Err(WatchError::Disconnected),
            }
        }
    }

    impl Drop for NotifySource {
        fn drop(&mut self) {
            // The root may already be gone; the debouncer thread stops either way
            let _ = self.debouncer.watcher().unwatch(&self.root);
        }
    }
}
