//! Host shell integration seams.
//!
//! The router and the notification channel live outside this crate; the core
//! reaches them through these two traits. `InMemoryNavigator` and
//! `LogNotifier` are the defaults for headless embedding and tests.

use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};

/// Navigation collaborator supplied by the host shell.
pub trait Navigator: Send + Sync {
    /// Path of the view the shell is currently showing.
    fn current_path(&self) -> String;

    /// Force the shell to show `path`.
    fn navigate(&self, path: &str);
}

/// User-facing notification channel.
pub trait Notifier: Send + Sync {
    fn show(&self, message: &str);
}

/// Navigator that only tracks the current path.
pub struct InMemoryNavigator {
    path: Mutex<String>,
}

impl InMemoryNavigator {
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            path: Mutex::new(initial_path.into()),
        }
    }
}

impl Navigator for InMemoryNavigator {
    fn current_path(&self) -> String {
        self.path.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn navigate(&self, path: &str) {
        debug!(path, "Navigating");
        *self.path.lock().unwrap_or_else(PoisonError::into_inner) = path.to_string();
    }
}

/// Notifier that routes messages to the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show(&self, message: &str) {
        warn!(message, "Notification");
    }
}
