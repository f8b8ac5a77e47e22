//! User-facing success and error notifications.
//!
//! Every remote action ends in at most one notification. The interaction
//! layer decides where notifications go: the console for the CLI, the log
//! when running unattended, or a recording sink in tests.

use std::io::{self, Write};

/// A transient message shown to the clerk after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The action succeeded; carries the server's message.
    Success(String),
    /// The action failed; carries the user-facing failure text.
    Error(String),
}

impl Notification {
    /// Returns the message text.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::Error(message) => message,
        }
    }

    /// Returns true for error notifications.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// A sink that surfaces notifications to the user.
pub trait Notifier: Send + Sync {
    /// Surfaces one notification.
    fn notify(&self, notification: Notification);

    /// Convenience wrapper for a success notification.
    fn success(&self, message: &str) {
        self.notify(Notification::Success(message.to_owned()));
    }

    /// Convenience wrapper for an error notification.
    fn error(&self, message: &str) {
        self.notify(Notification::Error(message.to_owned()));
    }
}

/// Routes notifications into the `tracing` log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Success(message) => tracing::info!(%message, "action succeeded"),
            Notification::Error(message) => tracing::warn!(%message, "action failed"),
        }
    }
}

/// Writes notifications to stderr, one line each.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        let line = match &notification {
            Notification::Success(message) => format!("ok: {message}"),
            Notification::Error(message) => format!("error: {message}"),
        };

        let _ignored = writeln!(io::stderr().lock(), "{line}");
    }
}

/// Test doubles for notification sinks.
#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use std::sync::Mutex;

    use super::{Notification, Notifier};

    /// Notifier that keeps every notification for later assertions.
    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        notifications: Mutex<Vec<Notification>>,
    }

    impl RecordingNotifier {
        /// Returns a copy of everything recorded so far.
        #[must_use]
        pub fn notifications(&self) -> Vec<Notification> {
            self.notifications
                .lock()
                .map(|guard| guard.clone())
                .unwrap_or_default()
        }

        /// Returns only the error notifications.
        #[must_use]
        pub fn errors(&self) -> Vec<Notification> {
            self.notifications()
                .into_iter()
                .filter(Notification::is_error)
                .collect()
        }

        /// Returns only the success notifications.
        #[must_use]
        pub fn successes(&self) -> Vec<Notification> {
            self.notifications()
                .into_iter()
                .filter(|notification| !notification.is_error())
                .collect()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notification: Notification) {
            if let Ok(mut guard) = self.notifications.lock() {
                guard.push(notification);
            }
        }
    }
}
