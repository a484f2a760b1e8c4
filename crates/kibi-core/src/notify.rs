//! User-facing notification sink

use std::fmt;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
    Fatal,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NotificationLevel::Info => "info",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
            NotificationLevel::Fatal => "fatal",
        };
        f.write_str(label)
    }
}

/// Where the wizard sends messages meant for the user
///
/// Passed in explicitly so a session never reaches for a global.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NotificationLevel, message: &str);

    fn info(&self, message: &str) {
        self.notify(NotificationLevel::Info, message);
    }

    fn warning(&self, message: &str) {
        self.notify(NotificationLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.notify(NotificationLevel::Error, message);
    }

    /// Unexpected failures that abort the current operation
    fn fatal(&self, message: &str) {
        self.notify(NotificationLevel::Fatal, message);
    }
}

/// Notifier that forwards everything to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NotificationLevel, message: &str) {
        match level {
            NotificationLevel::Info => tracing::info!(target: "kibi::notify", "{}", message),
            NotificationLevel::Warning => tracing::warn!(target: "kibi::notify", "{}", message),
            NotificationLevel::Error | NotificationLevel::Fatal => {
                tracing::error!(target: "kibi::notify", level = %level, "{}", message)
            }
        }
    }
}
