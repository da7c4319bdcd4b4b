//! User-facing notifications
//!
//! Integrations report problems the user has to act on (missing
//! configuration, unreachable servers, rejected credentials) through a
//! [`Notifier`]. Notifying is fire-and-forget: it never fails and never
//! blocks the caller.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use tracing::{error, info, warn};

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// A message for the user, optionally parameterized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    /// Stable message text; parameters are kept separate so presenters can
    /// format or translate them
    pub message: String,
    pub params: BTreeMap<String, String>,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Attach a named parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if !self.params.is_empty() {
            let params: Vec<String> = self
                .params
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            write!(f, " ({})", params.join(", "))?;
        }
        Ok(())
    }
}

/// Capability to show a notification to the user
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Notifier that forwards everything to the tracing subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Error => error!(params = ?notification.params, "{}", notification.message),
            Severity::Warning => warn!(params = ?notification.params, "{}", notification.message),
            Severity::Info | Severity::Success => {
                info!(params = ?notification.params, "{}", notification.message)
            }
        }
    }
}

/// Notifier that keeps every notification in memory
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything received so far
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return everything received so far
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(
            &mut *self
                .notifications
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }

    pub fn len(&self) -> usize {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_display() {
        let n = Notification::error("Request failed")
            .with_param("statusCode", 401)
            .with_param("errorMsg", "401 Unauthorized");
        assert_eq!(
            n.to_string(),
            "Request failed (errorMsg=401 Unauthorized, statusCode=401)"
        );
        assert_eq!(n.param("statusCode"), Some("401"));
        assert_eq!(n.param("missing"), None);
    }

    #[test]
    fn test_memory_notifier_collects_and_drains() {
        let notifier = MemoryNotifier::new();
        assert!(notifier.is_empty());

        notifier.notify(Notification::error("one"));
        notifier.notify(Notification::new(Severity::Warning, "two"));
        assert_eq!(notifier.len(), 2);
        assert_eq!(notifier.notifications()[1].severity, Severity::Warning);

        let drained = notifier.take();
        assert_eq!(drained.len(), 2);
        assert!(notifier.is_empty());
    }

    #[derive(Clone, Default)]
    struct LogBuffer(std::sync::Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_log_notifier_writes_to_tracing() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            LogNotifier.notify(Notification::error("Request failed").with_param("statusCode", 401));
            LogNotifier.notify(Notification::new(Severity::Warning, "Slow server"));
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("ERROR"));
        assert!(lines[0].contains("Request failed"));
        assert!(lines[0].contains("statusCode"));
        assert!(lines[1].contains("WARN"));
        assert!(lines[1].contains("Slow server"));
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Error.to_string(), "error");
        assert_eq!(Severity::Success.to_string(), "success");
    }
}
