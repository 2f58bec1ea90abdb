use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::WalletError;

/// How prominently the shell should render a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Normal,
    Destructive,
}

/// A user-visible notice. Every validation failure and every successful
/// completion produces exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Normal,
        }
    }

    pub fn failure(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }
}

impl From<&WalletError> for Notification {
    fn from(error: &WalletError) -> Self {
        let title = match error {
            WalletError::NetworkError(_)
            | WalletError::ConnectionTimeout
            | WalletError::ServiceRejected(_) => "Service unavailable",
            WalletError::PaymentWindowExpired => "Payment window expired",
            _ => "Error",
        };
        Notification::failure(title, error.to_string())
    }
}

/// Collects notifications for the shell to render and drain.
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    inner: Arc<Mutex<Vec<Notification>>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, notification: Notification) {
        self.inner.lock().push(notification);
    }

    pub fn report_error(&self, error: &WalletError) {
        log::debug!("User-facing error: {}", error);
        self.push(Notification::from(error));
    }

    /// Take all pending notifications, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.inner.lock())
    }

    pub fn pending(&self) -> usize {
        self.inner.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_destructive_notifications() {
        let notification = Notification::from(&WalletError::IncompletePin);
        assert_eq!(notification.severity, Severity::Destructive);
        assert_eq!(notification.title, "Error");

        let notification = Notification::from(&WalletError::ConnectionTimeout);
        assert_eq!(notification.title, "Service unavailable");
    }

    #[test]
    fn center_drains_in_order() {
        let center = NotificationCenter::new();
        center.push(Notification::success("First", "one"));
        center.report_error(&WalletError::PinMismatch);
        assert_eq!(center.pending(), 2);

        let drained = center.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].title, "First");
        assert_eq!(drained[1].severity, Severity::Destructive);
        assert_eq!(center.pending(), 0);
    }
}
