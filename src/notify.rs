//! Notification collaborator.
//!
//! Notifications are fire-and-forget: the ledgers hand them to a
//! [`Notifier`] through [`dispatch`], which logs delivery failures and
//! never retries or propagates them.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A leave request was approved.
    LeaveApproved,
    /// A leave request was rejected.
    LeaveRejected,
    /// A payroll record was paid.
    PayrollProcessed,
}

/// A message addressed to one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// The recipient.
    pub user_id: Uuid,
    /// What the notification is about.
    pub kind: NotificationKind,
    /// Short title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Relative link to the related record.
    pub link: String,
}

/// Delivery failure reported by a notifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    /// The notification could not be delivered.
    #[error("notification delivery failed: {message}")]
    Delivery {
        /// Reason reported by the transport.
        message: String,
    },
}

/// Delivers notifications.
pub trait Notifier: Send + Sync {
    /// Attempts delivery once.
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Hands `notification` to `notifier`, logging and discarding any failure.
pub fn dispatch(notifier: &dyn Notifier, notification: Notification) {
    if let Err(err) = notifier.notify(&notification) {
        warn!(
            user_id = %notification.user_id,
            kind = ?notification.kind,
            error = %err,
            "Notification dropped"
        );
    }
}

/// Writes notifications to the tracing log as JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let payload = serde_json::to_string(notification).map_err(|e| NotifyError::Delivery {
            message: e.to_string(),
        })?;
        info!(user_id = %notification.user_id, payload = %payload, "Notification");
        Ok(())
    }
}

/// Keeps delivered notifications in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    delivered: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Creates an empty notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of everything delivered so far.
    pub fn notifications(&self) -> Vec<Notification> {
        self.delivered.lock().clone()
    }

    /// Removes and returns everything delivered so far.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.delivered.lock())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.delivered.lock().push(notification.clone());
        Ok(())
    }
}
