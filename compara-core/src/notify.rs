//! User-facing notification surface.
//!
//! Save outcomes and validation failures are reported as transient messages;
//! nothing is returned to the caller.

use crate::types::NotificationKind;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// A single transient message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub kind: NotificationKind,
}

/// Trait for notification sinks.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, description: &str, kind: NotificationKind);
}

/// Emits notifications as tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, title: &str, description: &str, kind: NotificationKind) {
        match kind {
            NotificationKind::Error => tracing::error!(%title, %description, "notification"),
            NotificationKind::Success | NotificationKind::Info => {
                tracing::info!(%title, %description, %kind, "notification")
            }
        }
    }
}

/// Captures notifications in memory, for tests and for callers that render
/// them later.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Remove and return everything received so far.
    pub fn drain(&self) -> Vec<Notification> {
        self.received
            .lock()
            .map(|mut r| std::mem::take(&mut *r))
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, description: &str, kind: NotificationKind) {
        if let Ok(mut received) = self.received.lock() {
            received.push(Notification {
                title: title.to_string(),
                description: description.to_string(),
                kind,
            });
        }
    }
}
