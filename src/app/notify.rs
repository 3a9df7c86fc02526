// GroupScout - app/notify.rs
//
// User notifications. The controller is handed a `NotificationSink` instead
// of reaching for any process-wide dispatcher; the desktop front end uses the
// shared `NotificationCenter`, which keeps a bounded history for display.

use crate::core::model::{Notification, NotificationLevel};
use crate::util::constants::MAX_NOTIFICATIONS;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Receives user-facing notifications. Fire-and-forget.
pub trait NotificationSink {
    fn publish(&self, notification: Notification);
}

/// Bounded, shareable notification history.
///
/// Clones share the same history, so one clone can be injected into the
/// controller while another is rendered by the UI.
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    inner: Arc<Mutex<VecDeque<Notification>>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All retained notifications, oldest first.
    pub fn snapshot(&self) -> Vec<Notification> {
        match self.inner.lock() {
            Ok(queue) => queue.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self.inner.lock() {
            Ok(queue) => queue.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove the notification at `index` (as returned by `snapshot`).
    pub fn dismiss(&self, index: usize) {
        let mut queue = match self.inner.lock() {
            Ok(q) => q,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = queue.remove(index);
    }

    pub fn clear(&self) {
        let mut queue = match self.inner.lock() {
            Ok(q) => q,
            Err(poisoned) => poisoned.into_inner(),
        };
        queue.clear();
    }
}

impl NotificationSink for NotificationCenter {
    fn publish(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => {
                tracing::warn!(message = %notification.message, "Error notification raised")
            }
            NotificationLevel::Warning => {
                tracing::info!(message = %notification.message, "Warning notification raised")
            }
            NotificationLevel::Info => {
                tracing::debug!(message = %notification.message, "Info notification raised")
            }
        }

        let mut queue = match self.inner.lock() {
            Ok(q) => q,
            Err(poisoned) => poisoned.into_inner(),
        };
        queue.push_back(notification);
        while queue.len() > MAX_NOTIFICATIONS {
            queue.pop_front();
        }
    }
}
