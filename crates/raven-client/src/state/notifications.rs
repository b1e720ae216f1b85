//! Transient notifications shown on top of the UI

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// How long a notification stays visible
pub const NOTIFICATION_LIFETIME: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: Instant,
}

/// Shared sink written by background tasks and drained by the UI
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    inner: Arc<Mutex<Vec<Notification>>>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(&self, level: NotificationLevel, message: impl Into<String>) {
        self.lock().push(Notification {
            level,
            message: message.into(),
            created_at: Instant::now(),
        });
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(NotificationLevel::Info, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(NotificationLevel::Error, message);
    }

    /// Notifications still visible at `now`; expired ones are dropped
    pub fn active(&self, now: Instant) -> Vec<Notification> {
        let mut list = self.lock();
        list.retain(|n| now.duration_since(n.created_at) < NOTIFICATION_LIFETIME);
        list.clone()
    }

    pub fn dismiss(&self, index: usize) {
        let mut list = self.lock();
        if index < list.len() {
            list.remove(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifications_expire() {
        let notifications = Notifications::new();
        notifications.error("Could not save reaction");
        notifications.info("Message deleted");

        let now = Instant::now();
        let active = notifications.active(now);
        assert_eq!(active.len(), 2);
        assert_eq!(active[0].level, NotificationLevel::Error);

        let later = now + NOTIFICATION_LIFETIME + Duration::from_millis(1);
        assert!(notifications.active(later).is_empty());
    }

    #[test]
    fn test_dismiss_removes_single_entry() {
        let notifications = Notifications::new();
        notifications.info("one");
        notifications.info("two");
        notifications.dismiss(0);
        notifications.dismiss(5);

        let active = notifications.active(Instant::now());
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, "two");
    }
}
