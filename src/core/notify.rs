use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::error::AppError;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Informational message
    Info,
    /// A failed action
    Error,
}

/// A message meant for the person using the front-end
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// Severity
    pub level: Level,
    /// Text shown to the user
    pub message: String,
    /// When the notification was raised
    pub at: DateTime<Utc>,
}

impl Notification {
    /// Failure alert: the error message prefixed with a cross mark
    pub fn failure(err: &AppError) -> Self {
        Self {
            level: Level::Error,
            message: format!("❌ {}", err),
            at: Utc::now(),
        }
    }

    /// Informational message
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
            at: Utc::now(),
        }
    }
}

/// Sink for user-visible notifications
pub trait Notifier {
    /// Deliver one notification
    fn notify(&mut self, notification: Notification);
}

/// Writes notifications to stderr, keeping stdout for command output
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, notification: Notification) {
        eprintln!("{}", notification.message);
    }
}

/// Keeps every notification in memory; clones share the same buffer
#[derive(Debug, Default, Clone)]
pub struct MemoryNotifier {
    inner: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotifier {
    /// Create an empty notifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything delivered so far
    pub fn notifications(&self) -> Vec<Notification> {
        match self.inner.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of notifications delivered so far
    pub fn len(&self) -> usize {
        self.notifications().len()
    }

    /// True when nothing has been delivered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&mut self, notification: Notification) {
        match self.inner.lock() {
            Ok(mut guard) => guard.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}
