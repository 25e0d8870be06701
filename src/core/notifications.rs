//! Outcome notifications raised by the store and services.

use std::{
    fmt,
    sync::{Mutex, MutexGuard},
    time::{Duration, Instant},
};

use uuid::Uuid;

const DEFAULT_DURATION_MS: u64 = 3000;
const ERROR_DURATION_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

impl Severity {
    pub fn default_duration(self) -> Duration {
        match self {
            Severity::Error => Duration::from_millis(ERROR_DURATION_MS),
            _ => Duration::from_millis(DEFAULT_DURATION_MS),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Info => "info",
            Severity::Warning => "warning",
        })
    }
}

/// Fire-and-forget sink for user-facing outcome messages.
pub trait Notifier: Send + Sync {
    /// A zero `auto_dismiss` keeps the message until it is dismissed explicitly.
    fn notify(&self, message: &str, severity: Severity, auto_dismiss: Duration);

    fn success(&self, message: &str) {
        self.notify(message, Severity::Success, Severity::Success.default_duration());
    }

    fn error(&self, message: &str) {
        self.notify(message, Severity::Error, Severity::Error.default_duration());
    }

    fn info(&self, message: &str) {
        self.notify(message, Severity::Info, Severity::Info.default_duration());
    }

    fn warning(&self, message: &str) {
        self.notify(message, Severity::Warning, Severity::Warning.default_duration());
    }
}

/// Notifier that only forwards messages to the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, severity: Severity, _auto_dismiss: Duration) {
        match severity {
            Severity::Error => tracing::error!(%message, "notification"),
            Severity::Warning => tracing::warn!(%message, "notification"),
            Severity::Success | Severity::Info => tracing::info!(%message, %severity, "notification"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
    pub severity: Severity,
    pub duration: Duration,
    pub created_at: Instant,
}

impl Toast {
    pub fn expires_at(&self) -> Option<Instant> {
        if self.duration.is_zero() {
            None
        } else {
            Some(self.created_at + self.duration)
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at().map_or(false, |deadline| now >= deadline)
    }
}

/// Queue of visible toasts. Auto-dismiss is an expiry deadline checked by
/// [`NotificationCenter::prune_expired`] rather than a timer.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    toasts: Mutex<Vec<Toast>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&self, message: &str, severity: Severity, duration: Duration) -> Uuid {
        let toast = Toast {
            id: Uuid::new_v4(),
            message: message.to_string(),
            severity,
            duration,
            created_at: Instant::now(),
        };
        let id = toast.id;
        self.lock().push(toast);
        id
    }

    pub fn dismiss(&self, id: Uuid) {
        self.lock().retain(|toast| toast.id != id);
    }

    /// Returns a snapshot of the queued toasts, oldest first.
    pub fn active(&self) -> Vec<Toast> {
        self.lock().clone()
    }

    /// Drops toasts whose deadline has passed and returns how many were removed.
    pub fn prune_expired(&self, now: Instant) -> usize {
        let mut toasts = self.lock();
        let before = toasts.len();
        toasts.retain(|toast| !toast.is_expired(now));
        before - toasts.len()
    }

    /// Removes and returns every queued toast.
    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Toast>> {
        self.toasts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, message: &str, severity: Severity, auto_dismiss: Duration) {
        LogNotifier.notify(message, severity, auto_dismiss);
        self.show(message, severity, auto_dismiss);
    }
}
