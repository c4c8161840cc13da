//! Transient user-facing notifications.

use std::sync::{Mutex, PoisonError};

use tracing::info;

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

/// One notification shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

/// Surface able to show toasts. Views only talk to this trait.
pub trait Toaster: Send + Sync {
    fn show(&self, toast: Toast);

    fn success(&self, message: &str) {
        self.show(Toast {
            level: ToastLevel::Success,
            message: message.to_string(),
        });
    }

    fn error(&self, message: &str) {
        self.show(Toast {
            level: ToastLevel::Error,
            message: message.to_string(),
        });
    }
}

/// Toaster that keeps every toast in memory, newest last.
#[derive(Debug, Default)]
pub struct ToastLog {
    toasts: Mutex<Vec<Toast>>,
}

impl ToastLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<Toast> {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Messages of the error toasts, oldest first.
    pub fn errors(&self) -> Vec<String> {
        self.toasts()
            .into_iter()
            .filter(|toast| toast.level == ToastLevel::Error)
            .map(|toast| toast.message)
            .collect()
    }
}

impl Toaster for ToastLog {
    fn show(&self, toast: Toast) {
        info!(level = ?toast.level, message = %toast.message, "toast");
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(toast);
    }
}
