//! Toast notifications.
//!
//! Toasts are broadcast on the event bus (the view shell renders them) and kept in a bounded
//! history ring for the current process.

use crate::domain::constants::NOTIFICATION_HISTORY;
use chrono::{DateTime, Utc};
use ctn_events::{EventBus, EventBusError};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: Option<String>,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            Some(title) => write!(f, "[{}] {title}: {}", self.kind, self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

/// Notification context shared by every slice.
#[derive(Debug, Clone)]
pub struct Notifier {
    bus: EventBus,
    history: Arc<Mutex<VecDeque<Toast>>>,
}

impl Notifier {
    #[must_use]
    pub fn new(bus: EventBus) -> Self {
        Self { bus, history: Arc::new(Mutex::new(VecDeque::with_capacity(NOTIFICATION_HISTORY))) }
    }

    /// Receiver for toasts published from now on.
    ///
    /// # Errors
    /// The bus already registered `Toast` as a watch channel.
    pub fn subscribe(&self) -> Result<broadcast::Receiver<Arc<Toast>>, EventBusError> {
        self.bus.subscribe::<Toast>()
    }

    pub fn notify(&self, kind: ToastKind, title: Option<&str>, message: impl Into<String>) -> Toast {
        let toast = Toast {
            kind,
            title: title.map(str::to_owned),
            message: message.into(),
            at: Utc::now(),
        };

        {
            let mut history = self.history.lock();
            if history.len() == NOTIFICATION_HISTORY {
                history.pop_front();
            }
            history.push_back(toast.clone());
        }

        if let Err(e) = self.bus.publish(toast.clone()) {
            warn!(error = %e, "Toast not published");
        }
        toast
    }

    pub fn success(&self, message: impl Into<String>) -> Toast {
        let toast = self.notify(ToastKind::Success, None, message);
        info!(message = %toast.message, "Success");
        toast
    }

    pub fn info(&self, message: impl Into<String>) -> Toast {
        self.notify(ToastKind::Info, None, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> Toast {
        self.notify(ToastKind::Warning, None, message)
    }

    pub fn error(&self, title: &str, message: impl Into<String>) -> Toast {
        let toast = self.notify(ToastKind::Error, Some(title), message);
        error!(title, message = %toast.message, "Error toast");
        toast
    }

    /// Reports a failure caught at a call site as an error toast.
    pub fn report(&self, title: &str, err: &impl fmt::Display) -> Toast {
        self.error(title, err.to_string())
    }

    /// Oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<Toast> {
        self.history.lock().iter().cloned().collect()
    }

    #[must_use]
    pub fn last(&self) -> Option<Toast> {
        self.history.lock().back().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctn_events::EventReceiverExt;

    #[test]
    fn history_is_bounded() {
        let notifier = Notifier::new(EventBus::new());
        for i in 0..(NOTIFICATION_HISTORY + 5) {
            notifier.info(format!("toast {i}"));
        }

        let history = notifier.history();
        assert_eq!(history.len(), NOTIFICATION_HISTORY);
        assert_eq!(history[0].message, "toast 5");
        assert_eq!(notifier.last().map(|t| t.message), Some(format!("toast {}", NOTIFICATION_HISTORY + 4)));
    }

    #[test]
    fn subscribers_receive_toasts() -> Result<(), EventBusError> {
        let notifier = Notifier::new(EventBus::new());
        let mut rx = notifier.subscribe()?;

        notifier.report("Save failed", &"Conflict: duplicate");
        let toasts = rx.drain_ready();

        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, ToastKind::Error);
        assert_eq!(toasts[0].to_string(), "[error] Save failed: Conflict: duplicate");
        Ok(())
    }
}
