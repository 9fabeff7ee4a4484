//! Outbound notifications
//!
//! The engine never renders anything. It reports what happened to
//! registered [`NotificationSink`]s and the presentation layer decides how
//! to show it (toasts, status lines, change events).

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A submitted scope is not in the allow-list
    DisallowedScope,
    /// A blank submission was attempted
    MissingScope,
    /// The selected list changed; carries the new snapshot
    ValueChanged(Vec<String>),
    /// The validation verdict flipped; carries the new `invalid` value
    InvalidChanged(bool),
}

impl Notification {
    /// Event name used by the presentation layer
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::DisallowedScope => "disallowed-scope",
            Self::MissingScope => "missing-scope",
            Self::ValueChanged(_) => "value-changed",
            Self::InvalidChanged(_) => "invalid-changed",
        }
    }

    /// Check if this reports a rejected submission
    #[inline]
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::DisallowedScope | Self::MissingScope)
    }
}

/// Receiver of engine notifications
///
/// Delivery is fire-and-forget: sinks cannot fail the engine operation
/// that produced the notification.
pub trait NotificationSink: Send + Sync {
    /// Handle one notification
    fn notify(&self, notification: &Notification);
}

/// Sink that keeps every notification for later polling
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    inner: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingSink {
    /// Create an empty recorder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.inner.lock().clone()
    }

    /// Drain everything recorded so far
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.inner.lock())
    }

    /// Check if a notification was recorded
    #[must_use]
    pub fn contains(&self, notification: &Notification) -> bool {
        self.inner.lock().iter().any(|n| n == notification)
    }

    /// Number of recorded notifications with the given event name
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.inner.lock().iter().filter(|n| n.name() == name).count()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: &Notification) {
        self.inner.lock().push(notification.clone());
    }
}

/// Sink that forwards notifications over an unbounded tokio channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<Notification>,
}

impl ChannelSink {
    /// Create a sink and the receiver that observes it
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, notification: &Notification) {
        // A dropped receiver only means nobody is listening any more.
        if self.sender.send(notification.clone()).is_err() {
            tracing::trace!("notification receiver dropped: {}", notification.name());
        }
    }
}
