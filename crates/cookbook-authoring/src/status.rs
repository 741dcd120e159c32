//! The single-slot publish status observable.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// Outcome message of the most recent publish attempt.
///
/// There is never more than one; each attempt or an explicit clear
/// overwrites it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PublishStatus {
    /// Nothing to report.
    #[default]
    Idle,
    /// The recipe was accepted by the repository.
    Succeeded(String),
    /// Validation or the repository rejected the recipe.
    Failed(String),
}

impl PublishStatus {
    /// The message to display, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            PublishStatus::Idle => None,
            PublishStatus::Succeeded(message) | PublishStatus::Failed(message) => Some(message),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, PublishStatus::Idle)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PublishStatus::Succeeded(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, PublishStatus::Failed(_))
    }
}

/// Shared handle to the status slot.
///
/// Cloned into publish tasks so they can resolve the status from whatever
/// task the repository completes on.
#[derive(Debug, Clone)]
pub struct StatusSlot {
    tx: Arc<watch::Sender<PublishStatus>>,
}

impl StatusSlot {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(PublishStatus::Idle);
        Self { tx: Arc::new(tx) }
    }

    /// Current status.
    pub fn get(&self) -> PublishStatus {
        self.tx.borrow().clone()
    }

    /// Overwrite the status and wake observers.
    pub fn set(&self, status: PublishStatus) {
        self.tx.send_replace(status);
    }

    pub fn clear(&self) {
        self.set(PublishStatus::Idle);
    }

    /// Receiver that observes every subsequent change.
    pub fn subscribe(&self) -> watch::Receiver<PublishStatus> {
        self.tx.subscribe()
    }

    /// The status as a stream, starting with the current value.
    pub fn stream(&self) -> WatchStream<PublishStatus> {
        WatchStream::new(self.subscribe())
    }
}

impl Default for StatusSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_stream::StreamExt;

    #[test]
    fn test_message() {
        assert_eq!(PublishStatus::Idle.message(), None);
        assert_eq!(PublishStatus::Succeeded("ok".into()).message(), Some("ok"));
        assert!(PublishStatus::Failed("no".into()).is_failure());
    }

    #[test]
    fn test_set_overwrites() {
        let slot = StatusSlot::new();
        slot.set(PublishStatus::Failed("first".into()));
        slot.set(PublishStatus::Succeeded("second".into()));
        assert_eq!(slot.get(), PublishStatus::Succeeded("second".into()));

        slot.clear();
        assert!(slot.get().is_idle());
    }

    #[tokio::test]
    async fn test_subscriber_sees_change() {
        let slot = StatusSlot::new();
        let mut rx = slot.subscribe();

        slot.set(PublishStatus::Failed("boom".into()));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().message(), Some("boom"));
    }

    #[tokio::test]
    async fn test_stream_starts_with_current() {
        let slot = StatusSlot::new();
        slot.set(PublishStatus::Succeeded("done".into()));

        let mut stream = slot.stream();
        let first = stream.next().await.unwrap();
        assert!(first.is_success());
    }
}
