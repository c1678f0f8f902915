//! Notification collaborator.
//!
//! Best-effort by contract: a failed notification is logged and dropped,
//! never allowed to roll back the transition that produced it.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// Order lifecycle events worth telling the parties about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderEvent {
    Placed,
    Accepted,
    Delivered,
    RevisionRequested,
    Completed,
    Cancelled,
}

impl OrderEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderEvent::Placed => "order_placed",
            OrderEvent::Accepted => "order_accepted",
            OrderEvent::Delivered => "order_delivered",
            OrderEvent::RevisionRequested => "order_revision_requested",
            OrderEvent::Completed => "order_completed",
            OrderEvent::Cancelled => "order_cancelled",
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Notify the given user about an order event
    async fn order_event(
        &self,
        recipient_id: i64,
        order_id: i64,
        event: OrderEvent,
    ) -> Result<(), NotifyError>;
}

/// Default notifier: structured log lines only. Stands in for the mail
/// sender in development and tests.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn order_event(
        &self,
        recipient_id: i64,
        order_id: i64,
        event: OrderEvent,
    ) -> Result<(), NotifyError> {
        tracing::info!(recipient_id, order_id, event = event.as_str(), "notification");
        Ok(())
    }
}

/// Fire-and-forget wrapper used by the lifecycle after commit.
pub async fn notify_best_effort(
    notifier: &dyn Notifier,
    recipient_id: i64,
    order_id: i64,
    event: OrderEvent,
) {
    if let Err(e) = notifier.order_event(recipient_id, order_id, event).await {
        tracing::warn!(
            recipient_id,
            order_id,
            event = event.as_str(),
            "notification failed (ignored): {}",
            e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingNotifier {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn order_event(
            &self,
            _recipient_id: i64,
            _order_id: i64,
            _event: OrderEvent,
        ) -> Result<(), NotifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(NotifyError::Delivery("smtp down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_best_effort_swallows_failures() {
        let notifier = FailingNotifier {
            calls: AtomicUsize::new(0),
        };
        // Must not panic or propagate
        notify_best_effort(&notifier, 1, 2, OrderEvent::Delivered).await;
        assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
    }
}
