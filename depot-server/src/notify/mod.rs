//! Outbound notifications
//!
//! ```text
//! payments::confirm → NotificationQueue::submit → mpsc → NotificationWorker → NotificationSink
//! ```
//!
//! Submission never blocks and never fails the caller: a full or closed
//! queue is logged and the message dropped. Delivery failures are logged by
//! the worker and not retried.

pub mod receipt;
pub mod ses;
pub mod worker;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::config::{Config, NotifyBackend};

pub use ses::SesSink;
pub use worker::NotificationWorker;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A rendered message ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Delivery channel (SES, log, ...)
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), BoxError>;
}

/// Writes messages to the log instead of delivering them
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), BoxError> {
        tracing::info!(to = to, subject = subject, "Notification (log sink)\n{body}");
        Ok(())
    }
}

/// Sender half of the bounded notification queue
#[derive(Clone)]
pub struct NotificationQueue {
    tx: mpsc::Sender<Notification>,
}

impl NotificationQueue {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Fire-and-forget enqueue
    pub fn submit(&self, notification: Notification) {
        match self.tx.try_send(notification) {
            Ok(()) => {}
            Err(TrySendError::Full(n)) => {
                tracing::warn!(to = %n.to, subject = %n.subject, "Notification queue full, message dropped");
            }
            Err(TrySendError::Closed(n)) => {
                tracing::warn!(to = %n.to, subject = %n.subject, "Notification worker gone, message dropped");
            }
        }
    }
}

/// Build the sink selected by `NOTIFY_BACKEND`
pub async fn sink_from_config(config: &Config) -> Arc<dyn NotificationSink> {
    match config.notify_backend {
        NotifyBackend::Ses => Arc::new(SesSink::from_env(config.ses_from_email.clone()).await),
        NotifyBackend::Log => Arc::new(LogSink),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(n: usize) -> Notification {
        Notification {
            to: "orders@depot.test".into(),
            subject: format!("m{n}"),
            body: String::new(),
        }
    }

    #[tokio::test]
    async fn test_submit_drops_when_full() {
        let (queue, mut rx) = NotificationQueue::new(1);
        queue.submit(message(1));
        queue.submit(message(2));

        assert_eq!(rx.recv().await.unwrap().subject, "m1");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_submit_after_worker_gone_does_not_panic() {
        let (queue, rx) = NotificationQueue::new(4);
        drop(rx);
        queue.submit(message(1));
    }
}
