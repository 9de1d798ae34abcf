//! Notification background worker
//!
//! Drains the notification queue and hands each message to the sink.
//! Exits when every queue sender has been dropped.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::{Notification, NotificationSink};

pub struct NotificationWorker {
    sink: Arc<dyn NotificationSink>,
}

impl NotificationWorker {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    /// Run the worker (returns once the channel closes)
    pub async fn run(self, mut rx: mpsc::Receiver<Notification>) {
        tracing::info!("Notification worker started");

        while let Some(n) = rx.recv().await {
            match self.sink.send(&n.to, &n.subject, &n.body).await {
                Ok(()) => {
                    tracing::debug!(to = %n.to, subject = %n.subject, "Notification delivered");
                }
                Err(e) => {
                    tracing::error!(to = %n.to, subject = %n.subject, "Failed to deliver notification: {e}");
                }
            }
        }

        tracing::info!("Notification channel closed, worker stopping");
    }
}
