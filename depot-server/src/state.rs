//! Application state

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::auth::{MemorySessionStore, SessionStore};
use crate::config::{Config, StoreBackend};
use crate::db::{MemoryStore, PgStore, Store};
use crate::notify::{Notification, NotificationQueue};
use crate::utils::{Clock, IdGenerator, RandomIds, SystemClock};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
///
/// Every collaborator is injected here; services take `&AppState` and never
/// reach for globals.
#[derive(Clone)]
pub struct AppState {
    /// Persistence (PostgreSQL or in-process)
    pub store: Arc<dyn Store>,
    /// Session tokens
    pub sessions: Arc<dyn SessionStore>,
    /// Concrete session store, kept for periodic purging
    pub memory_sessions: Arc<MemorySessionStore>,
    /// Receipt queue sender
    pub notifier: NotificationQueue,
    pub clock: Arc<dyn Clock>,
    pub ids: Arc<dyn IdGenerator>,
    pub session_ttl: Duration,
    /// Deadline for one service call's store work
    pub request_timeout: Duration,
    /// Operational mailbox that receives receipts
    pub receipt_mailbox: String,
}

impl AppState {
    /// Create a new AppState from configuration
    ///
    /// Returns the receiving half of the notification queue; the caller
    /// hands it to a `NotificationWorker`.
    pub async fn new(config: &Config) -> Result<(Self, mpsc::Receiver<Notification>), BoxError> {
        let store: Arc<dyn Store> = match config.store_backend {
            StoreBackend::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .ok_or("DATABASE_URL must be set for the postgres store backend")?;
                let pg = PgStore::connect(url).await?;
                tracing::info!("PostgreSQL store ready (migrations applied)");
                Arc::new(pg)
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store; data is lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::from_parts(
            config,
            store,
            Arc::new(SystemClock),
            Arc::new(RandomIds),
        ))
    }

    /// Assemble state from explicit collaborators
    pub fn from_parts(
        config: &Config,
        store: Arc<dyn Store>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> (Self, mpsc::Receiver<Notification>) {
        let (notifier, rx) = NotificationQueue::new(config.notify_queue_capacity);
        let memory_sessions = Arc::new(MemorySessionStore::new(clock.clone()));

        let state = Self {
            store,
            sessions: memory_sessions.clone(),
            memory_sessions,
            notifier,
            clock,
            ids,
            session_ttl: config.session_ttl,
            request_timeout: config.request_timeout,
            receipt_mailbox: config.receipt_mailbox.clone(),
        };
        (state, rx)
    }
}
