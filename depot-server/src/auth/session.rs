//! Session store
//!
//! Opaque tokens (UUID v4) map to `{user_id, role}` until their TTL runs out.
//! Expired entries are removed lazily on lookup and by `purge_expired`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use shared::models::Role;
use uuid::Uuid;

use crate::utils::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub role: Role,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn put(&self, token: &str, session: Session, ttl: Duration);
    /// `None` for unknown and expired tokens alike
    async fn get(&self, token: &str) -> Option<Session>;
    async fn delete(&self, token: &str) -> bool;
}

/// In-process session store
pub struct MemorySessionStore {
    entries: DashMap<String, (Session, DateTime<Utc>)>,
    clock: Arc<dyn Clock>,
}

impl MemorySessionStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, (_, expires_at)| *expires_at > now);
        before - self.entries.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn put(&self, token: &str, session: Session, ttl: Duration) {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::days(1));
        let expires_at = self.clock.now() + ttl;
        self.entries.insert(token.to_string(), (session, expires_at));
    }

    async fn get(&self, token: &str) -> Option<Session> {
        let now = self.clock.now();
        let (session, expires_at) = *self.entries.get(token)?;
        if expires_at <= now {
            self.entries.remove(token);
            return None;
        }
        Some(session)
    }

    async fn delete(&self, token: &str) -> bool {
        self.entries.remove(token).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::FixedClock;

    fn customer() -> Session {
        Session {
            user_id: Uuid::new_v4(),
            role: Role::Customer,
        }
    }

    #[tokio::test]
    async fn test_session_expires_after_ttl() {
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let store = MemorySessionStore::new(clock.clone());
        let session = customer();

        store.put("t1", session, Duration::from_secs(60)).await;
        assert_eq!(store.get("t1").await, Some(session));

        clock.advance(chrono::Duration::seconds(61));
        assert_eq!(store.get("t1").await, None);
        assert!(!store.delete("t1").await);
    }

    #[tokio::test]
    async fn test_purge_removes_only_expired() {
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let store = MemorySessionStore::new(clock.clone());
        store.put("short", customer(), Duration::from_secs(10)).await;
        store.put("long", customer(), Duration::from_secs(600)).await;

        clock.advance(chrono::Duration::seconds(30));
        assert_eq!(store.purge_expired(), 1);
        assert!(store.get("long").await.is_some());
    }
}
