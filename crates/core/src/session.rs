//! TTL-bounded session store for conversational intake state.
//!
//! Sessions are keyed by an opaque id and handed to callers as an injected
//! dependency; there is no module-level shared state. Expired entries are
//! evicted lazily on access and in bulk via [`SessionStore::purge_expired`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

struct SessionEntry<T> {
    value: T,
    expires_at: DateTime<Utc>,
}

pub struct SessionStore<T> {
    ttl: Duration,
    entries: RwLock<HashMap<String, SessionEntry<T>>>,
    counter: AtomicU64,
}

impl<T: Clone + Send + Sync> SessionStore<T> {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
            counter: AtomicU64::new(0),
        }
    }

    /// Stores a new session and returns its opaque id.
    pub async fn create(&self, value: T) -> String {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        let id = format!("{:x}-{seq:x}", Utc::now().timestamp_micros());

        self.entries.write().await.insert(
            id.clone(),
            SessionEntry {
                value,
                expires_at: Utc::now() + self.ttl,
            },
        );
        id
    }

    /// Fetches a live session, extending its TTL. Expired sessions are
    /// evicted and reported as absent.
    pub async fn get(&self, id: &str) -> Option<T> {
        let mut entries = self.entries.write().await;
        let now = Utc::now();

        match entries.get_mut(id) {
            Some(entry) if entry.expires_at > now => {
                entry.expires_at = now + self.ttl;
                Some(entry.value.clone())
            }
            Some(_) => {
                entries.remove(id);
                None
            }
            None => None,
        }
    }

    /// Replaces the value of an existing live session. Returns false if the
    /// session is absent or expired.
    pub async fn update(&self, id: &str, value: T) -> bool {
        let mut entries = self.entries.write().await;
        let now = Utc::now();

        match entries.get_mut(id) {
            Some(entry) if entry.expires_at > now => {
                entry.value = value;
                entry.expires_at = now + self.ttl;
                true
            }
            Some(_) => {
                entries.remove(id);
                false
            }
            None => false,
        }
    }

    pub async fn remove(&self, id: &str) -> Option<T> {
        self.entries.write().await.remove(id).map(|e| e.value)
    }

    /// Drops all expired sessions, returning how many were evicted.
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let now = Utc::now();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
