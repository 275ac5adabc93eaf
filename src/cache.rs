//! Generic TTL cache with background sweeping.
//!
//! Two instances back the resolver: one tuned for long-lived role
//! descriptors, one for short-lived assumed-role sessions. Every write may
//! override the instance default with a per-entry TTL, and lookups enforce
//! expiry on their own; the periodic sweep only reclaims memory.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::debug;

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// Key/value store with per-entry expiration.
///
/// Mutations serialize through an async `RwLock`; readers clone values out,
/// so a lookup never observes a partially written entry. An expired entry is
/// logically absent from the moment its deadline passes, whether or not the
/// sweep has physically removed it yet.
pub struct TtlCache<V> {
    entries: Arc<RwLock<HashMap<String, Entry<V>>>>,
    default_ttl: Duration,
}

impl<V: Clone + Send + Sync + 'static> TtlCache<V> {
    /// Creates a cache and spawns its background sweep task.
    ///
    /// The sweep wakes every `sweep_interval` and drops entries past their
    /// deadline. It holds only a weak handle to the storage, so dropping the
    /// cache lets the task wind down on its next tick.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(default_ttl: Duration, sweep_interval: Duration) -> Self {
        let entries: Arc<RwLock<HashMap<String, Entry<V>>>> =
            Arc::new(RwLock::new(HashMap::new()));

        tokio::spawn(Self::sweep_loop(Arc::downgrade(&entries), sweep_interval));

        Self {
            entries,
            default_ttl,
        }
    }

    /// Looks up a value by key.
    ///
    /// Returns `None` if the key was never set, has expired, or has been
    /// swept. A miss has no side effects.
    pub async fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone())
    }

    /// Stores a value under the cache's default TTL.
    pub async fn insert(&self, key: impl Into<String>, value: V) {
        self.insert_with_ttl(key, value, self.default_ttl).await;
    }

    /// Stores a value that becomes unreadable after `ttl`, regardless of the
    /// configured default.
    pub async fn insert_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().await.insert(key.into(), entry);
    }

    /// Physical entry count, including expired entries the sweep has not yet
    /// reclaimed.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds no entries, expired or otherwise.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn sweep_loop(
        entries: Weak<RwLock<HashMap<String, Entry<V>>>>,
        sweep_interval: Duration,
    ) {
        let mut ticker = interval(sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let Some(entries) = entries.upgrade() else {
                break;
            };

            let now = Instant::now();
            let mut map = entries.write().await;
            let before = map.len();
            map.retain(|_, entry| entry.expires_at > now);
            let swept = before - map.len();
            if swept > 0 {
                debug!(swept, remaining = map.len(), "swept expired cache entries");
            }
        }
    }
}
