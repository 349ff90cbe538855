use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

use super::{LoadOutcome, SheetRequest};

/// Source of the current time for TTL decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to. Millisecond resolution.
#[derive(Debug)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            millis: AtomicI64::new(start.timestamp_millis()),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.millis.store(now.timestamp_millis(), Ordering::SeqCst);
    }

    pub fn advance(&self, by: TimeDelta) {
        self.millis.fetch_add(by.num_milliseconds(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }
}

/// A stored load and the moment it was stored.
#[derive(Debug, Clone)]
pub struct CachedLoad {
    pub outcome: Arc<LoadOutcome>,
    pub stored_at: DateTime<Utc>,
}

/// Memoizes successful loads per [`SheetRequest`].
///
/// Entries expire by age only; reading an entry never extends its life.
/// With a zero TTL every lookup misses, but the last stored load is still
/// kept so callers can fall back to it when a reload fails.
pub struct LoadCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<SheetRequest, CachedLoad>>,
}

impl LoadCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Returns the entry for `key` if it is younger than the TTL.
    pub async fn get(&self, key: &SheetRequest) -> Option<CachedLoad> {
        if !self.is_enabled() {
            return None;
        }

        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        // A clock that moved backwards leaves the entry fresh.
        let fresh = (self.clock.now() - entry.stored_at)
            .to_std()
            .map_or(true, |age| age < self.ttl);

        if fresh {
            debug!(worksheet = %key.worksheet, "Load cache hit");
            Some(entry.clone())
        } else {
            debug!(worksheet = %key.worksheet, "Load cache entry expired");
            None
        }
    }

    /// Stores `outcome` for `key`, replacing any previous entry.
    pub async fn put(&self, key: SheetRequest, outcome: LoadOutcome) -> CachedLoad {
        let entry = CachedLoad {
            outcome: Arc::new(outcome),
            stored_at: self.clock.now(),
        };
        self.entries.write().await.insert(key, entry.clone());
        entry
    }

    /// The most recently stored load for `key`, regardless of age.
    pub async fn last_good(&self, key: &SheetRequest) -> Option<CachedLoad> {
        self.entries.read().await.get(key).cloned()
    }
}
