//! Single-slot, time-bounded memoization of a provider's full monitor list.

use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};
use tracing::trace;

/// How long a fetched monitor list stays valid.
pub const DEFAULT_LIST_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    expires_at: Instant,
}

impl<T> CacheEntry<T> {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Holds at most one snapshot. The snapshot is replaced or dropped as a whole,
/// so concurrent readers observe either the previous value or the new one.
#[derive(Debug)]
pub struct ListCache<T> {
    slot: RwLock<Option<CacheEntry<T>>>,
    ttl: Duration,
}

impl<T: Clone> Default for ListCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_LIST_CACHE_TTL)
    }
}

impl<T: Clone> ListCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: RwLock::new(None),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the stored snapshot unless it is missing or expired.
    pub fn get(&self) -> Option<T> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        match slot.as_ref() {
            Some(entry) if !entry.is_expired() => {
                trace!("List cache hit.");
                Some(entry.value.clone())
            }
            Some(_) => {
                trace!("List cache entry expired.");
                None
            }
            None => None,
        }
    }

    pub fn set(&self, value: T) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(entry);
    }

    pub fn invalidate(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
