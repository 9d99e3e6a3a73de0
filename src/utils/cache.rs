//! In-Memory Snapshot Cache
//!
//! Thread-safe TTL cache for weather snapshots, keyed by coordinates.
//! A stale snapshot is an acceptable degraded answer when the provider is
//! down, so expired entries stay retrievable through `get_stale`.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::models::{Location, WeatherSnapshot};

/// Default TTL: 5 minutes
const DEFAULT_TTL_SECS: u64 = 300;

/// Cache entry with timestamp for TTL validation
#[derive(Clone, Debug)]
struct CacheEntry {
    snapshot: WeatherSnapshot,
    created_at: Instant,
    ttl_secs: u64,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.created_at.elapsed() > Duration::from_secs(self.ttl_secs)
    }

    fn remaining_ttl(&self) -> u64 {
        let elapsed = self.created_at.elapsed().as_secs();
        self.ttl_secs.saturating_sub(elapsed)
    }
}

/// TTL snapshot cache over DashMap, safe for concurrent assessments
#[derive(Clone)]
pub struct SnapshotCache {
    store: Arc<DashMap<String, CacheEntry>>,
    ttl_secs: u64,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL_SECS)
    }

    pub fn with_ttl(ttl_secs: u64) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            ttl_secs,
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Coordinates rounded to 3 decimals (~110 m) so that nearby queries
    /// share an entry
    #[inline]
    fn key(location: Location) -> String {
        format!("{:.3}:{:.3}", location.latitude, location.longitude)
    }

    /// Get a fresh entry. Expired entries count as a miss but are kept in
    /// the store for `get_stale`.
    pub fn get(&self, location: Location) -> Option<WeatherSnapshot> {
        let key = Self::key(location);

        match self.store.get(&key) {
            Some(entry) if !entry.is_expired() => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(
                    "✅ CACHE HIT: {} (TTL: {}s remaining)",
                    key,
                    entry.remaining_ttl()
                );
                Some(entry.snapshot.clone())
            }
            Some(_) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("📭 CACHE MISS (expired): {}", key);
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("📭 CACHE MISS: {}", key);
                None
            }
        }
    }

    /// Last successful snapshot regardless of TTL, for the degraded path
    /// when the provider cannot be reached
    pub fn get_stale(&self, location: Location) -> Option<WeatherSnapshot> {
        let key = Self::key(location);
        self.store.get(&key).map(|entry| {
            info!("♻️ CACHE STALE FALLBACK: {}", key);
            entry.snapshot.clone()
        })
    }

    pub fn set(&self, location: Location, snapshot: WeatherSnapshot) {
        let key = Self::key(location);
        let entry = CacheEntry {
            snapshot,
            created_at: Instant::now(),
            ttl_secs: self.ttl_secs,
        };
        self.store.insert(key.clone(), entry);
        debug!("💾 CACHE SET: {} (TTL: {}s)", key, self.ttl_secs);
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            entries: self.store.len(),
            hits,
            misses,
            hit_rate,
            ttl_secs: self.ttl_secs,
        }
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub ttl_secs: u64,
}
