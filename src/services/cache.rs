// src/services/cache.rs
// DOCUMENTATION: In-memory TTL cache for nearby service searches
// PURPOSE: Avoid repeating upstream calls for the same area

use crate::models::{Coordinate, ServiceRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Clone, Debug)]
struct CacheEntry {
    services: Arc<Vec<ServiceRecord>>,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Thread-safe cache keyed by rounded search center and radius
pub struct ServicesCache {
    store: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl ServicesCache {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            ttl: Duration::from_secs(ttl_seconds),
        }
    }

    /// Cache key for a search
    /// Coordinates are rounded to 4 decimals (~10 m)
    pub fn key(center: Coordinate, radius: u32) -> String {
        format!(
            "nearby:{}:{}:{}",
            (center.latitude * 10000.0).round() as i64,
            (center.longitude * 10000.0).round() as i64,
            radius
        )
    }

    pub async fn get(&self, key: &str) -> Option<Arc<Vec<ServiceRecord>>> {
        let store = self.store.read().await;

        match store.get(key) {
            Some(entry) if !entry.is_expired() => {
                log::debug!("Cache HIT for key: {}", key);
                Some(entry.services.clone())
            }
            Some(_) => {
                log::debug!("Cache EXPIRED for key: {}", key);
                None
            }
            None => {
                log::debug!("Cache MISS for key: {}", key);
                None
            }
        }
    }

    pub async fn insert(&self, key: String, services: Arc<Vec<ServiceRecord>>) {
        let expires_at = Instant::now() + self.ttl;
        self.store
            .write()
            .await
            .insert(key, CacheEntry { services, expires_at });
    }

    /// Drop expired entries
    pub async fn cleanup(&self) {
        let mut store = self.store.write().await;
        let before = store.len();
        store.retain(|_, entry| !entry.is_expired());

        if before > store.len() {
            log::info!(
                "Cache cleanup: removed {} expired entries ({} remaining)",
                before - store.len(),
                store.len()
            );
        }
    }

    pub async fn stats(&self) -> CacheStats {
        let store = self.store.read().await;
        let total = store.len();
        let expired = store.values().filter(|e| e.is_expired()).count();

        CacheStats {
            total_entries: total,
            expired_entries: expired,
            active_entries: total - expired,
            ttl_seconds: self.ttl.as_secs(),
        }
    }

    pub async fn clear(&self) -> usize {
        let mut store = self.store.write().await;
        let count = store.len();
        store.clear();
        log::info!("Cache cleared: {} entries removed", count);
        count
    }
}

/// Cache statistics
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
    pub ttl_seconds: u64,
}

/// Start background cleanup task
pub fn start_cleanup_task(cache: Arc<ServicesCache>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds.max(1)));

        loop {
            interval.tick().await;
            cache.cleanup().await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn services() -> Arc<Vec<ServiceRecord>> {
        Arc::new(vec![ServiceRecord {
            name: "General Hospital".to_string(),
            service_type: "hospital".to_string(),
            phone: "112".to_string(),
            address: "Main St".to_string(),
            distance: 300.0,
            longitude: -3.7,
            latitude: 40.4,
        }])
    }

    #[tokio::test]
    async fn test_cache_insert_get() {
        let cache = ServicesCache::new(60);
        let key = ServicesCache::key(Coordinate::new(40.4, -3.7), 5000);

        cache.insert(key.clone(), services()).await;
        let hit = cache.get(&key).await.unwrap();

        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].name, "General Hospital");
    }

    #[tokio::test]
    async fn test_cache_expiration() {
        let cache = ServicesCache::new(0);
        let key = "k".to_string();

        cache.insert(key.clone(), services()).await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(cache.get(&key).await.is_none());

        cache.cleanup().await;
        let stats = cache.stats().await;
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_key_rounding() {
        let key1 = ServicesCache::key(Coordinate::new(40.41681, -3.70381), 5000);
        let key2 = ServicesCache::key(Coordinate::new(40.41684, -3.70379), 5000);
        let key3 = ServicesCache::key(Coordinate::new(40.4169, -3.7038), 5000);
        let key4 = ServicesCache::key(Coordinate::new(40.41681, -3.70381), 1000);

        assert_eq!(key1, key2);
        assert_ne!(key1, key3);
        assert_ne!(key1, key4);
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = ServicesCache::new(60);
        cache.insert("a".to_string(), services()).await;
        cache.insert("b".to_string(), services()).await;

        assert_eq!(cache.clear().await, 2);
        assert_eq!(cache.stats().await.active_entries, 0);
    }
}
