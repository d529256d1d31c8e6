use super::CounterStore;
use crate::error::AppResult;
use async_trait::async_trait;
use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};
use moka::Expiry;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CounterEntry {
    count: i64,
    ttl: Duration,
}

/// Expires each counter `ttl` after its last write
struct CounterExpiry;

impl Expiry<String, CounterEntry> for CounterExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CounterEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CounterEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process counter store backed by a moka cache.
///
/// Counters are only shared between requests served by the same process.
/// The cache is unbounded: evicting a live counter would hand its user a
/// fresh quota, so entries only leave through their ttl.
pub struct MemoryCounterStore {
    cache: Cache<String, CounterEntry>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        let cache = Cache::builder().expire_after(CounterExpiry).build();

        Self { cache }
    }
}

impl Default for MemoryCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn get(&self, key: &str) -> AppResult<Option<i64>> {
        Ok(self.cache.get(key).await.map(|entry| entry.count))
    }

    async fn set(&self, key: &str, value: i64, ttl: Duration) -> AppResult<()> {
        self.cache
            .insert(key.to_string(), CounterEntry { count: value, ttl })
            .await;
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        let entry = self
            .cache
            .entry(key.to_string())
            .or_insert(CounterEntry { count: 0, ttl })
            .await;
        Ok(entry.is_fresh())
    }

    async fn increment_below(
        &self,
        key: &str,
        ceiling: i64,
        ttl: Duration,
    ) -> AppResult<Option<i64>> {
        let result = self
            .cache
            .entry(key.to_string())
            .and_compute_with(|current| {
                let count = current.map(|entry| entry.into_value().count).unwrap_or(0);
                let op = if count < ceiling {
                    Op::Put(CounterEntry {
                        count: count + 1,
                        ttl,
                    })
                } else {
                    Op::Nop
                };
                std::future::ready(op)
            })
            .await;

        match result {
            CompResult::Inserted(entry) | CompResult::ReplacedWith(entry) => {
                Ok(Some(entry.into_value().count))
            }
            _ => Ok(None),
        }
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
