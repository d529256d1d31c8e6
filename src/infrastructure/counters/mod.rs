pub mod memory;
pub mod postgres;

pub use memory::MemoryCounterStore;
pub use postgres::PgCounterStore;

use crate::error::AppResult;
use async_trait::async_trait;
use std::time::Duration;

/// Key/value store holding usage counters.
/// Abstracts the backend (in-process cache, Postgres, ...)
///
/// Missing and expired keys read as absent. Every write sets the ttl of the
/// key afresh.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Current value of a counter, `None` if absent or expired
    async fn get(&self, key: &str) -> AppResult<Option<i64>>;

    /// Unconditionally write a counter
    async fn set(&self, key: &str, value: i64, ttl: Duration) -> AppResult<()>;

    /// Create the counter at 0 unless it already exists.
    ///
    /// Returns true if this call created it.
    async fn set_if_absent(&self, key: &str, ttl: Duration) -> AppResult<bool>;

    /// Atomically add one to the counter (absent counts as 0) if its current
    /// value is below `ceiling`.
    ///
    /// Returns the new value, or `None` when the ceiling was already reached,
    /// in which case the counter is left untouched.
    async fn increment_below(
        &self,
        key: &str,
        ceiling: i64,
        ttl: Duration,
    ) -> AppResult<Option<i64>>;

    /// Check the backend is reachable
    async fn health_check(&self) -> AppResult<()>;

    /// Short name for logs and readiness output
    fn backend_name(&self) -> &'static str;
}
