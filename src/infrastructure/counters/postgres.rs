use super::CounterStore;
use crate::error::{AppError, AppResult};
use crate::infrastructure::db::{check_connection, DbPool};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

/// Counter store on the `usage_counters` table, shared by every instance
/// pointed at the same database.
///
/// Expired rows read as absent and are overwritten in place; `purge_expired`
/// reclaims the ones nobody touches again.
pub struct PgCounterStore {
    pool: Arc<DbPool>,
}

impl PgCounterStore {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Delete rows past their expiry
    pub async fn purge_expired(&self) -> AppResult<u64> {
        let pool = self.pool.as_ref();
        let result = sqlx::query("DELETE FROM usage_counters WHERE expires_at <= $1")
            .bind(Utc::now())
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    fn expiry(now: DateTime<Utc>, ttl: Duration) -> AppResult<DateTime<Utc>> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AppError::Internal(format!("Invalid counter ttl: {}", e)))?;
        Ok(now + ttl)
    }
}

#[async_trait]
impl CounterStore for PgCounterStore {
    async fn get(&self, key: &str) -> AppResult<Option<i64>> {
        let pool = self.pool.as_ref();
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT count FROM usage_counters WHERE counter_key = $1 AND expires_at > $2",
        )
        .bind(key)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

        Ok(count)
    }

    async fn set(&self, key: &str, value: i64, ttl: Duration) -> AppResult<()> {
        let pool = self.pool.as_ref();
        let expires_at = Self::expiry(Utc::now(), ttl)?;

        sqlx::query(
            r#"
            INSERT INTO usage_counters (counter_key, count, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (counter_key)
            DO UPDATE SET count = EXCLUDED.count, expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(expires_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn set_if_absent(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let now = Utc::now();
        let expires_at = Self::expiry(now, ttl)?;

        let created = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO usage_counters (counter_key, count, expires_at)
            VALUES ($1, 0, $2)
            ON CONFLICT (counter_key)
            DO UPDATE SET count = 0, expires_at = EXCLUDED.expires_at
            WHERE usage_counters.expires_at <= $3
            RETURNING count
            "#,
        )
        .bind(key)
        .bind(expires_at)
        .bind(now)
        .fetch_optional(pool)
        .await?;

        Ok(created.is_some())
    }

    async fn increment_below(
        &self,
        key: &str,
        ceiling: i64,
        ttl: Duration,
    ) -> AppResult<Option<i64>> {
        if ceiling <= 0 {
            return Ok(None);
        }

        let pool = self.pool.as_ref();
        let now = Utc::now();
        let expires_at = Self::expiry(now, ttl)?;

        // The conflicting row is locked before the WHERE clause is evaluated,
        // so concurrent callers see each other's increments.
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO usage_counters (counter_key, count, expires_at)
            VALUES ($1, 1, $3)
            ON CONFLICT (counter_key)
            DO UPDATE SET
                count = CASE
                    WHEN usage_counters.expires_at <= $4 THEN 1
                    ELSE usage_counters.count + 1
                END,
                expires_at = EXCLUDED.expires_at
            WHERE usage_counters.expires_at <= $4 OR usage_counters.count < $2
            RETURNING count
            "#,
        )
        .bind(key)
        .bind(ceiling)
        .bind(expires_at)
        .bind(now)
        .fetch_optional(pool)
        .await?;

        Ok(count)
    }

    async fn health_check(&self) -> AppResult<()> {
        check_connection(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
