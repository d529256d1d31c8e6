use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::{Clock, CounterKey, InvalidSetting};
use crate::domain::role::LimitKind;
use crate::domain::user::User;
use crate::error::AppResult;
use crate::infrastructure::counters::CounterStore;

/// Lifetime of a counter after its last write
pub const COUNTER_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// How `check_and_increment_limit` updates the counter
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IncrementStrategy {
    /// Single increment-below-ceiling operation in the store.
    /// At most `limit` actions are ever counted per key.
    Atomic,
    /// Separate read and write. Concurrent callers can both pass the check
    /// and let one action through past the limit.
    ReadThenWrite,
}

impl FromStr for IncrementStrategy {
    type Err = InvalidSetting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "atomic" => Ok(IncrementStrategy::Atomic),
            "read_then_write" => Ok(IncrementStrategy::ReadThenWrite),
            _ => Err(InvalidSetting::new("increment strategy", s)),
        }
    }
}

/// Gates actions against the per-user, per-day budgets of the user's role.
pub struct UsageLimiter {
    store: Arc<dyn CounterStore>,
    clock: Arc<dyn Clock>,
    strategy: IncrementStrategy,
    counter_ttl: Duration,
}

impl UsageLimiter {
    pub fn new(
        store: Arc<dyn CounterStore>,
        clock: Arc<dyn Clock>,
        strategy: IncrementStrategy,
    ) -> Self {
        Self {
            store,
            clock,
            strategy,
            counter_ttl: COUNTER_TTL,
        }
    }

    pub fn with_counter_ttl(mut self, counter_ttl: Duration) -> Self {
        self.counter_ttl = counter_ttl;
        self
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Limit of the given kind from the user's role
    pub fn get_user_limit(&self, user: &User, limit: LimitKind) -> i64 {
        user.limit(limit)
    }

    /// Limit looked up by name. Unknown names get 0 so the action is blocked.
    pub fn get_user_limit_by_name(&self, user: &User, limit_name: &str) -> i64 {
        match limit_name.parse::<LimitKind>() {
            Ok(limit) => self.get_user_limit(user, limit),
            Err(_) => {
                tracing::warn!(
                    user_id = %user.id,
                    limit_name = %limit_name,
                    "Unknown limit name, treating limit as 0"
                );
                0
            }
        }
    }

    /// Key of today's counter for this user and action
    pub fn counter_key(&self, user_id: Uuid, action: LimitKind) -> CounterKey {
        CounterKey::new(user_id, action, self.clock.today())
    }

    /// Create today's counter at 0 if there is none yet.
    /// Never touches an existing counter.
    pub async fn initialize_limit_if_needed(&self, user: &User, action: LimitKind) -> AppResult<()> {
        let key = self.counter_key(user.id, action).to_string();

        let created = match self.strategy {
            IncrementStrategy::Atomic => self.store.set_if_absent(&key, self.counter_ttl).await?,
            IncrementStrategy::ReadThenWrite => {
                if self.store.get(&key).await?.is_none() {
                    self.store.set(&key, 0, self.counter_ttl).await?;
                    true
                } else {
                    false
                }
            }
        };

        if created {
            tracing::debug!(
                user_id = %user.id,
                action_type = %action,
                counter_key = %key,
                "Usage counter initialized"
            );
        }

        Ok(())
    }

    /// Count one more action for today if the user is below the role limit.
    ///
    /// Returns false, leaving the counter as is, once the limit is reached.
    pub async fn check_and_increment_limit(&self, user: &User, action: LimitKind) -> AppResult<bool> {
        Ok(self.admit(user, action).await?.is_some())
    }

    /// Same as `check_and_increment_limit`, returning the count this call
    /// produced. Only daily limits are counted; other kinds are refused.
    pub(crate) async fn admit(&self, user: &User, action: LimitKind) -> AppResult<Option<i64>> {
        if !action.is_daily() {
            tracing::warn!(
                user_id = %user.id,
                action_type = %action,
                "Not a daily limit, refusing to count it"
            );
            return Ok(None);
        }

        let max_limit = self.get_user_limit(user, action);
        let key = self.counter_key(user.id, action).to_string();

        let new_count = match self.strategy {
            IncrementStrategy::Atomic => {
                self.store
                    .increment_below(&key, max_limit, self.counter_ttl)
                    .await?
            }
            IncrementStrategy::ReadThenWrite => {
                let current = self.store.get(&key).await?.unwrap_or(0);
                if current >= max_limit {
                    None
                } else {
                    self.store.set(&key, current + 1, self.counter_ttl).await?;
                    Some(current + 1)
                }
            }
        };

        match new_count {
            Some(count) => tracing::debug!(
                user_id = %user.id,
                action_type = %action,
                count,
                limit = max_limit,
                "Usage counted"
            ),
            None => tracing::info!(
                user_id = %user.id,
                action_type = %action,
                limit = max_limit,
                "Daily limit reached"
            ),
        }

        Ok(new_count)
    }

    /// One-shot bound on a submission (characters, seconds of audio)
    pub fn is_within_file_limit(&self, user: &User, limit: LimitKind, value: i64) -> bool {
        value <= self.get_user_limit(user, limit)
    }

    /// Actions counted today, 0 if no counter exists
    pub async fn current_usage(&self, user: &User, action: LimitKind) -> AppResult<i64> {
        let key = self.counter_key(user.id, action).to_string();
        Ok(self.store.get(&key).await?.unwrap_or(0))
    }
}
