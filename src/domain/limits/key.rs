use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::role::LimitKind;

/// Identifies one usage counter: a user, an action and a calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CounterKey {
    pub user_id: Uuid,
    pub action: LimitKind,
    pub date: NaiveDate,
}

impl CounterKey {
    pub fn new(user_id: Uuid, action: LimitKind, date: NaiveDate) -> Self {
        Self {
            user_id,
            action,
            date,
        }
    }
}

impl std::fmt::Display for CounterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.user_id,
            self.action,
            self.date.format("%Y-%m-%d")
        )
    }
}
