use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::role::{LimitKind, Role, RoleName};

/// A user joined with the role that sets its quotas
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_superuser: bool,
    #[sqlx(flatten)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn limit(&self, kind: LimitKind) -> i64 {
        self.role.limit(kind)
    }

    /// Superusers stay on Admin whatever they ask for
    pub fn can_change_role(&self) -> bool {
        !self.is_superuser
    }

    pub fn role_name(&self) -> RoleName {
        self.role.role_name
    }
}
