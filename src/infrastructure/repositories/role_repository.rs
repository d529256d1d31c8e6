use crate::domain::role::{Role, RoleName};
use crate::error::AppResult;
use crate::infrastructure::db::DbPool;
use std::sync::Arc;

pub struct RoleRepository {
    pool: Arc<DbPool>,
}

impl RoleRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Upsert every default role with its default limits
    pub async fn seed_defaults(&self) -> AppResult<()> {
        let pool = self.pool.as_ref();

        for name in RoleName::ALL {
            let limits = name.default_limits();
            sqlx::query(
                r#"
                INSERT INTO roles (role_name, daily_tts_limit, daily_stt_limit, char_limit, audio_duration_limit)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (role_name)
                DO UPDATE SET
                    daily_tts_limit = EXCLUDED.daily_tts_limit,
                    daily_stt_limit = EXCLUDED.daily_stt_limit,
                    char_limit = EXCLUDED.char_limit,
                    audio_duration_limit = EXCLUDED.audio_duration_limit
                "#,
            )
            .bind(name)
            .bind(limits.daily_tts)
            .bind(limits.daily_stt)
            .bind(limits.char)
            .bind(limits.audio_duration)
            .execute(pool)
            .await?;
        }

        tracing::info!(roles = RoleName::ALL.len(), "Default roles seeded");

        Ok(())
    }

    /// All roles, lowest id first
    pub async fn find_all(&self) -> AppResult<Vec<Role>> {
        let pool = self.pool.as_ref();
        let roles = sqlx::query_as::<_, Role>(
            r#"
            SELECT role_id, role_name, daily_tts_limit, daily_stt_limit, char_limit, audio_duration_limit
            FROM roles
            ORDER BY role_id
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(roles)
    }

    /// Find role by name
    pub async fn find_by_name(&self, name: RoleName) -> AppResult<Option<Role>> {
        let pool = self.pool.as_ref();
        let role = sqlx::query_as::<_, Role>(
            r#"
            SELECT role_id, role_name, daily_tts_limit, daily_stt_limit, char_limit, audio_duration_limit
            FROM roles
            WHERE role_name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(role)
    }
}
