use crate::domain::role::RoleName;
use crate::infrastructure::db::DbPool;
use crate::{domain::user::User, error::AppResult};
use std::sync::Arc;
use uuid::Uuid;

const SELECT_USER_WITH_ROLE: &str = r#"
    SELECT u.id, u.username, u.email, u.is_superuser, u.created_at, u.updated_at,
           r.role_id, r.role_name, r.daily_tts_limit, r.daily_stt_limit,
           r.char_limit, r.audio_duration_limit
    FROM users u
    JOIN roles r ON r.role_id = u.role_id
"#;

pub struct UserRepository {
    pool: Arc<DbPool>,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Find user by ID
    pub async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let pool = self.pool.as_ref();
        let user = sqlx::query_as::<_, User>(&format!("{} WHERE u.id = $1", SELECT_USER_WITH_ROLE))
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Create a new user on the baseline role
    pub async fn create(&self, username: &str, email: &str) -> AppResult<User> {
        let pool = self.pool.as_ref();
        let id = Uuid::new_v4();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, is_superuser, role_id, created_at, updated_at)
            VALUES ($1, $2, $3, FALSE, (SELECT role_id FROM roles WHERE role_name = $4), $5, $5)
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(email)
        .bind(RoleName::BASELINE)
        .bind(now)
        .execute(pool)
        .await?;

        self.fetch_one(id).await
    }

    /// Point the user at another role
    pub async fn update_role(&self, user_id: Uuid, role_id: i32) -> AppResult<User> {
        let pool = self.pool.as_ref();
        let now = chrono::Utc::now();

        sqlx::query("UPDATE users SET role_id = $1, updated_at = $2 WHERE id = $3")
            .bind(role_id)
            .bind(now)
            .bind(user_id)
            .execute(pool)
            .await?;

        self.fetch_one(user_id).await
    }

    /// Make the user a superuser, which also pins them to the Admin role
    pub async fn grant_superuser(&self, user_id: Uuid) -> AppResult<User> {
        let pool = self.pool.as_ref();
        let now = chrono::Utc::now();

        sqlx::query(
            r#"
            UPDATE users
            SET is_superuser = TRUE,
                role_id = COALESCE((SELECT role_id FROM roles WHERE role_name = $1), role_id),
                updated_at = $2
            WHERE id = $3
            "#,
        )
        .bind(RoleName::Admin)
        .bind(now)
        .bind(user_id)
        .execute(pool)
        .await?;

        self.fetch_one(user_id).await
    }

    async fn fetch_one(&self, user_id: Uuid) -> AppResult<User> {
        let pool = self.pool.as_ref();
        let user = sqlx::query_as::<_, User>(&format!("{} WHERE u.id = $1", SELECT_USER_WITH_ROLE))
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok(user)
    }
}
