use super::error::UserServiceError;
use super::{dto::*, User};
use crate::domain::limits::UsageLimiter;
use crate::domain::role::{LimitKind, RoleName};
use crate::infrastructure::repositories::{RoleRepository, UserRepository};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

pub struct UserService {
    user_repo: Arc<UserRepository>,
    role_repo: Arc<RoleRepository>,
    limiter: Arc<UsageLimiter>,
}

impl UserService {
    pub fn new(
        user_repo: Arc<UserRepository>,
        role_repo: Arc<RoleRepository>,
        limiter: Arc<UsageLimiter>,
    ) -> Self {
        Self {
            user_repo,
            role_repo,
            limiter,
        }
    }
}

#[async_trait]
pub trait UserServiceApi: Send + Sync {
    /// Profile with role limits and today's usage
    async fn get_user_profile(&self, user_id: Uuid) -> Result<MeResponse, UserServiceError>;

    /// Switch the user to another self-assignable role.
    ///
    /// Superusers are pinned to Admin and cannot switch.
    async fn change_role(
        &self,
        user_id: Uuid,
        role_name: &str,
    ) -> Result<MeResponse, UserServiceError>;

    /// Grant superuser status, moving the target to the Admin role.
    /// Only a superuser may do this.
    async fn grant_superuser(
        &self,
        actor_id: Uuid,
        user_id: Uuid,
    ) -> Result<MeResponse, UserServiceError>;

    async fn list_roles(&self) -> Result<Vec<RoleDto>, UserServiceError>;
}

#[async_trait]
impl UserServiceApi for UserService {
    async fn get_user_profile(&self, user_id: Uuid) -> Result<MeResponse, UserServiceError> {
        let user = self.find_user(user_id).await?;
        self.build_me_response(&user).await
    }

    async fn change_role(
        &self,
        user_id: Uuid,
        role_name: &str,
    ) -> Result<MeResponse, UserServiceError> {
        let role_name: RoleName = role_name.parse().map_err(UserServiceError::Invalid)?;
        let user = self.find_user(user_id).await?;

        if !user.can_change_role() {
            return Err(UserServiceError::Forbidden(
                "Superusers are pinned to the Admin role".to_string(),
            ));
        }
        if !role_name.is_self_assignable() {
            return Err(UserServiceError::Forbidden(format!(
                "Role {} cannot be selected",
                role_name
            )));
        }

        if user.role_name() == role_name {
            return self.build_me_response(&user).await;
        }

        let role = self
            .role_repo
            .find_by_name(role_name)
            .await
            .map_err(|e| UserServiceError::Dependency(e.to_string()))?
            .ok_or_else(|| UserServiceError::Invalid(format!("Unknown role: {}", role_name)))?;

        let updated = self
            .user_repo
            .update_role(user_id, role.role_id)
            .await
            .map_err(|e| UserServiceError::Dependency(e.to_string()))?;

        tracing::info!(
            user_id = %user_id,
            from = %user.role_name(),
            to = %role_name,
            "User role changed"
        );

        self.build_me_response(&updated).await
    }

    async fn grant_superuser(
        &self,
        actor_id: Uuid,
        user_id: Uuid,
    ) -> Result<MeResponse, UserServiceError> {
        let actor = self.find_user(actor_id).await?;
        if !actor.is_superuser {
            return Err(UserServiceError::Forbidden(
                "Only superusers can grant superuser status".to_string(),
            ));
        }

        self.find_user(user_id).await?;
        let promoted = self
            .user_repo
            .grant_superuser(user_id)
            .await
            .map_err(|e| UserServiceError::Dependency(e.to_string()))?;

        tracing::info!(
            actor_id = %actor_id,
            user_id = %user_id,
            role = %promoted.role_name(),
            "Superuser granted"
        );

        self.build_me_response(&promoted).await
    }

    async fn list_roles(&self) -> Result<Vec<RoleDto>, UserServiceError> {
        let roles = self
            .role_repo
            .find_all()
            .await
            .map_err(|e| UserServiceError::Dependency(e.to_string()))?;
        Ok(roles.iter().map(RoleDto::from).collect())
    }
}

impl UserService {
    async fn find_user(&self, user_id: Uuid) -> Result<User, UserServiceError> {
        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(|e| UserServiceError::Dependency(e.to_string()))?
            .ok_or(UserServiceError::NotFound)
    }

    async fn build_me_response(&self, user: &User) -> Result<MeResponse, UserServiceError> {
        let tts_used_today = self
            .limiter
            .current_usage(user, LimitKind::DailyTts)
            .await
            .map_err(|e| UserServiceError::Dependency(e.to_string()))?;
        let stt_used_today = self
            .limiter
            .current_usage(user, LimitKind::DailyStt)
            .await
            .map_err(|e| UserServiceError::Dependency(e.to_string()))?;

        Ok(MeResponse {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            is_superuser: user.is_superuser,
            role: RoleDto::from(&user.role),
            usage: UsageTodayDto {
                tts_used_today,
                stt_used_today,
                resets_at: self.limiter.clock().next_reset(),
            },
        })
    }
}
