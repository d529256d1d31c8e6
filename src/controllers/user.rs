use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::user::{ChangeRoleRequest, MeResponse, RoleDto};
use crate::{
    domain::user::{UserService, UserServiceApi},
    error::AppResult,
    infrastructure::auth::AuthUser,
};

pub struct UserController {
    user_service: Arc<UserService>,
}

impl UserController {
    pub fn new(user_service: Arc<UserService>) -> Self {
        Self { user_service }
    }

    /// GET /api/me - Get current user profile
    pub async fn get_me(
        State(controller): State<Arc<UserController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<MeResponse>> {
        let response = controller
            .user_service
            .get_user_profile(auth_user.user_id)
            .await?;
        Ok(Json(response))
    }

    /// PUT /api/me/role - Switch to another role
    pub async fn change_role(
        State(controller): State<Arc<UserController>>,
        Extension(auth_user): Extension<AuthUser>,
        Json(request): Json<ChangeRoleRequest>,
    ) -> AppResult<Json<MeResponse>> {
        let response = controller
            .user_service
            .change_role(auth_user.user_id, &request.role)
            .await?;
        Ok(Json(response))
    }

    /// POST /api/admin/users/{userId}/superuser - Grant superuser status
    pub async fn grant_superuser(
        State(controller): State<Arc<UserController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(user_id): Path<Uuid>,
    ) -> AppResult<Json<MeResponse>> {
        let response = controller
            .user_service
            .grant_superuser(auth_user.user_id, user_id)
            .await?;
        Ok(Json(response))
    }

    /// GET /api/roles - List roles and their limits
    pub async fn list_roles(
        State(controller): State<Arc<UserController>>,
    ) -> AppResult<Json<Vec<RoleDto>>> {
        let roles = controller.user_service.list_roles().await?;
        Ok(Json(roles))
    }
}
