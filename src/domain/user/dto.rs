use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::role::Role;

/// Response for GET /api/me
#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_superuser: bool,
    pub role: RoleDto,
    pub usage: UsageTodayDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoleDto {
    pub name: String,
    pub limits: RoleLimitsDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoleLimitsDto {
    pub daily_tts: i32,
    pub daily_stt: i32,
    pub characters: i32,
    pub audio_duration_seconds: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsageTodayDto {
    pub tts_used_today: i64,
    pub stt_used_today: i64,
    pub resets_at: DateTime<Utc>,
}

/// Request for PUT /api/me/role
#[derive(Debug, Serialize, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: String,
}

impl From<&Role> for RoleDto {
    fn from(role: &Role) -> Self {
        Self {
            name: role.role_name.to_string(),
            limits: RoleLimitsDto {
                daily_tts: role.daily_tts_limit,
                daily_stt: role.daily_stt_limit,
                characters: role.char_limit,
                audio_duration_seconds: role.audio_duration_limit,
            },
        }
    }
}
