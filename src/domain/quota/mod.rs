pub mod error;
pub mod service;
pub mod text;

pub use error::QuotaServiceError;
pub use service::{QuotaService, QuotaServiceApi};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::role::LimitKind;

/// Something a user wants to upload, sized before it is accepted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Submission {
    Text { content: String },
    Audio { duration_seconds: f64 },
}

/// Response for POST /api/submissions/check
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmissionCheckResponse {
    pub limit_type: LimitKind,
    pub measured: i64,
    pub limit: i64,
}

/// Response for POST /api/{stt,tts}/authorize
#[derive(Debug, Serialize, Deserialize)]
pub struct AdmissionResponse {
    pub action: LimitKind,
    pub used: i64,
    pub limit: i64,
    pub remaining: i64,
    pub resets_at: DateTime<Utc>,
}

/// Response for GET /api/usage
#[derive(Debug, Serialize, Deserialize)]
pub struct UsageReport {
    pub period: String,
    pub role: String,
    pub actions: Vec<ActionUsage>,
    pub resets_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActionUsage {
    pub action: LimitKind,
    pub used: i64,
    pub limit: i64,
    pub remaining: i64,
}
