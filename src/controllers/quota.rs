use axum::{extract::State, http::StatusCode, Extension, Json};
use std::sync::Arc;

use crate::{
    domain::quota::{
        AdmissionResponse, QuotaService, QuotaServiceApi, Submission, SubmissionCheckResponse,
        UsageReport,
    },
    error::AppResult,
    infrastructure::auth::AuthUser,
};

/// Admission endpoints called by the upload, transcription and synthesis
/// handlers before they do any work.
pub struct QuotaController {
    quota_service: Arc<QuotaService>,
}

impl QuotaController {
    pub fn new(quota_service: Arc<QuotaService>) -> Self {
        Self { quota_service }
    }

    /// POST /api/submissions/check - Size check for a text or audio upload
    pub async fn check_submission(
        State(controller): State<Arc<QuotaController>>,
        Extension(auth_user): Extension<AuthUser>,
        Json(submission): Json<Submission>,
    ) -> AppResult<Json<SubmissionCheckResponse>> {
        let response = controller
            .quota_service
            .check_submission(auth_user.user_id, submission)
            .await?;
        Ok(Json(response))
    }

    /// POST /api/stt/authorize - Count one transcription
    pub async fn authorize_transcription(
        State(controller): State<Arc<QuotaController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<(StatusCode, Json<AdmissionResponse>)> {
        let response = controller
            .quota_service
            .authorize_transcription(auth_user.user_id)
            .await?;
        Ok((StatusCode::OK, Json(response)))
    }

    /// POST /api/tts/authorize - Count one synthesis
    pub async fn authorize_synthesis(
        State(controller): State<Arc<QuotaController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<(StatusCode, Json<AdmissionResponse>)> {
        let response = controller
            .quota_service
            .authorize_synthesis(auth_user.user_id)
            .await?;
        Ok((StatusCode::OK, Json(response)))
    }

    /// GET /api/usage - Today's usage statistics
    pub async fn get_usage(
        State(controller): State<Arc<QuotaController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<UsageReport>> {
        let report = controller
            .quota_service
            .usage_report(auth_user.user_id)
            .await?;
        Ok(Json(report))
    }
}
