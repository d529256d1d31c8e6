use super::error::QuotaServiceError;
use super::text::character_count;
use super::{ActionUsage, AdmissionResponse, Submission, SubmissionCheckResponse, UsageReport};
use crate::domain::limits::UsageLimiter;
use crate::domain::role::LimitKind;
use crate::domain::user::User;
use crate::infrastructure::repositories::UserRepository;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

const DAILY_ACTIONS: [LimitKind; 2] = [LimitKind::DailyTts, LimitKind::DailyStt];

pub struct QuotaService {
    user_repo: Arc<UserRepository>,
    limiter: Arc<UsageLimiter>,
}

impl QuotaService {
    pub fn new(user_repo: Arc<UserRepository>, limiter: Arc<UsageLimiter>) -> Self {
        Self { user_repo, limiter }
    }
}

#[async_trait]
pub trait QuotaServiceApi: Send + Sync {
    /// Check an upload against the role's size bounds before it is stored.
    /// Nothing is counted.
    async fn check_submission(
        &self,
        user_id: Uuid,
        submission: Submission,
    ) -> Result<SubmissionCheckResponse, QuotaServiceError>;

    /// Admit one transcription, counting it against today's budget
    async fn authorize_transcription(
        &self,
        user_id: Uuid,
    ) -> Result<AdmissionResponse, QuotaServiceError>;

    /// Admit one synthesis, counting it against today's budget
    async fn authorize_synthesis(&self, user_id: Uuid)
        -> Result<AdmissionResponse, QuotaServiceError>;

    /// Today's counts and limits for every daily action
    async fn usage_report(&self, user_id: Uuid) -> Result<UsageReport, QuotaServiceError>;
}

#[async_trait]
impl QuotaServiceApi for QuotaService {
    async fn check_submission(
        &self,
        user_id: Uuid,
        submission: Submission,
    ) -> Result<SubmissionCheckResponse, QuotaServiceError> {
        let (limit_type, measured) = measure_submission(&submission)?;
        let user = self.find_user(user_id).await?;
        let limit = self.limiter.get_user_limit(&user, limit_type);

        tracing::info!(
            user_id = %user_id,
            limit_type = %limit_type,
            measured,
            limit,
            "Submission size check"
        );

        if !self.limiter.is_within_file_limit(&user, limit_type, measured) {
            return Err(QuotaServiceError::TooLarge(format!(
                "{} {} exceeds the {} role limit of {}",
                measured,
                unit(limit_type),
                user.role_name(),
                limit
            )));
        }

        Ok(SubmissionCheckResponse {
            limit_type,
            measured,
            limit,
        })
    }

    async fn authorize_transcription(
        &self,
        user_id: Uuid,
    ) -> Result<AdmissionResponse, QuotaServiceError> {
        self.authorize(user_id, LimitKind::DailyStt).await
    }

    async fn authorize_synthesis(
        &self,
        user_id: Uuid,
    ) -> Result<AdmissionResponse, QuotaServiceError> {
        self.authorize(user_id, LimitKind::DailyTts).await
    }

    async fn usage_report(&self, user_id: Uuid) -> Result<UsageReport, QuotaServiceError> {
        let user = self.find_user(user_id).await?;

        let mut actions = Vec::with_capacity(DAILY_ACTIONS.len());
        for action in DAILY_ACTIONS {
            let used = self
                .limiter
                .current_usage(&user, action)
                .await
                .map_err(|e| QuotaServiceError::Dependency(e.to_string()))?;
            let limit = self.limiter.get_user_limit(&user, action);
            actions.push(ActionUsage {
                action,
                used,
                limit,
                remaining: (limit - used).max(0),
            });
        }

        Ok(UsageReport {
            period: "daily".to_string(),
            role: user.role_name().to_string(),
            actions,
            resets_at: self.limiter.clock().next_reset(),
        })
    }
}

impl QuotaService {
    async fn find_user(&self, user_id: Uuid) -> Result<User, QuotaServiceError> {
        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(|e| QuotaServiceError::Dependency(e.to_string()))?
            .ok_or(QuotaServiceError::NotFound)
    }

    async fn authorize(
        &self,
        user_id: Uuid,
        action: LimitKind,
    ) -> Result<AdmissionResponse, QuotaServiceError> {
        let user = self.find_user(user_id).await?;

        self.limiter
            .initialize_limit_if_needed(&user, action)
            .await
            .map_err(|e| QuotaServiceError::Dependency(e.to_string()))?;
        let admitted = self
            .limiter
            .admit(&user, action)
            .await
            .map_err(|e| QuotaServiceError::Dependency(e.to_string()))?;

        let limit = self.limiter.get_user_limit(&user, action);
        let Some(used) = admitted else {
            return Err(QuotaServiceError::LimitExceeded(format!(
                "Daily {} limit of {} reached for the {} role",
                label(action),
                limit,
                user.role_name()
            )));
        };

        Ok(AdmissionResponse {
            action,
            used,
            limit,
            remaining: (limit - used).max(0),
            resets_at: self.limiter.clock().next_reset(),
        })
    }
}

/// Which bound a submission is checked against, and its size in that unit
pub fn measure_submission(submission: &Submission) -> Result<(LimitKind, i64), QuotaServiceError> {
    match submission {
        Submission::Text { content } => {
            let count = character_count(content);
            if count == 0 {
                return Err(QuotaServiceError::Invalid(
                    "Text cannot be empty".to_string(),
                ));
            }
            Ok((LimitKind::Char, count))
        }
        Submission::Audio { duration_seconds } => {
            if !duration_seconds.is_finite() || *duration_seconds <= 0.0 {
                return Err(QuotaServiceError::Invalid(
                    "Audio duration must be a positive number of seconds".to_string(),
                ));
            }
            // Partial seconds count as a full second against the limit
            Ok((LimitKind::AudioDuration, duration_seconds.ceil() as i64))
        }
    }
}

fn label(action: LimitKind) -> &'static str {
    match action {
        LimitKind::DailyTts => "text-to-speech",
        LimitKind::DailyStt => "speech-to-text",
        LimitKind::Char => "character",
        LimitKind::AudioDuration => "audio duration",
    }
}

fn unit(limit: LimitKind) -> &'static str {
    match limit {
        LimitKind::Char => "characters",
        LimitKind::AudioDuration => "seconds of audio",
        LimitKind::DailyTts | LimitKind::DailyStt => "requests",
    }
}
