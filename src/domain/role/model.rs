use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

/// A quota tier. Limits are stored per row so operators can tune them,
/// the defaults below are what `seed_defaults` writes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Role {
    pub role_id: i32,
    pub role_name: RoleName,
    pub daily_tts_limit: i32,
    pub daily_stt_limit: i32,
    pub char_limit: i32,
    pub audio_duration_limit: i32,
}

impl Role {
    /// Numeric limit for the given kind
    pub fn limit(&self, kind: LimitKind) -> i64 {
        let value = match kind {
            LimitKind::DailyTts => self.daily_tts_limit,
            LimitKind::DailyStt => self.daily_stt_limit,
            LimitKind::Char => self.char_limit,
            LimitKind::AudioDuration => self.audio_duration_limit,
        };
        i64::from(value)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "text")]
pub enum RoleName {
    Free,
    Premium,
    Enterprise,
    Admin,
}

impl RoleName {
    pub const ALL: [RoleName; 4] = [
        RoleName::Free,
        RoleName::Premium,
        RoleName::Enterprise,
        RoleName::Admin,
    ];

    /// Role assigned when none is set
    pub const BASELINE: RoleName = RoleName::Free;

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Free => "Free",
            RoleName::Premium => "Premium",
            RoleName::Enterprise => "Enterprise",
            RoleName::Admin => "Admin",
        }
    }

    pub fn default_limits(&self) -> RoleLimits {
        match self {
            RoleName::Free => RoleLimits {
                daily_tts: 5,
                daily_stt: 5,
                char: 300,
                audio_duration: 30,
            },
            RoleName::Premium => RoleLimits {
                daily_tts: 10,
                daily_stt: 10,
                char: 450,
                audio_duration: 45,
            },
            RoleName::Enterprise => RoleLimits {
                daily_tts: 20,
                daily_stt: 20,
                char: 600,
                audio_duration: 60,
            },
            RoleName::Admin => RoleLimits {
                daily_tts: 999_999,
                daily_stt: 999_999,
                char: 600,
                audio_duration: 60,
            },
        }
    }

    /// Admin is reserved for superusers
    pub fn is_self_assignable(&self) -> bool {
        *self != RoleName::Admin
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RoleName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoleName::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown role: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleLimits {
    pub daily_tts: i32,
    pub daily_stt: i32,
    pub char: i32,
    pub audio_duration: i32,
}

/// Which role limit a check applies to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LimitKind {
    DailyTts,
    DailyStt,
    Char,
    AudioDuration,
}

impl LimitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LimitKind::DailyTts => "daily_tts",
            LimitKind::DailyStt => "daily_stt",
            LimitKind::Char => "char",
            LimitKind::AudioDuration => "audio_duration",
        }
    }

    /// Daily limits are counted per day, the others bound a single submission
    pub fn is_daily(&self) -> bool {
        matches!(self, LimitKind::DailyTts | LimitKind::DailyStt)
    }
}

impl std::fmt::Display for LimitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LimitKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily_tts" => Ok(LimitKind::DailyTts),
            "daily_stt" => Ok(LimitKind::DailyStt),
            "char" => Ok(LimitKind::Char),
            "audio_duration" => Ok(LimitKind::AudioDuration),
            _ => Err(format!("Unknown limit: {}", s)),
        }
    }
}
