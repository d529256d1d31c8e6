use serde::Deserialize;
use std::env;

use crate::domain::limits::{DayBoundary, IncrementStrategy};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Usage counters
    pub counter_store: CounterStoreKind,
    pub counter_ttl_secs: u64,
    pub increment_strategy: IncrementStrategy,
    pub day_boundary: DayBoundary,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Backend holding the daily usage counters
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum CounterStoreKind {
    Memory,
    Postgres,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let config = Config {
            database_url: env::var("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            jwt_secret: env::var("JWT_SECRET")?,
            environment: match env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .as_str()
            {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            counter_store: match env::var("COUNTER_STORE")
                .unwrap_or_else(|_| "memory".to_string())
                .to_lowercase()
                .as_str()
            {
                "memory" => CounterStoreKind::Memory,
                "postgres" => CounterStoreKind::Postgres,
                other => return Err(format!("Unknown COUNTER_STORE: {}", other).into()),
            },
            counter_ttl_secs: parse_counter_ttl(
                &env::var("QUOTA_COUNTER_TTL_SECS").unwrap_or_else(|_| "86400".to_string()),
            )?,
            increment_strategy: env::var("QUOTA_INCREMENT_STRATEGY")
                .unwrap_or_else(|_| "atomic".to_string())
                .parse()?,
            day_boundary: env::var("QUOTA_DAY_BOUNDARY")
                .unwrap_or_else(|_| "local".to_string())
                .parse()?,
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

/// Counter ttl in seconds. Zero would expire every counter on write.
fn parse_counter_ttl(raw: &str) -> Result<u64, Box<dyn std::error::Error>> {
    let secs: u64 = raw.trim().parse()?;
    if secs == 0 {
        return Err("QUOTA_COUNTER_TTL_SECS must be at least 1".into());
    }
    Ok(secs)
}
