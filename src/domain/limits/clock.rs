use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::InvalidSetting;

/// Which calendar decides when a day starts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DayBoundary {
    /// Server local time
    Local,
    Utc,
}

impl FromStr for DayBoundary {
    type Err = InvalidSetting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(DayBoundary::Local),
            "utc" => Ok(DayBoundary::Utc),
            _ => Err(InvalidSetting::new("day boundary", s)),
        }
    }
}

/// Source of the current calendar day for counter keys
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;

    /// Instant at which `today()` rolls over
    fn next_reset(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    boundary: DayBoundary,
}

impl SystemClock {
    pub fn new(boundary: DayBoundary) -> Self {
        Self { boundary }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        match self.boundary {
            DayBoundary::Local => Local::now().date_naive(),
            DayBoundary::Utc => Utc::now().date_naive(),
        }
    }

    fn next_reset(&self) -> DateTime<Utc> {
        let tomorrow = self.today() + Duration::days(1);
        let midnight = tomorrow.and_time(chrono::NaiveTime::MIN);
        match self.boundary {
            DayBoundary::Utc => midnight.and_utc(),
            // A DST gap at midnight has no local instant; fall back to UTC.
            DayBoundary::Local => midnight
                .and_local_timezone(Local)
                .earliest()
                .map(|t| t.with_timezone(&Utc))
                .unwrap_or_else(|| midnight.and_utc()),
        }
    }
}

/// Clock pinned to one day, for tests and replays
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    date: NaiveDate,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.date
    }

    fn next_reset(&self) -> DateTime<Utc> {
        (self.date + Duration::days(1))
            .and_time(chrono::NaiveTime::MIN)
            .and_utc()
    }
}
