pub mod clock;
pub mod key;
pub mod limiter;

pub use clock::{Clock, DayBoundary, FixedClock, SystemClock};
pub use key::CounterKey;
pub use limiter::{IncrementStrategy, UsageLimiter, COUNTER_TTL};

/// A configuration value that does not name a known option
#[derive(Debug, thiserror::Error)]
#[error("invalid {setting}: {value}")]
pub struct InvalidSetting {
    pub setting: &'static str,
    pub value: String,
}

impl InvalidSetting {
    pub fn new(setting: &'static str, value: &str) -> Self {
        Self {
            setting,
            value: value.to_string(),
        }
    }
}
