//! Configuration for a [`Limiter`](crate::Limiter).
//!
//! The limiter never reads configuration files itself. `LimiterConfig` derives
//! serde so a host service can embed it in whatever configuration it loads.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{LimitError, Result};
use crate::ratelimit::Granularity;

/// Time zone used to find day and month boundaries.
///
/// Second, minute and hour windows are the same in either policy for zones
/// with whole-hour offsets; day and month edges move with the zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeZonePolicy {
    /// Align windows to UTC calendar boundaries
    #[default]
    Utc,
    /// Align windows to the host's local calendar boundaries
    Local,
}

impl TimeZonePolicy {
    /// Lowercase name of the policy.
    pub fn name(&self) -> &'static str {
        match self {
            TimeZonePolicy::Utc => "utc",
            TimeZonePolicy::Local => "local",
        }
    }
}

impl fmt::Display for TimeZonePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimeZonePolicy {
    type Err = LimitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" => Ok(TimeZonePolicy::Utc),
            "local" => Ok(TimeZonePolicy::Local),
            _ => Err(LimitError::UnknownTimeZone(s.to_string())),
        }
    }
}

/// Per-granularity request limits.
///
/// A limit below 1 means the granularity is unlimited: it is never checked
/// and its counter is never touched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimiterConfig {
    /// Maximum requests per second
    #[serde(default)]
    pub per_second: i64,

    /// Maximum requests per minute
    #[serde(default)]
    pub per_minute: i64,

    /// Maximum requests per hour
    #[serde(default)]
    pub per_hour: i64,

    /// Maximum requests per calendar day
    #[serde(default)]
    pub per_day: i64,

    /// Maximum requests per calendar month
    #[serde(default)]
    pub per_month: i64,

    /// Zone used for window alignment
    #[serde(default)]
    pub time_zone: TimeZonePolicy,
}

impl LimiterConfig {
    /// Create a configuration from the five limits, in second-to-month order.
    pub fn new(
        per_second: i64,
        per_minute: i64,
        per_hour: i64,
        per_day: i64,
        per_month: i64,
    ) -> Self {
        Self {
            per_second,
            per_minute,
            per_hour,
            per_day,
            per_month,
            time_zone: TimeZonePolicy::default(),
        }
    }

    /// Use the given time zone policy for window alignment.
    pub fn with_time_zone(mut self, time_zone: TimeZonePolicy) -> Self {
        self.time_zone = time_zone;
        self
    }

    /// Get the configured limit for a granularity.
    pub fn limit(&self, granularity: Granularity) -> i64 {
        match granularity {
            Granularity::Second => self.per_second,
            Granularity::Minute => self.per_minute,
            Granularity::Hour => self.per_hour,
            Granularity::Day => self.per_day,
            Granularity::Month => self.per_month,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_unlimited_utc() {
        let config = LimiterConfig::default();

        for granularity in Granularity::ALL {
            assert_eq!(config.limit(granularity), 0);
        }
        assert_eq!(config.time_zone, TimeZonePolicy::Utc);
    }

    #[test]
    fn test_new_keeps_positional_order() {
        let config = LimiterConfig::new(1, 2, 3, 4, 5);

        assert_eq!(config.limit(Granularity::Second), 1);
        assert_eq!(config.limit(Granularity::Minute), 2);
        assert_eq!(config.limit(Granularity::Hour), 3);
        assert_eq!(config.limit(Granularity::Day), 4);
        assert_eq!(config.limit(Granularity::Month), 5);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let json = r#"{"per_second": 10, "per_day": 1000, "time_zone": "local"}"#;
        let config: LimiterConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.per_second, 10);
        assert_eq!(config.per_minute, 0);
        assert_eq!(config.per_day, 1000);
        assert_eq!(config.time_zone, TimeZonePolicy::Local);
    }

    #[test]
    fn test_time_zone_from_str() {
        assert_eq!("UTC".parse::<TimeZonePolicy>(), Ok(TimeZonePolicy::Utc));
        assert_eq!(" local ".parse::<TimeZonePolicy>(), Ok(TimeZonePolicy::Local));
        assert_eq!(
            "mars".parse::<TimeZonePolicy>(),
            Err(LimitError::UnknownTimeZone("mars".to_string()))
        );
    }
}
