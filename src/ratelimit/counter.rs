//! Granularities, window alignment and per-window counters.

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use crate::config::{LimiterConfig, TimeZonePolicy};
use crate::error::{LimitError, Result};

/// Time granularity tracked by the limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Per-second window
    Second,
    /// Per-minute window
    Minute,
    /// Per-hour window
    Hour,
    /// Per-calendar-day window
    Day,
    /// Per-calendar-month window
    Month,
}

impl Granularity {
    /// All granularities, in the order admission checks them.
    pub const ALL: [Granularity; 5] = [
        Granularity::Second,
        Granularity::Minute,
        Granularity::Hour,
        Granularity::Day,
        Granularity::Month,
    ];

    /// Position of this granularity in [`Granularity::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Granularity::Second => 0,
            Granularity::Minute => 1,
            Granularity::Hour => 2,
            Granularity::Day => 3,
            Granularity::Month => 4,
        }
    }

    /// Lowercase name of the granularity.
    pub fn name(&self) -> &'static str {
        match self {
            Granularity::Second => "second",
            Granularity::Minute => "minute",
            Granularity::Hour => "hour",
            Granularity::Day => "day",
            Granularity::Month => "month",
        }
    }

    /// Get the epoch-seconds start of the window containing `instant`.
    ///
    /// Second, minute, hour and day truncate the wall-clock time in the chosen
    /// zone. Month goes back to 00:00:00 on the first day of the calendar
    /// month, so month windows are 28 to 31 days long.
    pub fn aligned_window_start(&self, instant: DateTime<Utc>, zone: TimeZonePolicy) -> i64 {
        match zone {
            TimeZonePolicy::Utc => self.truncate(&instant),
            TimeZonePolicy::Local => self.truncate(&instant.with_timezone(&Local)),
        }
    }

    fn truncate<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> i64 {
        let wall = instant.naive_local();
        let date = wall.date();
        let floor = match self {
            Granularity::Second => return instant.timestamp(),
            Granularity::Minute => date.and_hms_opt(wall.hour(), wall.minute(), 0),
            Granularity::Hour => date.and_hms_opt(wall.hour(), 0, 0),
            Granularity::Day => date.and_hms_opt(0, 0, 0),
            Granularity::Month => date.with_day(1).and_then(|first| first.and_hms_opt(0, 0, 0)),
        };

        let Some(floor) = floor else {
            return instant.timestamp();
        };

        // Same offset as the instant, so a repeated DST hour gets its own windows.
        let same_offset = instant.timestamp() - (wall - floor).num_seconds();

        match self {
            Granularity::Day | Granularity::Month => instant
                .timezone()
                .from_local_datetime(&floor)
                .earliest()
                .map(|start| start.timestamp())
                .filter(|start| *start <= instant.timestamp())
                .unwrap_or(same_offset),
            _ => same_offset,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Granularity {
    type Err = LimitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "second" => Ok(Granularity::Second),
            "minute" => Ok(Granularity::Minute),
            "hour" => Ok(Granularity::Hour),
            "day" => Ok(Granularity::Day),
            "month" => Ok(Granularity::Month),
            _ => Err(LimitError::UnknownGranularity(s.to_string())),
        }
    }
}

/// Counter state for one granularity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowState {
    /// Aligned start of the window the count belongs to; 0 before any request
    pub window_start: i64,
    /// Requests admitted in the window starting at `window_start`
    pub count: u64,
    /// Maximum requests per window; below 1 means unlimited
    pub limit: i64,
}

impl WindowState {
    /// Create an empty window with the given limit.
    pub fn new(limit: i64) -> Self {
        Self {
            window_start: 0,
            count: 0,
            limit,
        }
    }

    /// Whether this granularity is checked at all.
    pub fn is_limited(&self) -> bool {
        self.limit >= 1
    }

    /// Whether a request in the window starting at `window_start` would be rejected.
    pub fn is_saturated_at(&self, window_start: i64) -> bool {
        self.is_limited() && self.window_start == window_start && self.count >= self.limit as u64
    }

    /// Count one request in the window starting at `window_start`.
    ///
    /// Returns `true` if the window rolled over. Unlimited windows are left untouched.
    pub(crate) fn record(&mut self, window_start: i64) -> bool {
        if !self.is_limited() {
            return false;
        }

        if self.window_start != window_start {
            self.window_start = window_start;
            self.count = 1;
            true
        } else {
            self.count += 1;
            false
        }
    }
}

/// One [`WindowState`] per granularity.
///
/// This is both the state a limiter guards and the snapshot it hands out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Windows {
    pub second: WindowState,
    pub minute: WindowState,
    pub hour: WindowState,
    pub day: WindowState,
    pub month: WindowState,
}

impl Windows {
    /// Create empty windows carrying the configured limits.
    pub fn from_config(config: &LimiterConfig) -> Self {
        Self {
            second: WindowState::new(config.per_second),
            minute: WindowState::new(config.per_minute),
            hour: WindowState::new(config.per_hour),
            day: WindowState::new(config.per_day),
            month: WindowState::new(config.per_month),
        }
    }

    /// Get the state for a granularity.
    pub fn get(&self, granularity: Granularity) -> &WindowState {
        match granularity {
            Granularity::Second => &self.second,
            Granularity::Minute => &self.minute,
            Granularity::Hour => &self.hour,
            Granularity::Day => &self.day,
            Granularity::Month => &self.month,
        }
    }

    /// Get mutable state for a granularity.
    pub fn get_mut(&mut self, granularity: Granularity) -> &mut WindowState {
        match granularity {
            Granularity::Second => &mut self.second,
            Granularity::Minute => &mut self.minute,
            Granularity::Hour => &mut self.hour,
            Granularity::Day => &mut self.day,
            Granularity::Month => &mut self.month,
        }
    }

    /// Iterate over all granularities in check order.
    pub fn iter(&self) -> impl Iterator<Item = (Granularity, &WindowState)> + '_ {
        Granularity::ALL.into_iter().map(move |g| (g, self.get(g)))
    }

    /// Counts in check order, mostly for assertions.
    pub fn counts(&self) -> [u64; 5] {
        Granularity::ALL.map(|g| self.get(g).count)
    }
}

impl Index<Granularity> for Windows {
    type Output = WindowState;

    fn index(&self, granularity: Granularity) -> &WindowState {
        self.get(granularity)
    }
}
