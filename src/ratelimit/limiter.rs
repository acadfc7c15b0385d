//! Core rate limiter implementation.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, trace};

use super::counter::{Granularity, Windows};
use crate::clock::{Clock, SystemClock};
use crate::config::{LimiterConfig, TimeZonePolicy};

/// Multi-window request limiter.
///
/// Tracks admissions per second, minute, hour, calendar day and calendar
/// month, and rejects a request when any limited window is full. This struct
/// is thread-safe and meant to be shared across threads or tasks behind an
/// `Arc`.
#[derive(Debug)]
pub struct Limiter<C: Clock = SystemClock> {
    /// Per-granularity counters
    windows: RwLock<Windows>,
    /// Source of "now"
    clock: C,
    /// Zone used for day and month boundaries
    time_zone: TimeZonePolicy,
}

impl Limiter {
    /// Create a limiter driven by the system clock.
    pub fn new(config: LimiterConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Limiter<C> {
    /// Create a limiter driven by the given clock.
    pub fn with_clock(config: LimiterConfig, clock: C) -> Self {
        debug!(
            per_second = config.per_second,
            per_minute = config.per_minute,
            per_hour = config.per_hour,
            per_day = config.per_day,
            per_month = config.per_month,
            time_zone = %config.time_zone,
            "Creating limiter"
        );

        Self {
            windows: RwLock::new(Windows::from_config(&config)),
            clock,
            time_zone: config.time_zone,
        }
    }

    /// Try to admit one request.
    ///
    /// Returns `true` if every limited window had room, in which case the
    /// request is counted in all of them. Returns `false` otherwise and
    /// leaves every counter unchanged.
    pub fn is_free(&self) -> bool {
        let now = self.clock.now();
        trace!(now = %now, "Checking limits");
        let mut windows = self.windows.write();

        if let Some(granularity) = self.saturated(&windows, now) {
            debug!(granularity = %granularity, "Request rejected, window is full");
            return false;
        }

        for granularity in Granularity::ALL {
            let start = granularity.aligned_window_start(now, self.time_zone);
            if windows.get_mut(granularity).record(start) {
                trace!(granularity = %granularity, window_start = start, "Window rolled over");
            }
        }

        trace!(counts = ?windows.counts(), "Request admitted");
        true
    }

    /// Check whether a request made now would be rejected, without counting it.
    pub fn is_busy(&self) -> bool {
        let now = self.clock.now();
        trace!(now = %now, "Checking limits without admitting");
        let windows = self.windows.read();
        self.saturated(&windows, now).is_some()
    }

    /// Get a copy of the current per-granularity state.
    pub fn limits(&self) -> Windows {
        *self.windows.read()
    }

    /// Get the zone this limiter aligns windows in.
    pub fn time_zone(&self) -> TimeZonePolicy {
        self.time_zone
    }

    /// First granularity, in check order, whose current window is full.
    fn saturated(&self, windows: &Windows, now: DateTime<Utc>) -> Option<Granularity> {
        Granularity::ALL.into_iter().find(|granularity| {
            windows
                .get(*granularity)
                .is_saturated_at(granularity.aligned_window_start(now, self.time_zone))
        })
    }
}
