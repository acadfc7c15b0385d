//! Windowlimit - Multi-Window Request Rate Limiter
//!
//! This crate implements an in-process rate limiter that caps admissions per
//! second, minute, hour, calendar day and calendar month at the same time.
//! A request is admitted only if every limited window has room, and is then
//! counted in all of them.
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use windowlimit::{Limiter, LimiterConfig, ManualClock};
//!
//! let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap());
//! let limiter = Limiter::with_clock(LimiterConfig::new(2, 0, 0, 0, 0), clock.clone());
//!
//! assert!(limiter.is_free());
//! assert!(limiter.is_free());
//! assert!(!limiter.is_free());
//!
//! clock.advance(Duration::seconds(1));
//! assert!(limiter.is_free());
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod ratelimit;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{LimiterConfig, TimeZonePolicy};
pub use error::{LimitError, Result};
pub use ratelimit::{Granularity, Limiter, WindowState, Windows};
