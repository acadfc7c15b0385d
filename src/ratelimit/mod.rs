//! Rate limiting logic and state management.

mod counter;
mod limiter;

pub use counter::{Granularity, WindowState, Windows};
pub use limiter::Limiter;
