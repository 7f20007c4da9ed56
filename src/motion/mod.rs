//! Motion module for tmc-uart-motion.
//!
//! Provides step rate calculation and step scheduling.

mod rate;
mod schedule;

pub use rate::{Direction, StepRate};
pub use schedule::StepSchedule;
