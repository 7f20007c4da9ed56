//! Configuration module for tmc-uart-motion.
//!
//! Provides typed bus and motor defaults, loaded from TOML files (with `std`
//! feature) or built in code.

mod bus;
mod driver;
mod motor;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use bus::{BusConfig, MAX_DRIVER_ADDRESS};
pub use driver::DriverConfig;
pub use motor::{MotorConfig, MAX_CURRENT_SCALE, MAX_HOLD_DELAY};
pub use validation::{validate_config, validate_current, validate_hold_delay};

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Micros, Microsteps};
