//! # tmc-uart-motion
//!
//! Stepper motor control for TMC22xx drivers over single-wire UART, with
//! embedded-hal 1.0 support.
//!
//! ## Features
//!
//! - **Register protocol**: CRC-8 framed reads and writes with bounded retries
//! - **Verified writes**: Every configuration write is confirmed through IFCNT
//! - **Bus diagnostics**: GSTAT is read and logged when retries run out
//! - **embedded-hal 1.0**: Uses `OutputPin` for STEP/DIR, `DelayNs` for timing
//! - **Non-blocking stepping**: `poll_step(now)` emits pulses from the caller's tick
//! - **no_std compatible**: Core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tmc_uart_motion::{IoTransport, MotionController, UnitExt};
//!
//! let config = tmc_uart_motion::load_config("driver.toml")?;
//!
//! let mut motor = MotionController::builder()
//!     .from_config(&config)
//!     .serial(IoTransport::new(uart))
//!     .delay(delay)
//!     .step_pin(step_pin)
//!     .dir_pin(dir_pin)
//!     .build()?;
//!
//! motor.initialize()?;
//! motor.move_steps(-100, 30, clock.now_us().micros())?;
//!
//! loop {
//!     motor.poll_step(clock.now_us().micros())?;
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `defmt`: Routes logging to defmt instead of the `log` facade

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

// Must come first so the logging macros are visible to every module
mod fmt;

// Core modules
pub mod command;
pub mod config;
pub mod error;
pub mod motion;
pub mod motor;
pub mod protocol;
pub mod register;

// Re-exports for ergonomic API
pub use command::{execute, Command, CommandReply};
pub use config::{validate_config, BusConfig, DriverConfig, MotorConfig};
pub use error::{ConfigError, Error, MotorError, ProtocolError, Result};
pub use motion::{Direction, StepRate, StepSchedule};
pub use motor::{MotionController, MotionControllerBuilder, MotionMode};
pub use protocol::{
    BusDiagnosis, DriverSnapshot, DriverStatus, GlobalStatus, IoPins, IoTransport, SerialTransport,
    TmcUart,
};
pub use register::Register;

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{Micros, Microsteps, UnitExt};
