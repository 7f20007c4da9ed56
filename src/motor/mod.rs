//! Motor module for tmc-uart-motion.
//!
//! Provides the motion controller that combines register configuration over
//! UART with STEP/DIR pulse generation.

mod builder;
mod controller;
mod mode;

pub use builder::MotionControllerBuilder;
pub use controller::{MotionController, PULSE_WIDTH_US};
pub use mode::MotionMode;
