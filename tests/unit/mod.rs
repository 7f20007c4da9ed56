//! Unit test harness for tmc-uart-motion.
//!
//! This module organizes configuration tests that go through the public API.

mod config_parsing;
mod config_validation;
