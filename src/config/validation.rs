//! Configuration validation.

use crate::error::{ConfigError, Result};

use super::motor::{MAX_CURRENT_SCALE, MAX_HOLD_DELAY};
use super::{BusConfig, DriverConfig, MotorConfig};

/// Validate a driver configuration.
///
/// Checks:
/// - Driver address is 0-3 and baudrate is non-zero
/// - Steps per revolution is non-zero
/// - Hold/run currents are 0-31 and hold delay is 0-15
///
/// Microsteps are validated while parsing.
pub fn validate_config(config: &DriverConfig) -> Result<()> {
    validate_bus(&config.bus)?;
    validate_motor(&config.motor)?;
    Ok(())
}

fn validate_bus(config: &BusConfig) -> Result<()> {
    config.validate()?;
    Ok(())
}

fn validate_motor(config: &MotorConfig) -> Result<()> {
    if config.steps_per_revolution == 0 {
        return Err(ConfigError::InvalidStepsPerRevolution(config.steps_per_revolution).into());
    }

    validate_current(config.hold_current)?;
    validate_current(config.run_current)?;
    validate_hold_delay(config.hold_delay)?;

    Ok(())
}

/// Check an IHOLD/IRUN current scale.
pub fn validate_current(scale: u8) -> core::result::Result<(), ConfigError> {
    if scale > MAX_CURRENT_SCALE {
        return Err(ConfigError::InvalidCurrent(scale));
    }
    Ok(())
}

/// Check an IHOLDDELAY value.
pub fn validate_hold_delay(delay: u8) -> core::result::Result<(), ConfigError> {
    if delay > MAX_HOLD_DELAY {
        return Err(ConfigError::InvalidHoldDelay(delay));
    }
    Ok(())
}
