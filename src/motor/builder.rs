//! Builder pattern for MotionController.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::Microsteps;
use crate::config::{validate_config, BusConfig, DriverConfig, MotorConfig};
use crate::error::{ConfigError, Error, Result};
use crate::protocol::{SerialTransport, TmcUart};

use super::controller::MotionController;

/// Builder for creating MotionController instances.
pub struct MotionControllerBuilder<S, D, STEP, DIR>
where
    S: SerialTransport,
    D: DelayNs,
    STEP: OutputPin,
    DIR: OutputPin,
{
    serial: Option<S>,
    delay: Option<D>,
    step_pin: Option<STEP>,
    dir_pin: Option<DIR>,
    bus: BusConfig,
    motor: MotorConfig,
}

impl<S, D, STEP, DIR> Default for MotionControllerBuilder<S, D, STEP, DIR>
where
    S: SerialTransport,
    D: DelayNs,
    STEP: OutputPin,
    DIR: OutputPin,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S, D, STEP, DIR> MotionControllerBuilder<S, D, STEP, DIR>
where
    S: SerialTransport,
    D: DelayNs,
    STEP: OutputPin,
    DIR: OutputPin,
{
    /// Create a new builder with default bus and motor settings.
    pub fn new() -> Self {
        Self {
            serial: None,
            delay: None,
            step_pin: None,
            dir_pin: None,
            bus: BusConfig::default(),
            motor: MotorConfig::default(),
        }
    }

    /// Set the serial transport.
    pub fn serial(mut self, serial: S) -> Self {
        self.serial = Some(serial);
        self
    }

    /// Set the delay provider.
    pub fn delay(mut self, delay: D) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the STEP pin.
    pub fn step_pin(mut self, pin: STEP) -> Self {
        self.step_pin = Some(pin);
        self
    }

    /// Set the DIR pin.
    pub fn dir_pin(mut self, pin: DIR) -> Self {
        self.dir_pin = Some(pin);
        self
    }

    /// Set the driver address (0-3).
    pub fn driver_address(mut self, address: u8) -> Self {
        self.bus.driver_address = address;
        self
    }

    /// Set the bus baudrate.
    pub fn baudrate(mut self, baudrate: u32) -> Self {
        self.bus.baudrate = baudrate;
        self
    }

    /// Set the default retry budget.
    pub fn max_tries(mut self, max_tries: u8) -> Self {
        self.bus.max_tries = max_tries;
        self
    }

    /// Set the default microstep resolution.
    pub fn microsteps(mut self, microsteps: Microsteps) -> Self {
        self.motor.microsteps = microsteps;
        self
    }

    /// Set the default hold and run current scales.
    pub fn currents(mut self, hold: u8, run: u8) -> Self {
        self.motor.hold_current = hold;
        self.motor.run_current = run;
        self
    }

    /// Set direction inversion.
    pub fn invert_direction(mut self, invert: bool) -> Self {
        self.motor.invert_direction = invert;
        self
    }

    /// Configure from a BusConfig.
    pub fn from_bus_config(mut self, config: &BusConfig) -> Self {
        self.bus = config.clone();
        self
    }

    /// Configure from a MotorConfig.
    pub fn from_motor_config(mut self, config: &MotorConfig) -> Self {
        self.motor = config.clone();
        self
    }

    /// Configure from a DriverConfig.
    pub fn from_config(self, config: &DriverConfig) -> Self {
        self.from_bus_config(&config.bus).from_motor_config(&config.motor)
    }

    /// Build the MotionController.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing or the settings are invalid.
    pub fn build(self) -> Result<MotionController<S, D, STEP, DIR>> {
        let serial = self
            .serial
            .ok_or(Error::Config(ConfigError::MissingField("serial")))?;
        let delay = self
            .delay
            .ok_or(Error::Config(ConfigError::MissingField("delay")))?;
        let step_pin = self
            .step_pin
            .ok_or(Error::Config(ConfigError::MissingField("step_pin")))?;
        let dir_pin = self
            .dir_pin
            .ok_or(Error::Config(ConfigError::MissingField("dir_pin")))?;

        let config = DriverConfig {
            bus: self.bus,
            motor: self.motor,
        };
        validate_config(&config)?;

        let uart = TmcUart::new(serial, delay, &config.bus)?;
        Ok(MotionController::new(uart, step_pin, dir_pin, config.motor))
    }
}
