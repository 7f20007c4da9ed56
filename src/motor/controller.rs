//! Motion controller.
//!
//! Owns the register engine and the STEP/DIR pins. Register configuration goes
//! over UART; step pulses are generated on the pins from `poll_step`, which the
//! caller invokes once per tick with its own monotonic timestamp.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::units::{Micros, Microsteps};
use crate::config::{validate_current, validate_hold_delay, MotorConfig};
use crate::error::{MotorError, Result};
use crate::motion::{Direction, StepRate, StepSchedule};
use crate::protocol::{DriverSnapshot, DriverStatus, SerialTransport, TmcUart};
use crate::register::{chopconf, clear_bit, gconf, ihold_irun, set_bit, Register};

use super::builder::MotionControllerBuilder;
use super::mode::MotionMode;

/// STEP pulse high time in microseconds.
pub const PULSE_WIDTH_US: u32 = 2;

/// Stepper motion controller for one driver.
///
/// Generic over:
/// - `S`: serial transport (must implement `SerialTransport`)
/// - `D`: delay provider (must implement `DelayNs`)
/// - `STEP`: STEP pin type (must implement `OutputPin`)
/// - `DIR`: DIR pin type (must implement `OutputPin`)
pub struct MotionController<S, D, STEP, DIR>
where
    S: SerialTransport,
    D: DelayNs,
    STEP: OutputPin,
    DIR: OutputPin,
{
    /// Register engine.
    uart: TmcUart<S, D>,

    /// STEP pin (one pulse per microstep).
    step_pin: STEP,

    /// DIR pin (high = forward, unless inverted).
    dir_pin: DIR,

    /// Motor defaults.
    config: MotorConfig,

    mode: MotionMode,

    /// Pending steps of the current move.
    schedule: StepSchedule,

    /// Steps requested by the last `move_steps`.
    commanded_steps: i32,

    /// Direction of the last move, if any.
    direction: Option<Direction>,

    /// Target speed of the last move.
    rpm: u32,

    microsteps: Microsteps,
    hold_current: u8,
    run_current: u8,
    hold_delay: u8,

    /// Hold current is applied at standstill.
    hold_enabled: bool,
}

impl<S, D, STEP, DIR> MotionController<S, D, STEP, DIR>
where
    S: SerialTransport,
    D: DelayNs,
    STEP: OutputPin,
    DIR: OutputPin,
{
    /// Create a builder.
    pub fn builder() -> MotionControllerBuilder<S, D, STEP, DIR> {
        MotionControllerBuilder::new()
    }

    /// Wrap an engine and two pins. No bus traffic happens until
    /// [`initialize`](Self::initialize) or [`configure`](Self::configure).
    pub fn new(uart: TmcUart<S, D>, step_pin: STEP, dir_pin: DIR, config: MotorConfig) -> Self {
        Self {
            uart,
            step_pin,
            dir_pin,
            microsteps: config.microsteps,
            hold_delay: config.hold_delay,
            config,
            mode: MotionMode::Idle,
            schedule: StepSchedule::idle(),
            commanded_steps: 0,
            direction: None,
            rpm: 0,
            hold_current: 0,
            run_current: 0,
            hold_enabled: true,
        }
    }

    // ---- accessors ----

    /// Current motion mode.
    #[inline]
    pub fn mode(&self) -> MotionMode {
        self.mode
    }

    /// Steps still to be pulsed by `poll_step`.
    #[inline]
    pub fn remaining_steps(&self) -> u32 {
        self.schedule.remaining()
    }

    /// Signed step count of the last `move_steps`.
    #[inline]
    pub fn commanded_steps(&self) -> i32 {
        self.commanded_steps
    }

    /// Direction of the last move.
    #[inline]
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Target speed of the last move.
    #[inline]
    pub fn rpm(&self) -> u32 {
        self.rpm
    }

    /// Delay between step pulses in milliseconds at the current speed.
    pub fn step_delay_ms(&self) -> f32 {
        self.step_rate().delay_ms()
    }

    /// Deadline of the next step pulse.
    #[inline]
    pub fn next_due(&self) -> Option<Micros> {
        self.schedule.next_due()
    }

    /// Microstep divisor last written to the driver.
    #[inline]
    pub fn microsteps(&self) -> Microsteps {
        self.microsteps
    }

    /// Configured hold current scale.
    #[inline]
    pub fn hold_current(&self) -> u8 {
        self.hold_current
    }

    /// Configured run current scale.
    #[inline]
    pub fn run_current(&self) -> u8 {
        self.run_current
    }

    /// Configured hold delay.
    #[inline]
    pub fn hold_delay(&self) -> u8 {
        self.hold_delay
    }

    /// Whether the hold current is applied at standstill.
    #[inline]
    pub fn hold_enabled(&self) -> bool {
        self.hold_enabled
    }

    /// Motor defaults.
    #[inline]
    pub fn config(&self) -> &MotorConfig {
        &self.config
    }

    /// Borrow the register engine.
    pub fn uart(&self) -> &TmcUart<S, D> {
        &self.uart
    }

    /// Mutably borrow the register engine.
    pub fn uart_mut(&mut self) -> &mut TmcUart<S, D> {
        &mut self.uart
    }

    /// Borrow the STEP and DIR pins.
    pub fn pins(&self) -> (&STEP, &DIR) {
        (&self.step_pin, &self.dir_pin)
    }

    /// Release the engine and pins.
    pub fn release(self) -> (TmcUart<S, D>, STEP, DIR) {
        (self.uart, self.step_pin, self.dir_pin)
    }

    fn step_rate(&self) -> StepRate {
        StepRate::new(self.rpm, self.microsteps, self.config.steps_per_revolution)
    }

    // ---- driver configuration ----

    /// Apply the configured hold/run currents and microstep resolution.
    pub fn initialize(&mut self) -> Result<()> {
        info!(
            "initializing driver {}: hold {}, run {}, 1/{} steps",
            self.uart.driver_address(),
            self.config.hold_current,
            self.config.run_current,
            self.config.microsteps.value()
        );
        self.configure(
            self.config.hold_current,
            self.config.run_current,
            self.config.microsteps.value(),
        )
    }

    /// Set currents and microstep resolution.
    ///
    /// Arguments are validated before any register is touched. Writes
    /// IHOLD_IRUN, then CHOPCONF.MRES, then sets GCONF.mstep_reg_select.
    pub fn configure(&mut self, hold_current: u8, run_current: u8, microsteps: u16) -> Result<()> {
        let microsteps = Microsteps::new(microsteps)?;
        validate_current(hold_current)?;
        validate_current(run_current)?;

        self.set_current(hold_current, run_current, self.hold_delay)?;
        self.set_microsteps(microsteps)?;
        self.set_microstep_register_select(true)?;
        Ok(())
    }

    /// Write IHOLD_IRUN.
    pub fn set_current(&mut self, hold_current: u8, run_current: u8, hold_delay: u8) -> Result<()> {
        validate_current(hold_current)?;
        validate_current(run_current)?;
        validate_hold_delay(hold_delay)?;

        let applied_hold = if self.hold_enabled { hold_current } else { 0 };
        self.write_currents(applied_hold, run_current, hold_delay)?;

        self.hold_current = hold_current;
        self.run_current = run_current;
        self.hold_delay = hold_delay;
        Ok(())
    }

    fn write_currents(&mut self, hold: u8, run: u8, delay: u8) -> Result<()> {
        let mut value = ihold_irun::IHOLD.set(0, hold as u32);
        value = ihold_irun::IRUN.set(value, run as u32);
        value = ihold_irun::IHOLDDELAY.set(value, delay as u32);

        debug!("IHOLD_IRUN: hold {}, run {}, delay {}", hold, run, delay);
        self.uart.write_register_verified(Register::IholdIrun, value)?;
        Ok(())
    }

    /// Write CHOPCONF.MRES for `microsteps`, preserving the other fields.
    ///
    /// A move in progress continues at the new resolution's interval.
    pub fn set_microsteps(&mut self, microsteps: Microsteps) -> Result<()> {
        let mres = microsteps.mres();
        self.uart
            .modify_register(Register::Chopconf, |v| chopconf::MRES.set(v, mres as u32))?;

        debug!("microsteps: 1/{} (MRES {})", microsteps.value(), mres);
        self.microsteps = microsteps;

        if let Some(interval) = self.step_rate().interval() {
            self.schedule.retime(interval);
        }
        Ok(())
    }

    /// Select whether the microstep resolution comes from CHOPCONF.MRES
    /// (`true`) or from the MS1/MS2 pins.
    pub fn set_microstep_register_select(&mut self, enabled: bool) -> Result<()> {
        self.uart.modify_register(Register::Gconf, |v| {
            if enabled {
                set_bit(v, gconf::MSTEP_REG_SELECT)
            } else {
                clear_bit(v, gconf::MSTEP_REG_SELECT)
            }
        })?;
        Ok(())
    }

    /// Enable or release the standstill hold current.
    ///
    /// The run current and hold delay are rewritten unchanged.
    pub fn set_hold(&mut self, enabled: bool) -> Result<()> {
        let hold = if enabled { self.hold_current } else { 0 };
        self.write_currents(hold, self.run_current, self.hold_delay)?;
        self.hold_enabled = enabled;
        info!("hold current {}", if enabled { "enabled" } else { "released" });
        Ok(())
    }

    // ---- motion ----

    /// Start a relative move of `steps` microsteps at `rpm`.
    ///
    /// Any pending steps are discarded. The first pulse is emitted immediately
    /// and counts as one of the `steps`; the rest are pulsed by
    /// [`poll_step`](Self::poll_step). With `rpm == 0` exactly one pulse is
    /// emitted and nothing is scheduled.
    ///
    /// # Errors
    ///
    /// `MotorError::InvalidState` while the driver is velocity controlled.
    pub fn move_steps(&mut self, steps: i32, rpm: u32, now: Micros) -> Result<()> {
        if self.mode == MotionMode::DeviceVelocityControlled {
            warn!("move rejected in {} mode", self.mode.name());
            return Err(MotorError::InvalidState {
                mode: self.mode.name(),
            }
            .into());
        }

        self.schedule.cancel();
        self.mode = MotionMode::Idle;
        self.commanded_steps = steps;
        self.rpm = rpm;

        if steps == 0 {
            return Ok(());
        }

        let direction = Direction::from_steps(steps);
        self.set_direction(direction)?;
        self.pulse()?;

        let pending = steps.unsigned_abs() - 1;
        let rate = self.step_rate();
        match rate.interval() {
            Some(interval) if pending > 0 => {
                self.schedule = StepSchedule::start(pending, interval, now);
                self.mode = MotionMode::Moving;
                debug!(
                    "move {} steps at {} rpm, interval {} us",
                    steps,
                    rpm,
                    interval.value()
                );
            }
            _ => debug!("single step move"),
        }
        Ok(())
    }

    /// Emit the next step if it is due.
    ///
    /// Returns `true` when a pulse was emitted. Does nothing unless
    /// the mode is `Moving`.
    pub fn poll_step(&mut self, now: Micros) -> Result<bool> {
        if !self.mode.is_moving() || !self.schedule.is_due(now) {
            return Ok(false);
        }

        self.pulse()?;
        if self.schedule.advance(now) == 0 {
            self.mode = MotionMode::Idle;
            debug!("move of {} steps complete", self.commanded_steps);
        }
        Ok(true)
    }

    /// Cancel any motion.
    ///
    /// In velocity mode VACTUAL is zeroed first; if that write fails the mode
    /// is left unchanged.
    pub fn stop(&mut self) -> Result<()> {
        if self.mode == MotionMode::DeviceVelocityControlled {
            self.uart.write_register_verified(Register::Vactual, 0)?;
        }
        if self.mode != MotionMode::Idle {
            info!("stopped with {} steps pending", self.schedule.remaining());
        }
        self.schedule.cancel();
        self.mode = MotionMode::Idle;
        Ok(())
    }

    /// Move at a constant velocity using the driver's pulse generator.
    ///
    /// Pending steps are discarded. `velocity` is written to VACTUAL as is;
    /// zero stops the motor.
    pub fn run_continuous(&mut self, velocity: i32) -> Result<()> {
        self.schedule.cancel();
        if self.mode == MotionMode::Moving {
            self.mode = MotionMode::Idle;
        }

        self.uart.write_register_verified(Register::Vactual, velocity)?;

        self.mode = if velocity != 0 {
            MotionMode::DeviceVelocityControlled
        } else {
            MotionMode::Idle
        };
        info!("VACTUAL = {}", velocity);
        Ok(())
    }

    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        let result = if direction.pin_level(self.config.invert_direction) {
            self.dir_pin.set_high()
        } else {
            self.dir_pin.set_low()
        };
        result.map_err(|_| MotorError::PinError)?;
        self.direction = Some(direction);
        Ok(())
    }

    fn pulse(&mut self) -> Result<()> {
        self.step_pin.set_high().map_err(|_| MotorError::PinError)?;
        self.uart.delay_mut().delay_us(PULSE_WIDTH_US);
        self.step_pin.set_low().map_err(|_| MotorError::PinError)?;
        Ok(())
    }

    // ---- diagnostics ----

    /// Read GCONF and IFCNT.
    pub fn read_status(&mut self) -> Result<DriverSnapshot> {
        let gconf = self.uart.read_int(Register::Gconf)?;
        let interface_tx_count = self.uart.read_int(Register::Ifcnt)?;
        Ok(DriverSnapshot {
            gconf,
            interface_tx_count,
        })
    }

    /// Read and decode DRVSTATUS.
    pub fn read_driver_status(&mut self) -> Result<DriverStatus> {
        let status = self.uart.read_driver_status()?;
        if status.has_fault() {
            error!("driver reports a fault: {:?}", status);
        } else if status.has_warning() {
            warn!("driver reports a warning: {:?}", status);
        }
        Ok(status)
    }
}
