//! Typed views over the driver's status registers.

use serde::Serialize;

use crate::register::{drv_status, gconf, gstat, ioin, is_set};

/// Decoded GSTAT register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GlobalStatus {
    /// The driver has been reset since the last GSTAT read.
    pub reset: bool,
    /// The driver shut down on overtemperature or short circuit.
    pub driver_error: bool,
    /// Charge pump undervoltage; the driver is disabled while set.
    pub charge_pump_undervoltage: bool,
}

impl GlobalStatus {
    /// Decode a raw GSTAT value.
    pub fn from_register(value: i32) -> Self {
        Self {
            reset: is_set(value, gstat::RESET),
            driver_error: is_set(value, gstat::DRV_ERR),
            charge_pump_undervoltage: is_set(value, gstat::UV_CP),
        }
    }

    /// True when no flag is set.
    pub fn is_clear(&self) -> bool {
        !(self.reset || self.driver_error || self.charge_pump_undervoltage)
    }
}

/// Decoded DRVSTATUS register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriverStatus {
    /// Overtemperature pre-warning.
    pub overtemperature_warning: bool,
    /// Overtemperature shutdown.
    pub overtemperature: bool,
    /// Short to ground, phase A.
    pub short_to_ground_a: bool,
    /// Short to ground, phase B.
    pub short_to_ground_b: bool,
    /// Low-side short, phase A.
    pub short_to_supply_a: bool,
    /// Low-side short, phase B.
    pub short_to_supply_b: bool,
    /// Open load, phase A.
    pub open_load_a: bool,
    /// Open load, phase B.
    pub open_load_b: bool,
    /// Highest temperature threshold exceeded (120, 143, 150 or 157 °C), if any.
    pub temperature_threshold: Option<u8>,
    /// Actual current scale (0-31).
    pub current_scale: u8,
    /// StealthChop is active.
    pub stealth_chop: bool,
    /// Motor is at standstill.
    pub standstill: bool,
}

impl DriverStatus {
    /// Decode a raw DRVSTATUS value.
    pub fn from_register(value: i32) -> Self {
        let temperature_threshold = [
            (drv_status::T157, 157),
            (drv_status::T150, 150),
            (drv_status::T143, 143),
            (drv_status::T120, 120),
        ]
        .iter()
        .find(|(mask, _)| is_set(value, *mask))
        .map(|(_, t)| *t);

        Self {
            overtemperature_warning: is_set(value, drv_status::OTPW),
            overtemperature: is_set(value, drv_status::OT),
            short_to_ground_a: is_set(value, drv_status::S2GA),
            short_to_ground_b: is_set(value, drv_status::S2GB),
            short_to_supply_a: is_set(value, drv_status::S2VSA),
            short_to_supply_b: is_set(value, drv_status::S2VSB),
            open_load_a: is_set(value, drv_status::OLA),
            open_load_b: is_set(value, drv_status::OLB),
            temperature_threshold,
            current_scale: drv_status::CS_ACTUAL.get(value) as u8,
            stealth_chop: is_set(value, drv_status::STEALTH),
            standstill: is_set(value, drv_status::STST),
        }
    }

    /// Any condition that disables the bridges.
    pub fn has_fault(&self) -> bool {
        self.overtemperature
            || self.short_to_ground_a
            || self.short_to_ground_b
            || self.short_to_supply_a
            || self.short_to_supply_b
    }

    /// Conditions worth reporting that do not stop the driver.
    pub fn has_warning(&self) -> bool {
        self.overtemperature_warning || self.open_load_a || self.open_load_b
    }
}

/// Decoded IOIN register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IoPins {
    /// ENN pin level (high = bridges disabled).
    pub enable_n: bool,
    /// STEP pin level.
    pub step: bool,
    /// SPREAD pin level.
    pub spread: bool,
    /// DIR pin level.
    pub dir: bool,
}

impl IoPins {
    /// Decode a raw IOIN value.
    pub fn from_register(value: i32) -> Self {
        Self {
            enable_n: is_set(value, ioin::ENN),
            step: is_set(value, ioin::STEP),
            spread: is_set(value, ioin::SPREAD),
            dir: is_set(value, ioin::DIR),
        }
    }
}

/// Diagnostic snapshot returned by the motion controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriverSnapshot {
    /// Raw GCONF value.
    pub gconf: i32,
    /// Interface transmission counter.
    pub interface_tx_count: i32,
}

impl DriverSnapshot {
    /// Microstep resolution is taken from CHOPCONF rather than the MS pins.
    pub fn microsteps_from_register(&self) -> bool {
        is_set(self.gconf, gconf::MSTEP_REG_SELECT)
    }

    /// Motor direction is inverted in the driver.
    pub fn shaft_inverted(&self) -> bool {
        is_set(self.gconf, gconf::SHAFT)
    }

    /// SpreadCycle is selected instead of StealthChop.
    pub fn spread_cycle(&self) -> bool {
        is_set(self.gconf, gconf::EN_SPREADCYCLE)
    }
}

/// Outcome of a bus diagnostic pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusDiagnosis {
    /// GSTAT was read.
    Status(GlobalStatus),
    /// GSTAT could not be read either.
    NoResponse,
    /// A diagnostic pass was already running.
    InProgress,
}
