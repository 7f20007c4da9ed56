//! Motor configuration from TOML.

use serde::Deserialize;

use super::units::Microsteps;

/// Largest IHOLD/IRUN current scale.
pub const MAX_CURRENT_SCALE: u8 = 31;

/// Largest IHOLDDELAY value.
pub const MAX_HOLD_DELAY: u8 = 15;

/// Motor defaults applied on every initialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MotorConfig {
    /// Full steps per revolution (200 for 1.8° motors).
    pub steps_per_revolution: u16,

    /// Microstep divisor written by `initialize`.
    pub microsteps: Microsteps,

    /// Hold current scale (0-31) written by `initialize`.
    pub hold_current: u8,

    /// Run current scale (0-31) written by `initialize`.
    pub run_current: u8,

    /// Delay before the driver drops to hold current (0-15).
    pub hold_delay: u8,

    /// Invert direction pin logic.
    pub invert_direction: bool,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            steps_per_revolution: 200,
            microsteps: Microsteps::EIGHTH,
            hold_current: 1,
            run_current: 1,
            hold_delay: 0,
            invert_direction: false,
        }
    }
}

impl MotorConfig {
    /// Microsteps per motor revolution.
    pub fn microsteps_per_revolution(&self) -> u32 {
        self.steps_per_revolution as u32 * self.microsteps.value() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MotorConfig::default();
        assert_eq!(config.steps_per_revolution, 200);
        assert_eq!(config.microsteps, Microsteps::EIGHTH);
        // 200 * 8 = 1600
        assert_eq!(config.microsteps_per_revolution(), 1600);
    }
}
