//! Step rate calculation.
//!
//! Converts a target speed in RPM into the interval between step pulses for
//! the current microstep resolution.

use serde::Serialize;

use crate::config::units::{Micros, Microsteps};

/// Direction of motor motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Positive step count (DIR high unless inverted).
    Forward,
    /// Negative step count.
    Reverse,
}

impl Direction {
    /// Get direction from signed step count.
    #[inline]
    pub fn from_steps(steps: i32) -> Self {
        if steps >= 0 {
            Direction::Forward
        } else {
            Direction::Reverse
        }
    }

    /// DIR pin level for this direction.
    #[inline]
    pub fn pin_level(self, inverted: bool) -> bool {
        match self {
            Direction::Forward => !inverted,
            Direction::Reverse => inverted,
        }
    }
}

/// Step pulse rate derived from RPM, microstep divisor and motor steps per revolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRate {
    rpm: u32,
    microsteps: Microsteps,
    steps_per_revolution: u16,
}

impl StepRate {
    /// Create a step rate.
    pub fn new(rpm: u32, microsteps: Microsteps, steps_per_revolution: u16) -> Self {
        Self {
            rpm,
            microsteps,
            steps_per_revolution,
        }
    }

    /// Target speed.
    #[inline]
    pub fn rpm(&self) -> u32 {
        self.rpm
    }

    /// Microstep divisor used for the calculation.
    #[inline]
    pub fn microsteps(&self) -> Microsteps {
        self.microsteps
    }

    /// Microsteps per minute.
    fn steps_per_minute(&self) -> u64 {
        self.rpm as u64 * self.steps_per_revolution as u64 * self.microsteps.value() as u64
    }

    /// Microsteps per second.
    pub fn steps_per_second(&self) -> f32 {
        self.steps_per_minute() as f32 / 60.0
    }

    /// Interval between pulses, truncated to whole microseconds.
    ///
    /// `None` when the rate is zero.
    pub fn interval(&self) -> Option<Micros> {
        match self.steps_per_minute() {
            0 => None,
            per_minute => Some(Micros(60_000_000 / per_minute)),
        }
    }

    /// Interval between pulses in milliseconds. Zero when the rate is zero.
    pub fn delay_ms(&self) -> f32 {
        let per_second = self.steps_per_second();
        if per_second > 0.0 {
            1000.0 / per_second
        } else {
            0.0
        }
    }

    /// Same rate at another microstep resolution.
    pub fn with_microsteps(self, microsteps: Microsteps) -> Self {
        Self { microsteps, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_steps() {
        assert_eq!(Direction::from_steps(10), Direction::Forward);
        assert_eq!(Direction::from_steps(0), Direction::Forward);
        assert_eq!(Direction::from_steps(-1), Direction::Reverse);
    }

    #[test]
    fn test_direction_pin_level() {
        assert!(Direction::Forward.pin_level(false));
        assert!(!Direction::Reverse.pin_level(false));
        assert!(!Direction::Forward.pin_level(true));
        assert!(Direction::Reverse.pin_level(true));
    }

    #[test]
    fn test_sixty_rpm_eighth_step() {
        let rate = StepRate::new(60, Microsteps::EIGHTH, 200);
        assert_eq!(rate.interval(), Some(Micros(625)));
        assert_eq!(rate.delay_ms(), 0.625);
        assert_eq!(rate.steps_per_second(), 1600.0);
    }

    #[test]
    fn test_thirty_rpm_sixteenth_step() {
        let rate = StepRate::new(30, Microsteps::SIXTEENTH, 200);
        assert_eq!(rate.interval(), Some(Micros(625)));

        let rate = rate.with_microsteps(Microsteps::EIGHTH);
        assert_eq!(rate.interval(), Some(Micros(1250)));
    }

    #[test]
    fn test_zero_rpm_has_no_interval() {
        let rate = StepRate::new(0, Microsteps::EIGHTH, 200);
        assert_eq!(rate.interval(), None);
        assert_eq!(rate.delay_ms(), 0.0);
    }
}
