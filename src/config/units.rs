//! Unit types for timing and microstepping.
//!
//! Provides type-safe representations of timestamps and microstep divisors
//! to prevent unit confusion at compile time.

use core::ops::{Add, Sub};

use serde::Deserialize;

use crate::error::ConfigError;

/// Monotonic timestamp or duration in microseconds.
///
/// Supplied by the caller's clock; the library never reads time itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Micros(pub u64);

impl Micros {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Create a new Micros value.
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Create from milliseconds.
    #[inline]
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms * 1_000)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Whole milliseconds, truncated.
    #[inline]
    pub const fn as_millis(self) -> u64 {
        self.0 / 1_000
    }
}

impl Add for Micros {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Micros {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

/// Microstep divisor (1, 2, 4, 8, 16, 32, 64, 128, 256).
///
/// Validated at construction to be a power of 2 within the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Microsteps(u16);

impl Microsteps {
    /// Full step (no microstepping).
    pub const FULL: Self = Self(1);
    /// Half step.
    pub const HALF: Self = Self(2);
    /// Quarter step.
    pub const QUARTER: Self = Self(4);
    /// Eighth step.
    pub const EIGHTH: Self = Self(8);
    /// Sixteenth step.
    pub const SIXTEENTH: Self = Self(16);
    /// Thirty-second step.
    pub const THIRTY_SECOND: Self = Self(32);
    /// Sixty-fourth step.
    pub const SIXTY_FOURTH: Self = Self(64);
    /// 128th step.
    pub const ONE_TWENTY_EIGHTH: Self = Self(128);
    /// 256th step (maximum resolution).
    pub const TWO_FIFTY_SIXTH: Self = Self(256);

    /// Valid microstep values.
    pub const VALID_VALUES: [u16; 9] = [1, 2, 4, 8, 16, 32, 64, 128, 256];

    /// Create a new Microsteps value with validation.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidMicrosteps` if the value is not a valid power of 2.
    pub fn new(value: u16) -> Result<Self, ConfigError> {
        if Self::VALID_VALUES.contains(&value) {
            Ok(Self(value))
        } else {
            Err(ConfigError::InvalidMicrosteps(value))
        }
    }

    /// Get the raw divisor value.
    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// CHOPCONF.MRES encoding: `8 - log2(divisor)`.
    #[inline]
    pub const fn mres(self) -> u8 {
        8 - self.0.trailing_zeros() as u8
    }

    /// Decode a CHOPCONF.MRES value. Values above 8 are invalid.
    pub fn from_mres(mres: u8) -> Option<Self> {
        if mres > 8 {
            None
        } else {
            Some(Self(1 << (8 - mres)))
        }
    }

    /// Check if a value is valid.
    #[inline]
    pub fn is_valid(value: u16) -> bool {
        Self::VALID_VALUES.contains(&value)
    }
}

impl Default for Microsteps {
    fn default() -> Self {
        Self::EIGHTH
    }
}

impl TryFrom<u16> for Microsteps {
    type Error = ConfigError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Microsteps {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use core::fmt::Write;
        let value = u16::deserialize(deserializer)?;
        Microsteps::new(value).map_err(|e| {
            let mut buf = heapless::String::<128>::new();
            let _ = write!(buf, "{}", e);
            serde::de::Error::custom(buf.as_str())
        })
    }
}

/// Extension trait for creating timestamps from primitives.
pub trait UnitExt {
    /// Interpret as microseconds.
    fn micros(self) -> Micros;
    /// Interpret as milliseconds.
    fn millis(self) -> Micros;
}

impl UnitExt for u64 {
    #[inline]
    fn micros(self) -> Micros {
        Micros(self)
    }

    #[inline]
    fn millis(self) -> Micros {
        Micros::from_millis(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_microsteps_valid_values() {
        for &v in &Microsteps::VALID_VALUES {
            assert!(Microsteps::new(v).is_ok());
        }
    }

    #[test]
    fn test_microsteps_invalid_values() {
        assert!(Microsteps::new(0).is_err());
        assert!(Microsteps::new(3).is_err());
        assert!(Microsteps::new(17).is_err());
        assert!(Microsteps::new(512).is_err());
    }

    #[test]
    fn test_mres_encoding() {
        assert_eq!(Microsteps::FULL.mres(), 8);
        assert_eq!(Microsteps::EIGHTH.mres(), 5);
        assert_eq!(Microsteps::SIXTEENTH.mres(), 4);
        assert_eq!(Microsteps::TWO_FIFTY_SIXTH.mres(), 0);

        for &v in &Microsteps::VALID_VALUES {
            let ms = Microsteps::new(v).unwrap();
            assert_eq!(Microsteps::from_mres(ms.mres()), Some(ms));
        }
        assert_eq!(Microsteps::from_mres(9), None);
    }

    #[test]
    fn test_micros_arithmetic() {
        assert_eq!(5u64.millis(), Micros(5_000));
        assert_eq!(Micros(1_500).as_millis(), 1);
        assert_eq!(Micros(10) - Micros(20), Micros::ZERO);
        assert_eq!(Micros(u64::MAX) + Micros(1), Micros(u64::MAX));
    }
}
