//! Serial bus configuration.

use serde::Deserialize;

use crate::error::ConfigError;

/// Highest driver address selectable with the MS1/MS2 pins.
pub const MAX_DRIVER_ADDRESS: u8 = 3;

/// Serial bus settings for one driver.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// UART baudrate.
    pub baudrate: u32,

    /// Driver address on the bus (0-3).
    pub driver_address: u8,

    /// Retries after the first failed attempt of a register read or verified write.
    pub max_tries: u8,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            baudrate: 115_200,
            driver_address: 0,
            max_tries: 10,
        }
    }
}

impl BusConfig {
    /// Check address and baudrate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.driver_address > MAX_DRIVER_ADDRESS {
            return Err(ConfigError::InvalidDriverAddress(self.driver_address));
        }
        if self.baudrate == 0 {
            return Err(ConfigError::InvalidBaudrate(self.baudrate));
        }
        Ok(())
    }
}
