//! Driver configuration - root configuration structure.

use serde::Deserialize;

use super::bus::BusConfig;
use super::motor::MotorConfig;

/// Root configuration structure from TOML.
///
/// Every section and field is optional; missing values take the defaults the
/// driver is reconfigured with on each start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Serial bus settings.
    pub bus: BusConfig,

    /// Motor defaults.
    pub motor: MotorConfig,
}
