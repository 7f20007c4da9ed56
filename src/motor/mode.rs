//! Motion modes.

use core::fmt;

use serde::Serialize;

/// What the controller is currently doing.
///
/// `DeviceVelocityControlled` means the driver's internal pulse generator is
/// running from VACTUAL; host-side stepping is disabled until `stop()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionMode {
    /// No motion pending.
    #[default]
    Idle,
    /// Step pulses are being generated by `poll_step`.
    Moving,
    /// The driver is moving the motor at a VACTUAL velocity.
    DeviceVelocityControlled,
}

impl MotionMode {
    /// Mode name for display/debugging.
    pub fn name(self) -> &'static str {
        match self {
            MotionMode::Idle => "Idle",
            MotionMode::Moving => "Moving",
            MotionMode::DeviceVelocityControlled => "DeviceVelocityControlled",
        }
    }

    /// True when the host is generating pulses.
    #[inline]
    pub fn is_moving(self) -> bool {
        self == MotionMode::Moving
    }
}

impl fmt::Display for MotionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
