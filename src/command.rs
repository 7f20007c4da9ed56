//! Command surface.
//!
//! Maps the outer application's command set onto [`MotionController`] calls.
//! Every command produces a reply; failures are rendered as text.

use core::fmt::{self, Write};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use serde::{Deserialize, Serialize};

use crate::config::units::Micros;
use crate::motor::MotionController;
use crate::protocol::{DriverSnapshot, SerialTransport};

/// Reply text capacity.
pub const REPLY_CAPACITY: usize = 64;

/// A command from the outer application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Apply the default currents and microstep resolution.
    Init,
    /// Set microstep resolution, and hold and run current to `current`.
    Configure {
        /// Microstep divisor.
        #[serde(default = "default_one_u16")]
        microsteps: u16,
        /// Current scale for both hold and run.
        #[serde(default = "default_one_u8")]
        current: u8,
    },
    /// Relative move.
    Move {
        /// Signed microstep count.
        steps: i32,
        /// Speed; 0 emits a single pulse.
        rpm: u32,
    },
    /// Run at a VACTUAL velocity; 0 stops.
    Run {
        /// VACTUAL value.
        speed: i32,
    },
    /// Apply or release the standstill hold current.
    Hold {
        /// Hold current on.
        enabled: bool,
    },
    /// Read GCONF and IFCNT.
    Status,
    /// Cancel any motion.
    Stop,
}

fn default_one_u16() -> u16 {
    1
}

fn default_one_u8() -> u8 {
    1
}

/// Reply to a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandReply {
    /// Status line or error message.
    Text(heapless::String<REPLY_CAPACITY>),
    /// Diagnostic snapshot.
    Status(DriverSnapshot),
}

impl CommandReply {
    /// Text reply, truncated to [`REPLY_CAPACITY`].
    pub fn text(args: fmt::Arguments<'_>) -> Self {
        let mut out = Truncating(heapless::String::new());
        let _ = out.write_fmt(args);
        CommandReply::Text(out.0)
    }

    /// Text content, if this is a text reply.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CommandReply::Text(s) => Some(s.as_str()),
            CommandReply::Status(_) => None,
        }
    }

    /// True for error replies.
    pub fn is_error(&self) -> bool {
        self.as_text().is_some_and(|s| s.starts_with("ERROR"))
    }
}

struct Truncating(heapless::String<REPLY_CAPACITY>);

impl Write for Truncating {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Run one command against a controller.
pub fn execute<S, D, STEP, DIR>(
    controller: &mut MotionController<S, D, STEP, DIR>,
    command: Command,
    now: Micros,
) -> CommandReply
where
    S: SerialTransport,
    D: DelayNs,
    STEP: OutputPin,
    DIR: OutputPin,
{
    debug!("command: {:?}", command);

    let result = match command {
        Command::Init => controller
            .initialize()
            .map(|()| CommandReply::text(format_args!("Motor init OK"))),
        Command::Configure {
            microsteps,
            current,
        } => controller
            .configure(current, current, microsteps)
            .map(|()| CommandReply::text(format_args!("OK"))),
        Command::Move { steps, rpm } => controller
            .move_steps(steps, rpm, now)
            .map(|()| CommandReply::text(format_args!("OK"))),
        Command::Run { speed } => controller
            .run_continuous(speed)
            .map(|()| CommandReply::text(format_args!("OK"))),
        Command::Hold { enabled } => controller
            .set_hold(enabled)
            .map(|()| CommandReply::text(format_args!("Motor set to hold {}", enabled as u8))),
        Command::Status => controller.read_status().map(CommandReply::Status),
        Command::Stop => controller
            .stop()
            .map(|()| CommandReply::text(format_args!("OK"))),
    };

    result.unwrap_or_else(|e| {
        warn!("command failed: {:?}", e);
        CommandReply::text(format_args!("ERROR: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_reply_truncates() {
        let long = "x".repeat(100);
        let reply = CommandReply::text(format_args!("ERROR: {}", long));
        let text = reply.as_text().unwrap();
        assert_eq!(text.len(), REPLY_CAPACITY);
        assert!(reply.is_error());
    }

    #[test]
    fn test_status_reply_has_no_text() {
        let reply = CommandReply::Status(DriverSnapshot::default());
        assert_eq!(reply.as_text(), None);
        assert!(!reply.is_error());
    }
}
