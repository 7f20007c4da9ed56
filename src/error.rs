//! Error types for tmc-uart-motion.
//!
//! Provides unified error handling across the register protocol, motor control and configuration.

use core::fmt;

use crate::register::Register;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all tmc-uart-motion operations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Register protocol error
    Protocol(ProtocolError),
    /// Motor operation error
    Motor(MotorError),
    /// Configuration or precondition violation
    Config(ConfigError),
}

/// Register protocol errors.
///
/// `ShortReply` and `ChecksumMismatch` describe a single failed attempt and are
/// retried inside the engine; callers only see the `*Exhausted` variants once the
/// retry budget is spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// The transport accepted fewer bytes than the frame length
    IoFailure {
        /// Register addressed by the frame
        register: Register,
        /// Frame length
        expected: usize,
        /// Bytes actually transmitted
        written: usize,
    },
    /// The underlying serial transport reported an error
    Transport,
    /// Reply was shorter than a full transaction or contained only zeros
    ShortReply {
        /// Register that was read
        register: Register,
        /// Bytes received
        received: usize,
    },
    /// Reply checksum did not match its contents
    ChecksumMismatch {
        /// Register that was read
        register: Register,
        /// CRC computed over the reply
        expected: u8,
        /// CRC byte carried by the reply
        received: u8,
    },
    /// No valid reply after the retry budget was spent
    ReadExhausted {
        /// Register that was read
        register: Register,
        /// Attempts made
        attempts: u8,
    },
    /// The interface counter never acknowledged the write
    WriteExhausted {
        /// Register that was written
        register: Register,
        /// Value that was written
        value: i32,
        /// Attempts made
        attempts: u8,
    },
}

/// Motor operation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorError {
    /// Pin operation failed
    PinError,
    /// Motor is in the wrong mode for the requested operation
    InvalidState {
        /// Name of the current motion mode
        mode: &'static str,
    },
}

/// Configuration errors and precondition violations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Invalid microstep value (must be power of 2: 1, 2, 4, 8, 16, 32, 64, 128, 256)
    InvalidMicrosteps(u16),
    /// Current scale outside 0-31
    InvalidCurrent(u8),
    /// Hold delay outside 0-15
    InvalidHoldDelay(u8),
    /// Driver address outside 0-3
    InvalidDriverAddress(u8),
    /// Baudrate must be non-zero
    InvalidBaudrate(u32),
    /// Steps per revolution must be non-zero
    InvalidStepsPerRevolution(u16),
    /// A required builder input was not supplied
    MissingField(&'static str),
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Protocol(e) => write!(f, "Protocol error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::IoFailure {
                register,
                expected,
                written,
            } => write!(
                f,
                "Short write to {}: {} of {} bytes transmitted",
                register, written, expected
            ),
            ProtocolError::Transport => write!(f, "Serial transport failure"),
            ProtocolError::ShortReply { register, received } => {
                write!(f, "Short reply from {}: {} of 12 bytes", register, received)
            }
            ProtocolError::ChecksumMismatch {
                register,
                expected,
                received,
            } => write!(
                f,
                "CRC mismatch reading {}: expected {:#04x}, got {:#04x}",
                register, expected, received
            ),
            ProtocolError::ReadExhausted { register, attempts } => {
                write!(f, "No valid reply from {} after {} attempts", register, attempts)
            }
            ProtocolError::WriteExhausted {
                register,
                value,
                attempts,
            } => write!(
                f,
                "Write of {:#x} to {} not acknowledged after {} attempts",
                value, register, attempts
            ),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError => write!(f, "GPIO pin operation failed"),
            MotorError::InvalidState { mode } => write!(f, "Invalid motor state: {}", mode),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidMicrosteps(v) => {
                write!(f, "Invalid microsteps: {}. Valid values: 1, 2, 4, 8, 16, 32, 64, 128, 256", v)
            }
            ConfigError::InvalidCurrent(v) => write!(f, "Invalid current scale: {}. Must be 0-31", v),
            ConfigError::InvalidHoldDelay(v) => write!(f, "Invalid hold delay: {}. Must be 0-15", v),
            ConfigError::InvalidDriverAddress(v) => {
                write!(f, "Invalid driver address: {}. Must be 0-3", v)
            }
            ConfigError::InvalidBaudrate(v) => write!(f, "Invalid baudrate: {}. Must be > 0", v),
            ConfigError::InvalidStepsPerRevolution(v) => {
                write!(f, "Invalid steps per revolution: {}. Must be > 0", v)
            }
            ConfigError::MissingField(name) => write!(f, "Missing required field: {}", name),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

// Conversion impls
impl From<ProtocolError> for Error {
    fn from(e: ProtocolError) -> Self {
        Error::Protocol(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ProtocolError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
