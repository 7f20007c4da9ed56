//! Register protocol engine.
//!
//! Reads and writes driver registers over the shared single-wire bus, with
//! bounded retries, IFCNT write verification and GSTAT diagnostics.

use embedded_hal::delay::DelayNs;

use crate::config::BusConfig;
use crate::error::{ConfigError, ProtocolError};
use crate::register::Register;

use super::frame::{encode_read, encode_write, ReadReply, READ_REPLY_LEN};
use super::status::{BusDiagnosis, DriverStatus, GlobalStatus, IoPins};
use super::transport::SerialTransport;

/// Result type for register I/O.
pub type ProtocolResult<T> = core::result::Result<T, ProtocolError>;

/// Raw bytes from a diagnostic round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeReport {
    /// Read request that was sent.
    pub sent: [u8; 4],
    /// Bytes received, unvalidated.
    pub received: ReadReply,
}

/// Register protocol engine for one driver on the bus.
///
/// Owns the serial transport exclusively. All waits are blocking `DelayNs`
/// pauses of `500 / baudrate` seconds around each transaction.
pub struct TmcUart<S, D>
where
    S: SerialTransport,
    D: DelayNs,
{
    serial: S,
    delay: D,
    driver_addr: u8,
    baudrate: u32,
    max_tries: u8,
    /// Set while a GSTAT diagnostic read is running.
    diagnosing: bool,
}

impl<S, D> TmcUart<S, D>
where
    S: SerialTransport,
    D: DelayNs,
{
    /// Bind an engine to a transport.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the driver address is above 3 or the baudrate is zero.
    pub fn new(serial: S, delay: D, bus: &BusConfig) -> Result<Self, ConfigError> {
        bus.validate()?;
        Ok(Self {
            serial,
            delay,
            driver_addr: bus.driver_address,
            baudrate: bus.baudrate,
            max_tries: bus.max_tries,
            diagnosing: false,
        })
    }

    /// Driver address on the bus.
    #[inline]
    pub fn driver_address(&self) -> u8 {
        self.driver_addr
    }

    /// Configured baudrate.
    #[inline]
    pub fn baudrate(&self) -> u32 {
        self.baudrate
    }

    /// Default retry budget for `read_int` and `write_register_verified`.
    #[inline]
    pub fn max_tries(&self) -> u8 {
        self.max_tries
    }

    /// Change the default retry budget.
    pub fn set_max_tries(&mut self, max_tries: u8) {
        self.max_tries = max_tries;
    }

    /// Pause applied around each transaction, in microseconds.
    #[inline]
    pub fn communication_pause_us(&self) -> u32 {
        500_000_000 / self.baudrate
    }

    /// Borrow the transport.
    pub fn transport(&self) -> &S {
        &self.serial
    }

    /// Mutably borrow the transport.
    pub fn transport_mut(&mut self) -> &mut S {
        &mut self.serial
    }

    /// Delay provider, shared with step pulse generation.
    pub(crate) fn delay_mut(&mut self) -> &mut D {
        &mut self.delay
    }

    /// Release the transport and delay provider.
    pub fn release(self) -> (S, D) {
        (self.serial, self.delay)
    }

    /// Drop any stale bytes waiting on the bus.
    pub fn flush_input(&mut self) -> ProtocolResult<()> {
        self.serial.clear_input().map_err(|_| {
            error!("serial transport error while clearing input");
            ProtocolError::Transport
        })
    }

    fn pause(&mut self) {
        let us = self.communication_pause_us();
        self.delay.delay_us(us);
    }

    fn transmit(&mut self, register: Register, frame: &[u8]) -> ProtocolResult<()> {
        self.flush_input()?;
        let written = self.serial.write(frame).map_err(|_| {
            error!("serial transport error writing {}", register);
            ProtocolError::Transport
        })?;
        if written != frame.len() {
            error!("short write to {}: {} of {} bytes", register, written, frame.len());
            return Err(ProtocolError::IoFailure {
                register,
                expected: frame.len(),
                written,
            });
        }
        Ok(())
    }

    /// Run one read transaction and return the raw 12 bytes (echo + reply).
    ///
    /// The reply is not validated here; see [`read_int`](Self::read_int).
    pub fn read_register(&mut self, register: Register) -> ProtocolResult<ReadReply> {
        let frame = encode_read(self.driver_addr, register.addr());
        self.transmit(register, &frame)?;
        self.pause();

        let mut bytes = [0u8; READ_REPLY_LEN];
        let mut len = 0;
        while len < READ_REPLY_LEN {
            let n = self.serial.read(&mut bytes[len..]).map_err(|_| {
                error!("serial transport error reading {}", register);
                ProtocolError::Transport
            })?;
            if n == 0 {
                break;
            }
            len += n;
        }

        self.pause();
        Ok(ReadReply::new(bytes, len))
    }

    /// Read a register value with the default retry budget.
    pub fn read_int(&mut self, register: Register) -> ProtocolResult<i32> {
        self.read_int_with_tries(register, self.max_tries)
    }

    /// Read a register value, making one attempt plus up to `max_tries` retries.
    ///
    /// A reply is accepted when it is 12 bytes long, not all zeros and its
    /// checksum matches. Exhaustion runs [`handle_bus_error`](Self::handle_bus_error)
    /// before returning `ReadExhausted`.
    pub fn read_int_with_tries(&mut self, register: Register, max_tries: u8) -> ProtocolResult<i32> {
        let attempts = max_tries.saturating_add(1);
        let mut last = ReadReply::new([0; READ_REPLY_LEN], 0);

        for attempt in 1..=attempts {
            let outcome = self
                .read_register(register)
                .and_then(|reply| {
                    last = reply;
                    reply.validate(register).map(|()| reply.value())
                });

            match outcome {
                Ok(value) => {
                    trace!("read {} = {:#x}", register, value);
                    return Ok(value);
                }
                Err(e) => warn!("read {} attempt {}/{}: {}", register, attempt, attempts, e),
            }
        }

        error!("no valid reply from {} after {} attempts", register, attempts);
        debug!("sent: {:?}", encode_read(self.driver_addr, register.addr()));
        debug!("last reply: {:?}", last.as_bytes());
        self.handle_bus_error();
        Err(ProtocolError::ReadExhausted { register, attempts })
    }

    /// Write a register without verification.
    pub fn write_register(&mut self, register: Register, value: i32) -> ProtocolResult<()> {
        let frame = encode_write(self.driver_addr, register.addr(), value);
        debug!("write {} = {:#x}", register, value);
        self.transmit(register, &frame)?;
        self.pause();
        Ok(())
    }

    /// Write a register and confirm it through IFCNT, with the default retry budget.
    pub fn write_register_verified(&mut self, register: Register, value: i32) -> ProtocolResult<()> {
        self.write_register_verified_with_tries(register, value, self.max_tries)
    }

    /// Write a register and confirm it through IFCNT.
    ///
    /// IFCNT is an 8-bit counter; a starting value of 255 is treated as -1 so the
    /// wrap to 0 still counts as an increment. A write whose counter did not
    /// strictly increase is repeated, up to `max_tries` times.
    pub fn write_register_verified_with_tries(
        &mut self,
        register: Register,
        value: i32,
        max_tries: u8,
    ) -> ProtocolResult<()> {
        let mut before = self.read_int(Register::Ifcnt)?;
        if before == 255 {
            before = -1;
        }

        let attempts = max_tries.saturating_add(1);
        for attempt in 1..=attempts {
            if let Err(e) = self.write_register(register, value) {
                warn!("write {} attempt {}/{}: {}", register, attempt, attempts, e);
                continue;
            }

            let after = self.read_int(Register::Ifcnt)?;
            if after > before {
                return Ok(());
            }
            warn!(
                "write {} not acknowledged, attempt {}/{} (ifcnt {} -> {})",
                register, attempt, attempts, before, after
            );
        }

        error!(
            "write of {:#x} to {} not acknowledged after {} attempts",
            value, register, attempts
        );
        self.handle_bus_error();
        Err(ProtocolError::WriteExhausted {
            register,
            value,
            attempts,
        })
    }

    /// Read-modify-write a register with verification. Returns the value written.
    pub fn modify_register<F>(&mut self, register: Register, f: F) -> ProtocolResult<i32>
    where
        F: FnOnce(i32) -> i32,
    {
        let current = self.read_int(register)?;
        let updated = f(current);
        self.write_register_verified(register, updated)?;
        Ok(updated)
    }

    /// Read GSTAT and log any flagged condition.
    ///
    /// Purely diagnostic: the failed operation is not retried. A call made while
    /// another diagnostic pass is running returns `InProgress` immediately.
    pub fn handle_bus_error(&mut self) -> BusDiagnosis {
        if self.diagnosing {
            return BusDiagnosis::InProgress;
        }
        self.diagnosing = true;

        let diagnosis = match self.read_int(Register::Gstat) {
            Ok(raw) => {
                let status = GlobalStatus::from_register(raw);
                if status.is_clear() {
                    info!("GSTAT check: no flags set");
                }
                if status.reset {
                    warn!("GSTAT check: driver has been reset since the last GSTAT read");
                }
                if status.driver_error {
                    error!("GSTAT check: driver shut down on overtemperature or short circuit");
                }
                if status.charge_pump_undervoltage {
                    error!("GSTAT check: charge pump undervoltage, driver disabled");
                }
                BusDiagnosis::Status(status)
            }
            Err(_) => {
                error!("GSTAT check: no response from driver");
                BusDiagnosis::NoResponse
            }
        };

        self.diagnosing = false;
        diagnosis
    }

    /// Send a read request and return the raw exchange without validation.
    pub fn probe(&mut self, register: Register) -> ProtocolResult<ProbeReport> {
        let sent = encode_read(self.driver_addr, register.addr());
        info!("probe {}: sending {:?}", register, sent);
        let received = self.read_register(register)?;
        info!(
            "probe {}: received {} bytes {:?}",
            register,
            received.len(),
            received.as_bytes()
        );
        Ok(ProbeReport { sent, received })
    }

    /// Read and decode GSTAT.
    pub fn read_global_status(&mut self) -> ProtocolResult<GlobalStatus> {
        self.read_int(Register::Gstat).map(GlobalStatus::from_register)
    }

    /// Read and decode DRVSTATUS.
    pub fn read_driver_status(&mut self) -> ProtocolResult<DriverStatus> {
        self.read_int(Register::DrvStatus).map(DriverStatus::from_register)
    }

    /// Read and decode IOIN.
    pub fn read_io_pins(&mut self) -> ProtocolResult<IoPins> {
        self.read_int(Register::Ioin).map(IoPins::from_register)
    }
}
