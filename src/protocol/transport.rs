//! Serial transport seam.
//!
//! The driver shares one wire for TX and RX, so everything written comes back
//! as an echo ahead of the reply. The engine accounts for that; transports only
//! move bytes.

use embedded_io::{Read, ReadReady, Write};

/// Half-duplex byte transport used by the register engine.
pub trait SerialTransport {
    /// Transport error type.
    type Error: core::fmt::Debug;

    /// Drop any bytes waiting in the receive buffer.
    fn clear_input(&mut self) -> Result<(), Self::Error>;

    /// Transmit `bytes`, returning how many were accepted.
    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error>;

    /// Read up to `buf.len()` bytes, returning how many arrived before the
    /// transport ran dry. Must not block indefinitely on a silent line.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<T: SerialTransport + ?Sized> SerialTransport for &mut T {
    type Error = T::Error;

    fn clear_input(&mut self) -> Result<(), Self::Error> {
        T::clear_input(self)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        T::write(self, bytes)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        T::read(self, buf)
    }
}

/// Adapter over an `embedded-io` UART.
///
/// Reads only consume bytes that are already buffered (`ReadReady`), so a
/// driver that never answers produces a short reply instead of a hang.
pub struct IoTransport<U> {
    uart: U,
}

impl<U> IoTransport<U>
where
    U: Read + Write + ReadReady,
{
    /// Wrap a UART.
    pub fn new(uart: U) -> Self {
        Self { uart }
    }

    /// Release the UART.
    pub fn into_inner(self) -> U {
        self.uart
    }
}

impl<U> SerialTransport for IoTransport<U>
where
    U: Read + Write + ReadReady,
{
    type Error = U::Error;

    fn clear_input(&mut self) -> Result<(), Self::Error> {
        let mut scratch = [0u8; 16];
        while self.uart.read_ready()? {
            if self.uart.read(&mut scratch)? == 0 {
                break;
            }
        }
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        let mut written = 0;
        while written < bytes.len() {
            let n = self.uart.write(&bytes[written..])?;
            if n == 0 {
                break;
            }
            written += n;
        }
        self.uart.flush()?;
        Ok(written)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut filled = 0;
        while filled < buf.len() && self.uart.read_ready()? {
            let n = self.uart.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        Ok(filled)
    }
}
