//! Frame codec for the single-wire UART protocol.
//!
//! Read request (4 bytes): `sync, driver address, register, crc`.
//! Write request (8 bytes): `sync, driver address, register | 0x80, data[4], crc`.
//! A read transaction returns 12 bytes: the echoed request followed by the
//! 8-byte reply `sync, master address, register, data[4], crc`.

use crate::error::ProtocolError;
use crate::register::Register;

/// Sync byte leading every frame.
pub const SYNC_BYTE: u8 = 0x55;

/// Write flag in the register byte.
pub const WRITE_BIT: u8 = 0x80;

/// Read request length.
pub const READ_FRAME_LEN: usize = 4;

/// Write request length.
pub const WRITE_FRAME_LEN: usize = 8;

/// Bytes read back per read transaction (echo + reply).
pub const READ_REPLY_LEN: usize = 12;

/// Offset of the reply within a read transaction.
const REPLY_OFFSET: usize = READ_FRAME_LEN;

/// Offset of the 4 data bytes within a read transaction.
const DATA_OFFSET: usize = 7;

/// CRC-8 with polynomial 0x07 and initial value 0, as computed by the driver.
///
/// Feedback is the CRC's top bit XOR the current data bit, with data bits taken
/// least-significant first.
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        let mut byte = byte;
        for _ in 0..8 {
            crc = if ((crc >> 7) ^ (byte & 0x01)) != 0 {
                (crc << 1) ^ 0x07
            } else {
                crc << 1
            };
            byte >>= 1;
        }
    }
    crc
}

/// Build a read request frame.
///
/// `register` must be below 0x80; in release builds the write bit is masked off.
pub fn encode_read(driver_addr: u8, register: u8) -> [u8; READ_FRAME_LEN] {
    debug_assert!(register & WRITE_BIT == 0, "register address uses the write bit");
    let mut frame = [SYNC_BYTE, driver_addr, register & !WRITE_BIT, 0];
    frame[3] = crc8(&frame[..3]);
    frame
}

/// Build a write request frame with `value` packed big-endian.
///
/// `register` must be below 0x80. Values wider than 32 bits must be truncated by the caller.
pub fn encode_write(driver_addr: u8, register: u8, value: i32) -> [u8; WRITE_FRAME_LEN] {
    debug_assert!(register & WRITE_BIT == 0, "register address uses the write bit");
    let mut frame = [0u8; WRITE_FRAME_LEN];
    frame[0] = SYNC_BYTE;
    frame[1] = driver_addr;
    frame[2] = register | WRITE_BIT;
    frame[3..7].copy_from_slice(&value.to_be_bytes());
    frame[7] = crc8(&frame[..7]);
    frame
}

/// Bytes received for one read transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadReply {
    bytes: [u8; READ_REPLY_LEN],
    len: usize,
}

impl ReadReply {
    /// Wrap a transaction buffer of which `len` bytes were received.
    pub fn new(bytes: [u8; READ_REPLY_LEN], len: usize) -> Self {
        Self {
            bytes,
            len: len.min(READ_REPLY_LEN),
        }
    }

    /// Received bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Number of bytes received.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when nothing was received.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check length, content and checksum of the reply.
    pub fn validate(&self, register: Register) -> Result<(), ProtocolError> {
        let received = self.as_bytes();
        if self.len < READ_REPLY_LEN || received.iter().all(|&b| b == 0) {
            return Err(ProtocolError::ShortReply {
                register,
                received: self.len,
            });
        }

        let expected = crc8(&self.bytes[REPLY_OFFSET..READ_REPLY_LEN - 1]);
        let carried = self.bytes[READ_REPLY_LEN - 1];
        if expected != carried {
            return Err(ProtocolError::ChecksumMismatch {
                register,
                expected,
                received: carried,
            });
        }

        Ok(())
    }

    /// Data bytes unpacked as a big-endian signed value. Only meaningful after [`validate`](Self::validate).
    pub fn value(&self) -> i32 {
        let mut data = [0u8; 4];
        data.copy_from_slice(&self.bytes[DATA_OFFSET..DATA_OFFSET + 4]);
        i32::from_be_bytes(data)
    }
}

/// Build the 12 bytes a driver would return for a read of `register` holding `value`.
///
/// Used by tests and by host-side simulators.
pub fn encode_read_transaction(driver_addr: u8, register: u8, value: i32) -> [u8; READ_REPLY_LEN] {
    let mut bytes = [0u8; READ_REPLY_LEN];
    bytes[..READ_FRAME_LEN].copy_from_slice(&encode_read(driver_addr, register));
    bytes[4] = SYNC_BYTE;
    bytes[5] = 0xFF;
    bytes[6] = register;
    bytes[7..11].copy_from_slice(&value.to_be_bytes());
    bytes[11] = crc8(&bytes[REPLY_OFFSET..READ_REPLY_LEN - 1]);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc8_empty_is_zero() {
        assert_eq!(crc8(&[]), 0);
    }

    #[test]
    fn test_crc8_single_bits() {
        // Data bits are consumed LSB first, so 0x01 feeds a one on the first shift.
        assert_eq!(crc8(&[0x01]), 0x89);
        assert_eq!(crc8(&[0x80]), 0x07);
        assert_eq!(crc8(&[0x00]), 0);
    }

    #[test]
    fn test_encode_read_layout() {
        let frame = encode_read(2, Register::Ifcnt.addr());
        assert_eq!(frame[0], SYNC_BYTE);
        assert_eq!(frame[1], 2);
        assert_eq!(frame[2], 0x02);
        assert_eq!(frame[3], crc8(&frame[..3]));
    }

    #[test]
    fn test_encode_write_layout() {
        let frame = encode_write(0, Register::Chopconf.addr(), 0x1500_0053);
        assert_eq!(frame[0], SYNC_BYTE);
        assert_eq!(frame[1], 0);
        assert_eq!(frame[2], 0x6C | 0x80);
        assert_eq!(&frame[3..7], &[0x15, 0x00, 0x00, 0x53]);
        assert_eq!(frame[7], crc8(&frame[..7]));
    }

    #[test]
    fn test_encode_write_negative_value() {
        let frame = encode_write(0, Register::Vactual.addr(), -1);
        assert_eq!(&frame[3..7], &[0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_reply_valid() {
        let bytes = encode_read_transaction(0, Register::Gconf.addr(), 0x1C1);
        let reply = ReadReply::new(bytes, bytes.len());
        assert!(reply.validate(Register::Gconf).is_ok());
        assert_eq!(reply.value(), 0x1C1);
    }

    #[test]
    fn test_reply_short() {
        let bytes = encode_read_transaction(0, Register::Gconf.addr(), 7);
        let reply = ReadReply::new(bytes, 8);
        assert_eq!(
            reply.validate(Register::Gconf),
            Err(ProtocolError::ShortReply {
                register: Register::Gconf,
                received: 8
            })
        );
    }

    #[test]
    fn test_reply_all_zero_is_short() {
        let reply = ReadReply::new([0; READ_REPLY_LEN], READ_REPLY_LEN);
        assert!(matches!(
            reply.validate(Register::Ifcnt),
            Err(ProtocolError::ShortReply { received: 12, .. })
        ));
    }

    #[test]
    fn test_reply_corrupt_crc() {
        let mut bytes = encode_read_transaction(0, Register::Ifcnt.addr(), 4);
        bytes[11] ^= 0x5A;
        let reply = ReadReply::new(bytes, READ_REPLY_LEN);
        assert!(matches!(
            reply.validate(Register::Ifcnt),
            Err(ProtocolError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_reply_negative_value() {
        let bytes = encode_read_transaction(0, Register::DrvStatus.addr(), i32::MIN);
        let reply = ReadReply::new(bytes, READ_REPLY_LEN);
        assert!(reply.validate(Register::DrvStatus).is_ok());
        assert_eq!(reply.value(), i32::MIN);
    }
}
