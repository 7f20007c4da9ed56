//! Register map for TMC22xx UART drivers.
//!
//! Register addresses, named bitfields and pure bit helpers. No I/O happens here.

mod fields;
mod map;

pub use fields::{chopconf, drv_status, gconf, gstat, ihold_irun, ioin, Field};
pub use map::Register;

/// Set the bits of `mask` in a raw register value.
#[inline]
pub const fn set_bit(value: i32, mask: u32) -> i32 {
    (value as u32 | mask) as i32
}

/// Clear the bits of `mask` in a raw register value.
#[inline]
pub const fn clear_bit(value: i32, mask: u32) -> i32 {
    (value as u32 & !mask) as i32
}

/// Check whether any bit of `mask` is set in a raw register value.
#[inline]
pub const fn is_set(value: i32, mask: u32) -> bool {
    value as u32 & mask != 0
}
