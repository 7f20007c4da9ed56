//! Named bitfields for the bitfield registers.

/// A multi-bit field inside a 32-bit register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Position of the lowest bit.
    pub shift: u8,
    /// Width in bits.
    pub width: u8,
}

impl Field {
    /// Create a field descriptor.
    pub const fn new(shift: u8, width: u8) -> Self {
        Self { shift, width }
    }

    /// Mask covering the field in place.
    #[inline]
    pub const fn mask(self) -> u32 {
        (((1u64 << self.width) - 1) as u32) << self.shift
    }

    /// Extract the field from a raw register value.
    #[inline]
    pub const fn get(self, value: i32) -> u32 {
        (value as u32 & self.mask()) >> self.shift
    }

    /// Replace the field in a raw register value. Excess high bits of `field` are dropped.
    #[inline]
    pub const fn set(self, value: i32, field: u32) -> i32 {
        ((value as u32 & !self.mask()) | ((field << self.shift) & self.mask())) as i32
    }
}

/// GCONF bits.
#[allow(missing_docs)]
pub mod gconf {
    pub const I_SCALE_ANALOG: u32 = 1 << 0;
    pub const INTERNAL_RSENSE: u32 = 1 << 1;
    pub const EN_SPREADCYCLE: u32 = 1 << 2;
    pub const SHAFT: u32 = 1 << 3;
    pub const INDEX_OTPW: u32 = 1 << 4;
    pub const INDEX_STEP: u32 = 1 << 5;
    pub const PDN_DISABLE: u32 = 1 << 6;
    /// Microstep resolution comes from CHOPCONF.MRES instead of the MS1/MS2 pins.
    pub const MSTEP_REG_SELECT: u32 = 1 << 7;
}

/// GSTAT bits.
#[allow(missing_docs)]
pub mod gstat {
    /// The driver has been reset since the last GSTAT read.
    pub const RESET: u32 = 1 << 0;
    /// Shut down due to overtemperature or short circuit.
    pub const DRV_ERR: u32 = 1 << 1;
    /// Charge pump undervoltage.
    pub const UV_CP: u32 = 1 << 2;
}

/// CHOPCONF bits and fields.
#[allow(missing_docs)]
pub mod chopconf {
    use super::Field;

    pub const TOFF: Field = Field::new(0, 4);
    pub const VSENSE: u32 = 1 << 17;
    pub const MRES0: u32 = 1 << 24;
    pub const MRES1: u32 = 1 << 25;
    pub const MRES2: u32 = 1 << 26;
    pub const MRES3: u32 = 1 << 27;
    /// Microstep resolution, encoded as `8 - log2(divisor)`.
    pub const MRES: Field = Field::new(24, 4);
    pub const INTPOL: u32 = 1 << 28;
}

/// IOIN bits.
#[allow(missing_docs)]
pub mod ioin {
    pub const ENN: u32 = 1 << 0;
    pub const STEP: u32 = 1 << 7;
    pub const SPREAD: u32 = 1 << 8;
    pub const DIR: u32 = 1 << 9;
}

/// DRVSTATUS bits and fields.
#[allow(missing_docs)]
pub mod drv_status {
    use super::Field;

    pub const OTPW: u32 = 1 << 0;
    pub const OT: u32 = 1 << 1;
    pub const S2GA: u32 = 1 << 2;
    pub const S2GB: u32 = 1 << 3;
    pub const S2VSA: u32 = 1 << 4;
    pub const S2VSB: u32 = 1 << 5;
    pub const OLA: u32 = 1 << 6;
    pub const OLB: u32 = 1 << 7;
    pub const T120: u32 = 1 << 8;
    pub const T143: u32 = 1 << 9;
    pub const T150: u32 = 1 << 10;
    pub const T157: u32 = 1 << 11;
    pub const CS_ACTUAL: Field = Field::new(16, 5);
    pub const STEALTH: u32 = 1 << 30;
    pub const STST: u32 = 1 << 31;
}

/// IHOLD_IRUN fields.
#[allow(missing_docs)]
pub mod ihold_irun {
    use super::Field;

    pub const IHOLD: Field = Field::new(0, 5);
    pub const IRUN: Field = Field::new(8, 5);
    pub const IHOLDDELAY: Field = Field::new(16, 4);
}
