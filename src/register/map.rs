//! Register addresses.

use core::fmt;

/// Addressable driver registers.
///
/// Every address is below 0x80; bit 7 of the address byte is reserved for the
/// write flag in write frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// Global configuration flags.
    Gconf = 0x00,
    /// Global status flags (cleared on read).
    Gstat = 0x01,
    /// Interface transmission counter, incremented on every accepted write.
    Ifcnt = 0x02,
    /// Input pin states.
    Ioin = 0x06,
    /// Hold and run current with hold delay.
    IholdIrun = 0x10,
    /// Measured time between two microsteps.
    Tstep = 0x12,
    /// Lower velocity threshold for CoolStep and StallGuard.
    Tcoolthrs = 0x14,
    /// Internal pulse generator velocity. Zero hands control back to STEP/DIR.
    Vactual = 0x22,
    /// StallGuard threshold.
    Sgthrs = 0x40,
    /// StallGuard result.
    SgResult = 0x41,
    /// Microstep counter.
    Mscnt = 0x6A,
    /// Chopper and microstep resolution configuration.
    Chopconf = 0x6C,
    /// Driver status flags.
    DrvStatus = 0x6F,
}

impl Register {
    /// All known registers.
    pub const ALL: [Register; 13] = [
        Register::Gconf,
        Register::Gstat,
        Register::Ifcnt,
        Register::Ioin,
        Register::IholdIrun,
        Register::Tstep,
        Register::Tcoolthrs,
        Register::Vactual,
        Register::Sgthrs,
        Register::SgResult,
        Register::Mscnt,
        Register::Chopconf,
        Register::DrvStatus,
    ];

    /// Raw 7-bit address.
    #[inline]
    pub const fn addr(self) -> u8 {
        self as u8
    }

    /// Look up a register by raw address.
    pub fn from_addr(addr: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.addr() == addr)
    }

    /// Datasheet name.
    pub const fn name(self) -> &'static str {
        match self {
            Register::Gconf => "GCONF",
            Register::Gstat => "GSTAT",
            Register::Ifcnt => "IFCNT",
            Register::Ioin => "IOIN",
            Register::IholdIrun => "IHOLD_IRUN",
            Register::Tstep => "TSTEP",
            Register::Tcoolthrs => "TCOOLTHRS",
            Register::Vactual => "VACTUAL",
            Register::Sgthrs => "SGTHRS",
            Register::SgResult => "SG_RESULT",
            Register::Mscnt => "MSCNT",
            Register::Chopconf => "CHOPCONF",
            Register::DrvStatus => "DRVSTATUS",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:#04x})", self.name(), self.addr())
    }
}

impl From<Register> for u8 {
    fn from(r: Register) -> Self {
        r.addr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_addresses_leave_write_bit_clear() {
        for r in Register::ALL {
            assert_eq!(r.addr() & 0x80, 0, "{} uses the write bit", r.name());
        }
    }

    #[test]
    fn test_from_addr() {
        assert_eq!(Register::from_addr(0x6C), Some(Register::Chopconf));
        assert_eq!(Register::from_addr(0x02), Some(Register::Ifcnt));
        assert_eq!(Register::from_addr(0x7F), None);
    }
}
