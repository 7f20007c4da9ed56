//! Shared test doubles: a simulated driver on the serial bus and counting pins.

#![allow(dead_code)]

use std::collections::VecDeque;

use embedded_hal_mock::eh1::delay::NoopDelay;
use tmc_uart_motion::protocol::frame::{
    crc8, encode_read_transaction, READ_FRAME_LEN, WRITE_BIT, WRITE_FRAME_LEN,
};
use tmc_uart_motion::{BusConfig, MotionController, Register, SerialTransport, TmcUart};

/// Simulated driver answering on a single-wire bus.
///
/// Every transmitted byte is echoed back. Valid read requests are answered
/// from the register file; valid writes update it and bump IFCNT.
#[derive(Debug)]
pub struct FakeDriver {
    pub address: u8,
    pub registers: [i32; 128],
    pub ifcnt: u8,
    rx: VecDeque<u8>,

    /// Register writes that were applied, in order.
    pub writes: Vec<(Register, i32)>,
    /// Registers read, in order, including failed attempts.
    pub reads: Vec<Register>,
    /// Frames transmitted, of any kind.
    pub frames: usize,

    /// Ignore this many upcoming writes (no IFCNT increment).
    pub drop_writes: u32,
    /// Corrupt the checksum of this many upcoming replies.
    pub corrupt_replies: u32,
    /// Truncate this many upcoming replies.
    pub short_replies: u32,
    /// Never reply; only the echo comes back.
    pub silent: bool,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self {
            address: 0,
            registers: [0; 128],
            ifcnt: 0,
            rx: VecDeque::new(),
            writes: Vec::new(),
            reads: Vec::new(),
            frames: 0,
            drop_writes: 0,
            corrupt_replies: 0,
            short_replies: 0,
            silent: false,
        }
    }

    pub fn with_register(mut self, register: Register, value: i32) -> Self {
        self.registers[register.addr() as usize] = value;
        self
    }

    pub fn register(&self, register: Register) -> i32 {
        if register == Register::Ifcnt {
            self.ifcnt as i32
        } else {
            self.registers[register.addr() as usize]
        }
    }

    pub fn reads_of(&self, register: Register) -> usize {
        self.reads.iter().filter(|&&r| r == register).count()
    }

    pub fn writes_to(&self, register: Register) -> Vec<i32> {
        self.writes
            .iter()
            .filter(|(r, _)| *r == register)
            .map(|(_, v)| *v)
            .collect()
    }

    fn answer_read(&mut self, register: u8) {
        let Some(reg) = Register::from_addr(register) else {
            return;
        };
        self.reads.push(reg);
        if self.silent {
            return;
        }

        let mut reply = encode_read_transaction(self.address, register, self.register(reg));
        if self.corrupt_replies > 0 {
            self.corrupt_replies -= 1;
            reply[11] ^= 0xA5;
        }
        let mut len = reply.len();
        if self.short_replies > 0 {
            self.short_replies -= 1;
            len = 9;
        }
        self.rx.extend(&reply[READ_FRAME_LEN..len]);
    }

    fn accept_write(&mut self, register: u8, value: i32) {
        if self.drop_writes > 0 {
            self.drop_writes -= 1;
            return;
        }
        let Some(reg) = Register::from_addr(register) else {
            return;
        };
        self.registers[register as usize] = value;
        self.ifcnt = self.ifcnt.wrapping_add(1);
        self.writes.push((reg, value));
    }
}

impl Default for FakeDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialTransport for FakeDriver {
    type Error = core::convert::Infallible;

    fn clear_input(&mut self) -> Result<(), Self::Error> {
        self.rx.clear();
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        self.frames += 1;
        self.rx.extend(bytes);

        let len = bytes.len();
        if len < 2 || bytes[len - 1] != crc8(&bytes[..len - 1]) || bytes[1] != self.address {
            return Ok(len);
        }

        match len {
            READ_FRAME_LEN => self.answer_read(bytes[2]),
            WRITE_FRAME_LEN => {
                let value = i32::from_be_bytes([bytes[3], bytes[4], bytes[5], bytes[6]]);
                self.accept_write(bytes[2] & !WRITE_BIT, value);
            }
            _ => {}
        }
        Ok(len)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let n = buf.len().min(self.rx.len());
        for slot in buf.iter_mut().take(n) {
            *slot = self.rx.pop_front().unwrap_or(0);
        }
        Ok(n)
    }
}

/// Output pin that records levels and counts rising edges.
#[derive(Debug, Default)]
pub struct CountingPin {
    pub high: bool,
    pub rising_edges: u32,
}

impl embedded_hal::digital::ErrorType for CountingPin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for CountingPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        if !self.high {
            self.rising_edges += 1;
        }
        self.high = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }
}

pub type FakeController = MotionController<FakeDriver, NoopDelay, CountingPin, CountingPin>;

pub fn engine(driver: FakeDriver) -> TmcUart<FakeDriver, NoopDelay> {
    TmcUart::new(driver, NoopDelay::new(), &BusConfig::default()).unwrap()
}

pub fn controller(driver: FakeDriver) -> FakeController {
    MotionController::builder()
        .serial(driver)
        .delay(NoopDelay::new())
        .step_pin(CountingPin::default())
        .dir_pin(CountingPin::default())
        .build()
        .unwrap()
}

pub fn step_count(controller: &FakeController) -> u32 {
    controller_pins(controller).0.rising_edges
}

pub fn controller_pins(controller: &FakeController) -> (&CountingPin, &CountingPin) {
    controller.pins()
}
