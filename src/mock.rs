//! Recording bus and delay doubles for unit tests.
//!
//! [`MockI2c`] and [`MockDelay`] share one [`Recorder`], so a single event
//! log captures bus traffic and waits in the order they happened.

use core::cell::{Cell, RefCell};

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{ErrorKind, ErrorType, I2c, Operation};
use heapless::Vec;

use crate::registers::MODE1;

/// One recorded bus or delay event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Plain write: address and payload bytes.
    Write(u8, Vec<u8, 8>),
    /// Register read (`write_read`): address and register offset.
    Read(u8, u8),
    /// Delay request in nanoseconds.
    Delay(u32),
}

impl Event {
    pub fn write(address: u8, bytes: &[u8]) -> Self {
        Event::Write(address, Vec::from_slice(bytes).unwrap())
    }
}

/// Shared event log plus knobs for the simulated chip.
///
/// Register reads return `mode1` for MODE1 and 0 otherwise. Setting
/// `fail_at` makes the N-th bus transaction (0-based, counted over the
/// recorder's lifetime) return an error.
pub struct Recorder {
    events: RefCell<Vec<Event, 64>>,
    pub mode1: Cell<u8>,
    pub fail_at: Cell<Option<usize>>,
    transactions: Cell<usize>,
}

impl Recorder {
    pub fn new() -> Self {
        Self {
            events: RefCell::new(Vec::new()),
            mode1: Cell::new(0x00),
            fail_at: Cell::new(None),
            transactions: Cell::new(0),
        }
    }

    pub fn i2c(&self) -> MockI2c<'_> {
        MockI2c { recorder: self }
    }

    pub fn delay(&self) -> MockDelay<'_> {
        MockDelay { recorder: self }
    }

    pub fn events(&self) -> Vec<Event, 64> {
        self.events.borrow().clone()
    }

    /// Payloads of all plain writes, ignoring reads and delays.
    pub fn writes(&self) -> Vec<(u8, Vec<u8, 8>), 64> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Write(address, bytes) => Some((*address, bytes.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn delays(&self) -> Vec<u32, 8> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Delay(ns) => Some(*ns),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    fn record(&self, event: Event) -> Result<(), ErrorKind> {
        self.events
            .borrow_mut()
            .push(event)
            .map_err(|_| ErrorKind::Overrun)
    }
}

/// I2C bus that records every transaction into its [`Recorder`].
pub struct MockI2c<'a> {
    recorder: &'a Recorder,
}

impl ErrorType for MockI2c<'_> {
    type Error = ErrorKind;
}

impl I2c for MockI2c<'_> {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let index = self.recorder.transactions.get();
        self.recorder.transactions.set(index + 1);
        if self.recorder.fail_at.get() == Some(index) {
            return Err(ErrorKind::Other);
        }

        match operations {
            [Operation::Write(bytes)] => {
                let payload = Vec::from_slice(bytes).map_err(|_| ErrorKind::Overrun)?;
                self.recorder.record(Event::Write(address, payload))
            }
            [Operation::Write(register), Operation::Read(buffer)] => {
                let value = if register[0] == MODE1 {
                    self.recorder.mode1.get()
                } else {
                    0
                };
                buffer.fill(value);
                self.recorder.record(Event::Read(address, register[0]))
            }
            _ => Err(ErrorKind::Other),
        }
    }
}

/// Delay that records requested durations instead of waiting.
pub struct MockDelay<'a> {
    recorder: &'a Recorder,
}

impl DelayNs for MockDelay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        let _ = self.recorder.record(Event::Delay(ns));
    }
}
