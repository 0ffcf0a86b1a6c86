//! Scripted I2C bus and delay doubles for driver tests.
//!
//! `ScriptBus` checks every transaction a driver issues against an expected
//! script — address, direction, and written bytes — and feeds back canned
//! response bytes. Any step can be made to fail instead, which is how the
//! abort-on-first-failure contract is exercised: after a failed step the
//! cursor shows exactly how many transactions were attempted.

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{self, ErrorType, I2c, Operation};

/// The one fault the fake bus can produce. Stands in for NACK, arbitration
/// loss, and timeout alike; drivers must not care which.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault;

impl i2c::Error for BusFault {
    fn kind(&self) -> i2c::ErrorKind {
        i2c::ErrorKind::Other
    }
}

/// One expected bus transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expect {
    /// Plain addressed write of exactly these bytes.
    Write { addr: u8, bytes: Vec<u8> },
    /// Plain addressed read answered with these bytes.
    Read { addr: u8, response: Vec<u8> },
    /// Write followed by repeated-start read in one transaction.
    WriteRead {
        addr: u8,
        bytes: Vec<u8>,
        response: Vec<u8>,
    },
}

pub struct ScriptBus {
    script: Vec<Expect>,
    cursor: usize,
    fail_at: Option<usize>,
}

impl ScriptBus {
    pub fn new(script: Vec<Expect>) -> Self {
        Self {
            script,
            cursor: 0,
            fail_at: None,
        }
    }

    /// Like [`ScriptBus::new`], but transaction number `step` (zero-based)
    /// fails instead of executing.
    pub fn failing_at(script: Vec<Expect>, step: usize) -> Self {
        Self {
            script,
            cursor: 0,
            fail_at: Some(step),
        }
    }

    /// Number of transactions attempted so far, failed ones included.
    pub fn steps_taken(&self) -> usize {
        self.cursor
    }

    /// Whether the whole script has been consumed.
    pub fn done(&self) -> bool {
        self.cursor == self.script.len()
    }
}

impl ErrorType for ScriptBus {
    type Error = BusFault;
}

impl I2c for ScriptBus {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), BusFault> {
        let step = self.cursor;
        self.cursor += 1;

        if self.fail_at == Some(step) {
            return Err(BusFault);
        }

        let Some(expected) = self.script.get(step) else {
            panic!("unexpected bus transaction at step {step}: {operations:?}");
        };

        match (expected, &mut *operations) {
            (Expect::Write { addr, bytes }, [Operation::Write(data)]) => {
                assert_eq!(address, *addr, "wrong device address at step {step}");
                assert_eq!(*data, &bytes[..], "wrong write payload at step {step}");
            }
            (Expect::Read { addr, response }, [Operation::Read(buf)]) => {
                assert_eq!(address, *addr, "wrong device address at step {step}");
                assert_eq!(buf.len(), response.len(), "wrong read length at step {step}");
                buf.copy_from_slice(response);
            }
            (
                Expect::WriteRead {
                    addr,
                    bytes,
                    response,
                },
                [Operation::Write(data), Operation::Read(buf)],
            ) => {
                assert_eq!(address, *addr, "wrong device address at step {step}");
                assert_eq!(*data, &bytes[..], "wrong write payload at step {step}");
                assert_eq!(buf.len(), response.len(), "wrong read length at step {step}");
                buf.copy_from_slice(response);
            }
            (expected, issued) => {
                panic!("bus transaction mismatch at step {step}: expected {expected:?}, driver issued {issued:?}")
            }
        }

        Ok(())
    }
}

/// Delay double that completes immediately.
pub struct NopDelay;

impl DelayNs for NopDelay {
    async fn delay_ns(&mut self, _ns: u32) {}
}

/// Delay double that records every requested wait, in nanoseconds.
pub struct SpyDelay {
    log: Rc<RefCell<Vec<u32>>>,
}

impl SpyDelay {
    pub fn new() -> (Self, Rc<RefCell<Vec<u32>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let spy = Self {
            log: Rc::clone(&log),
        };
        (spy, log)
    }
}

impl DelayNs for SpyDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(ns);
    }

    async fn delay_us(&mut self, us: u32) {
        self.log.borrow_mut().push(us * 1_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(ms * 1_000_000);
    }
}
