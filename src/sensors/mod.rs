//! Sensor traits and the shared driver error type.

#[cfg(feature = "sensor-am2301b")]
pub mod am2301b;
#[cfg(feature = "sensor-ltr390")]
pub mod ltr390;

#[cfg(feature = "sensor-am2301b")]
pub use am2301b::{Am2301b, Am2301bReadings};
#[cfg(feature = "sensor-ltr390")]
pub use ltr390::{Calibration, Ltr390, Ltr390Readings};

use thiserror_no_std::Error;

/// Error shared by every driver operation.
///
/// The original firmware collapsed everything into a single FAIL code; the
/// enum keeps that contract (callers only need `is_ok`) while preserving the
/// cause for logging and leaving room for more variants later.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SensorError<E> {
    /// The bus transport reported a NACK, arbitration loss, or timeout.
    #[error("i2c transaction failed")]
    Bus(E),
    /// The device answered the status probe but its calibration bits were
    /// not set.
    #[error("sensor not calibrated (status byte {status:#04x})")]
    NotCalibrated { status: u8 },
}

impl<E> From<E> for SensorError<E> {
    fn from(e: E) -> Self {
        Self::Bus(e)
    }
}

/// Trait for sensor reading data structures.
/// Provides compile-time guarantees about the number of values and their
/// conversion to arrays.
pub trait SensorReadings<const COUNT: usize> {
    /// Convert the readings into a fixed-size array of physical values.
    fn to_array(self) -> [f64; COUNT];
}

/// Trait for sensors that produce typed readings.
pub trait Sensor<const COUNT: usize> {
    /// The type of readings this sensor produces.
    type Readings: SensorReadings<COUNT>;

    /// The error a failed read surfaces.
    type Error;

    /// Run one full measurement sequence and return typed readings.
    ///
    /// The first failed bus step aborts the remainder of the sequence; no
    /// partial readings are ever returned, and a failed read leaves the
    /// driver ready for the next cycle.
    fn read(&mut self) -> impl Future<Output = Result<Self::Readings, Self::Error>>;
}
