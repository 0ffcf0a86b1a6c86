//! AM2301B combined humidity/temperature sensor driver.
//!
//! The device speaks a command protocol rather than a register map: a status
//! probe or measurement trigger is written in one transaction, and after a
//! fixed conversion delay the result frame is read back raw in a second
//! transaction. Both physical quantities come packed big-endian into a
//! single 7-byte frame as 20-bit fields.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use log::{error, info};
use serde::{Deserialize, Serialize};

use super::{Sensor, SensorError, SensorReadings};
use crate::bus;

/// AM2301B I2C address (fixed in hardware).
pub const I2C_ADDR: u8 = 0x38;

/// Status probe command.
const CMD_STATUS: u8 = 0x71;
/// Calibrated/idle bits that must be set in the status byte.
const STATUS_CALIBRATED: u8 = 0x18;
/// Measurement trigger command sequence.
const CMD_TRIGGER_MEASUREMENT: [u8; 3] = [0xAC, 0x33, 0x00];

/// Quiet time required after power-up before the first transaction.
const POWER_ON_SETTLE_MS: u32 = 100;
/// Minimum gap between consecutive commands.
const COMMAND_GAP_MS: u32 = 10;
/// Conversion time between the trigger and the data frame becoming valid.
const MEASUREMENT_DELAY_MS: u32 = 80;

/// Full scale of the 20-bit raw fields (2^20).
const FULL_SCALE: f64 = (1u32 << 20) as f64;

/// Typed readings from the AM2301B sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Am2301bReadings {
    /// Relative humidity in percent (0..100).
    pub humidity_percent: f64,
    /// Temperature in degrees Celsius (-50..150).
    pub temperature_celsius: f64,
}

impl SensorReadings<2> for Am2301bReadings {
    fn to_array(self) -> [f64; 2] {
        [self.humidity_percent, self.temperature_celsius]
    }
}

/// AM2301B driver owning its bus and delay handles.
pub struct Am2301b<I, D> {
    i2c: I,
    delay: D,
}

impl<I, D> Am2301b<I, D>
where
    I: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I, delay: D) -> Self {
        Self { i2c, delay }
    }

    /// Check that the sensor came up calibrated.
    ///
    /// Must run once per power cycle, with the bus quiescent for the settle
    /// delay beforehand. Probes the status byte and verifies the
    /// calibrated/idle pattern.
    pub async fn init(&mut self) -> Result<(), SensorError<I::Error>> {
        self.delay.delay_ms(POWER_ON_SETTLE_MS).await;

        bus::write_bytes(&mut self.i2c, I2C_ADDR, &[CMD_STATUS])
            .await
            .inspect_err(|_| error!("AM2301B status probe rejected, check sensor connection"))?;

        let mut status = [0u8; 1];
        bus::read_bytes(&mut self.i2c, I2C_ADDR, &mut status)
            .await
            .inspect_err(|_| error!("AM2301B status read failed"))?;

        if status[0] & STATUS_CALIBRATED != STATUS_CALIBRATED {
            error!("AM2301B reported uncalibrated status {:#04x}", status[0]);
            return Err(SensorError::NotCalibrated { status: status[0] });
        }

        info!("AM2301B status OK");
        Ok(())
    }

    /// Trigger one measurement and decode the result frame.
    pub async fn measure(&mut self) -> Result<Am2301bReadings, SensorError<I::Error>> {
        self.delay.delay_ms(COMMAND_GAP_MS).await;

        bus::write_bytes(&mut self.i2c, I2C_ADDR, &CMD_TRIGGER_MEASUREMENT)
            .await
            .inspect_err(|_| error!("AM2301B measurement trigger rejected"))?;

        self.delay.delay_ms(MEASUREMENT_DELAY_MS).await;

        let mut frame = [0u8; 7];
        bus::read_bytes(&mut self.i2c, I2C_ADDR, &mut frame)
            .await
            .inspect_err(|_| error!("AM2301B data frame read failed"))?;

        Ok(decode_frame(&frame))
    }

    /// Release the bus and delay handles.
    pub fn into_parts(self) -> (I, D) {
        (self.i2c, self.delay)
    }
}

impl<I, D> Sensor<2> for Am2301b<I, D>
where
    I: I2c,
    D: DelayNs,
{
    type Readings = Am2301bReadings;
    type Error = SensorError<I::Error>;

    async fn read(&mut self) -> Result<Am2301bReadings, Self::Error> {
        self.measure().await
    }
}

/// Decode a 7-byte measurement frame into physical values.
///
/// Byte 0 is the status byte and takes no part in decoding. Humidity sits in
/// bytes 1-3 (byte 3 split on its high nibble), temperature in the low
/// nibble of byte 3 and bytes 4-5. Byte 6 (CRC) is not checked, matching
/// the device's power-on default frame format.
fn decode_frame(frame: &[u8; 7]) -> Am2301bReadings {
    let raw_humidity =
        ((frame[1] as u32) << 12) | ((frame[2] as u32) << 4) | ((frame[3] as u32) >> 4);
    let raw_temperature =
        (((frame[3] & 0x0F) as u32) << 16) | ((frame[4] as u32) << 8) | (frame[5] as u32);

    Am2301bReadings {
        humidity_percent: raw_humidity as f64 / FULL_SCALE * 100.0,
        temperature_celsius: raw_temperature as f64 / FULL_SCALE * 200.0 - 50.0,
    }
}
