//! LTR390 combined ambient-light/UV sensor driver.
//!
//! The device exposes one measurement engine shared by both channels, so a
//! full sample is two phases: enable in ALS mode, wait out the integration
//! time, read the three ALS data registers, then repeat in UVS mode. Each
//! data channel is a 20-bit value spread over three registers, low byte
//! first, with the top register masked to its low nibble.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use log::error;
use serde::{Deserialize, Serialize};

use super::{Sensor, SensorError, SensorReadings};
use crate::bus;

/// LTR390 I2C address (fixed in hardware).
pub const I2C_ADDR: u8 = 0x53;

// Register map
const REG_MAIN_CTRL: u8 = 0x00;
const REG_ALS_DATA: [u8; 3] = [0x0D, 0x0E, 0x0F];
const REG_UVS_DATA: [u8; 3] = [0x10, 0x11, 0x12];

// MAIN_CTRL bits
const CTRL_ENABLE: u8 = 1 << 1;
const CTRL_MODE_ALS: u8 = 0 << 3;
const CTRL_MODE_UVS: u8 = 1 << 3;

/// Wait after a mode switch before the data registers hold a fresh sample.
const INTEGRATION_DELAY_MS: u32 = 200;

/// Lux conversion coefficient from the datasheet.
const LUX_COEFFICIENT: f64 = 0.6;

/// Conversion constants that depend on how the sensor is configured.
///
/// The defaults match the power-on configuration this driver programs
/// (gain x1, 18-bit/100 ms integration, no window glass). Deployments with a
/// different gain or integration-time setting, or with the sensor mounted
/// behind a window, must supply their own values at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// ALS gain setting.
    pub gain: f64,
    /// Integration-time factor for the configured resolution.
    pub integration_time: f64,
    /// Transmission correction for any window above the sensor.
    pub window_factor: f64,
    /// Counts per UV index point.
    pub uv_sensitivity: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            gain: 1.0,
            integration_time: 1.0,
            window_factor: 1.0,
            uv_sensitivity: 2300.0,
        }
    }
}

impl Calibration {
    fn convert(&self, raw_als: u32, raw_uvs: u32) -> Ltr390Readings {
        let illuminance_lux =
            LUX_COEFFICIENT * raw_als as f64 / (self.gain * self.integration_time)
                * self.window_factor;
        let uv_index = raw_uvs as f64 / self.uv_sensitivity * self.window_factor;

        Ltr390Readings {
            illuminance_lux,
            uv_index,
        }
    }
}

/// Typed readings from the LTR390 sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ltr390Readings {
    /// Ambient light level in lux.
    pub illuminance_lux: f64,
    /// Dimensionless UV index.
    pub uv_index: f64,
}

impl SensorReadings<2> for Ltr390Readings {
    fn to_array(self) -> [f64; 2] {
        [self.illuminance_lux, self.uv_index]
    }
}

/// LTR390 driver owning its bus and delay handles.
pub struct Ltr390<I, D> {
    i2c: I,
    delay: D,
    calibration: Calibration,
}

impl<I, D> Ltr390<I, D>
where
    I: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I, delay: D, calibration: Calibration) -> Self {
        Self {
            i2c,
            delay,
            calibration,
        }
    }

    /// Sample both channels and convert to physical values.
    ///
    /// Runs the ALS phase first, then the UVS phase. A failure in either
    /// phase aborts everything that remains.
    pub async fn measure(&mut self) -> Result<Ltr390Readings, SensorError<I::Error>> {
        let raw_als = self.sample_channel(CTRL_MODE_ALS, REG_ALS_DATA).await?;
        let raw_uvs = self.sample_channel(CTRL_MODE_UVS, REG_UVS_DATA).await?;

        Ok(self.calibration.convert(raw_als, raw_uvs))
    }

    /// Release the bus and delay handles.
    pub fn into_parts(self) -> (I, D) {
        (self.i2c, self.delay)
    }

    async fn sample_channel(
        &mut self,
        mode: u8,
        registers: [u8; 3],
    ) -> Result<u32, SensorError<I::Error>> {
        bus::write_register(&mut self.i2c, I2C_ADDR, REG_MAIN_CTRL, CTRL_ENABLE | mode)
            .await
            .inspect_err(|_| error!("LTR390 mode switch rejected, check sensor connection"))?;

        self.delay.delay_ms(INTEGRATION_DELAY_MS).await;

        let mut data = [0u8; 3];
        for (slot, register) in data.iter_mut().zip(registers) {
            *slot = bus::read_register(&mut self.i2c, I2C_ADDR, register)
                .await
                .inspect_err(|_| error!("LTR390 data register {register:#04x} read failed"))?;
        }

        Ok(assemble_20bit(data[0], data[1], data[2]))
    }
}

impl<I, D> Sensor<2> for Ltr390<I, D>
where
    I: I2c,
    D: DelayNs,
{
    type Readings = Ltr390Readings;
    type Error = SensorError<I::Error>;

    async fn read(&mut self) -> Result<Ltr390Readings, Self::Error> {
        self.measure().await
    }
}

/// Assemble a 20-bit channel value from its three data registers.
fn assemble_20bit(low: u8, mid: u8, high: u8) -> u32 {
    (low as u32) | ((mid as u32) << 8) | (((high & 0x0F) as u32) << 16)
}
