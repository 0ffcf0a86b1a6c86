//! One sampling cycle over both sensors.
//!
//! The sampler is the only piece of this crate with a notion of "a cycle":
//! read the climate sensor, then the light sensor, strictly in sequence on
//! one task, and hand back whatever formatted payloads came out. A sensor
//! that fails is logged and skipped for this cycle — the caller publishes
//! what is present and simply waits for the next cycle; no retry happens
//! here (or anywhere else in the crate).
//!
//! Cadence belongs to the caller. [`SAMPLE_INTERVAL_MS`] records the
//! interval the reference deployment runs at.

use core::fmt::Debug;

use log::{error, warn};

use crate::format::{Payload, format_fixed};
use crate::sensors::{Sensor, SensorReadings};

/// Sampling interval of the reference deployment.
pub const SAMPLE_INTERVAL_MS: u32 = 20_000;

/// Positional layout of the two-value readings each sensor produces.
pub mod channels {
    pub const HUMIDITY: usize = 0;
    pub const TEMPERATURE: usize = 1;

    pub const ILLUMINANCE: usize = 0;
    pub const UV_INDEX: usize = 1;
}

/// Formatted payloads from one sampling cycle.
///
/// A `None` slot means that sensor failed this cycle (or, for the exotic
/// case of a value that cannot be rendered, that formatting failed); both
/// slots of a sensor are always populated or empty together on a read
/// failure, since drivers never return partial readings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleOutput {
    pub humidity: Option<Payload>,
    pub temperature: Option<Payload>,
    pub illuminance: Option<Payload>,
    pub uv_index: Option<Payload>,
}

/// Drives one climate sensor and one light sensor through sampling cycles.
///
/// Owns both drivers (and through them the bus handles) for its entire
/// lifetime, so nothing else can issue transactions between cycles.
pub struct Sampler<C, L> {
    climate: C,
    light: L,
}

impl<C, L> Sampler<C, L>
where
    C: Sensor<2>,
    L: Sensor<2>,
    C::Error: Debug,
    L::Error: Debug,
{
    pub fn new(climate: C, light: L) -> Self {
        Self { climate, light }
    }

    /// Run one full cycle: climate sensor, then light sensor.
    ///
    /// Never fails as a whole; a failed cycle must not poison the next one,
    /// so errors stop at the log and an empty slot.
    pub async fn run_cycle(&mut self) -> CycleOutput {
        let mut output = CycleOutput::default();

        match self.climate.read().await {
            Ok(readings) => {
                let values = readings.to_array();
                output.humidity = render(values[channels::HUMIDITY], "humidity");
                output.temperature = render(values[channels::TEMPERATURE], "temperature");
            }
            Err(err) => warn!("climate sensor read failed, skipping publish: {err:?}"),
        }

        match self.light.read().await {
            Ok(readings) => {
                let values = readings.to_array();
                output.illuminance = render(values[channels::ILLUMINANCE], "illuminance");
                output.uv_index = render(values[channels::UV_INDEX], "uv index");
            }
            Err(err) => warn!("light sensor read failed, skipping publish: {err:?}"),
        }

        output
    }

    /// Release both drivers.
    pub fn into_parts(self) -> (C, L) {
        (self.climate, self.light)
    }
}

fn render(value: f64, channel: &str) -> Option<Payload> {
    match format_fixed(value) {
        Ok(payload) => Some(payload),
        Err(_) => {
            error!("{channel} value {value} does not fit the payload buffer");
            None
        }
    }
}
