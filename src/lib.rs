//! Hardware-independent sensor core for an I2C ambient-condition monitor.
//!
//! This crate contains the bus transaction primitives, register-level sensor
//! drivers, and payload formatting for a node that samples an AM2301B
//! humidity/temperature sensor and an LTR390 ambient-light/UV sensor and
//! publishes the decoded values upstream.
//!
//! All hardware access goes through the `embedded-hal-async` traits, so the
//! crate compiles for embedded targets and for desktop hosts (for tests).
//! The firmware layer owning the concrete I2C peripheral, network uplink,
//! and task scheduling sits above this crate and hands in the bus and delay
//! handles; nothing here spawns tasks, retries, or sleeps between cycles.

#![cfg_attr(not(test), no_std)]

pub mod bus;
pub mod format;
pub mod sampling;
pub mod sensors;

#[cfg(test)]
pub(crate) mod testbus;
