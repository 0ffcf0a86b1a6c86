//! I2C bus transaction primitives.
//!
//! Every sensor exchange in this crate is built from the four addressed
//! transactions below. Each one is a single start/.../stop sequence; the
//! register read uses a repeated start between the register write and the
//! data read, and the HAL NACKs the last byte of every read on our behalf.
//!
//! Acknowledgment checking and the per-transaction timeout are the bus
//! transport's responsibility: the `I2c` implementation handed in by the
//! firmware is expected to be configured (pins, mode, timeout) before first
//! use, and any NACK or timeout surfaces here as its error type. The bus is
//! a strictly serial resource — callers hold exclusive ownership of the
//! handle, and no transaction is queued behind another.

use embedded_hal_async::i2c::I2c;

/// Write `payload` to the device at `address` as one transaction.
pub async fn write_bytes<I: I2c>(
    i2c: &mut I,
    address: u8,
    payload: &[u8],
) -> Result<(), I::Error> {
    i2c.write(address, payload).await
}

/// Fill `buf` from the device at `address` as one transaction.
///
/// No register byte is sent; this is the raw read some devices (the AM2301B
/// among them) expect after a command write in an earlier transaction.
pub async fn read_bytes<I: I2c>(
    i2c: &mut I,
    address: u8,
    buf: &mut [u8],
) -> Result<(), I::Error> {
    i2c.read(address, buf).await
}

/// Write a single-byte `value` to `register` on the device at `address`.
pub async fn write_register<I: I2c>(
    i2c: &mut I,
    address: u8,
    register: u8,
    value: u8,
) -> Result<(), I::Error> {
    i2c.write(address, &[register, value]).await
}

/// Read one byte from `register` on the device at `address`.
///
/// Issues address+W and the register byte, then a repeated start and
/// address+R for the data byte.
pub async fn read_register<I: I2c>(
    i2c: &mut I,
    address: u8,
    register: u8,
) -> Result<u8, I::Error> {
    let mut buf = [0u8; 1];
    i2c.write_read(address, &[register], &mut buf).await?;
    Ok(buf[0])
}
