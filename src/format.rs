//! Fixed-precision payload formatting.
//!
//! Downstream consumers expect every measurement as
//! `<integer>.<6 fractional digits>` decimal text. The split truncates
//! toward zero rather than rounding, so the six digits are the leading
//! digits of the exact fraction.

use core::fmt::{self, Write};

use heapless::String;

/// Payload buffer capacity. Comfortably fits the widest value either
/// sensor can produce (`629145.000000`).
pub const PAYLOAD_CAPACITY: usize = 24;

/// A formatted measurement payload.
pub type Payload = String<PAYLOAD_CAPACITY>;

const FRACTION_SCALE: f64 = 1_000_000.0;

/// Render `value` with exactly six fractional digits, truncating toward
/// zero.
///
/// The sign is applied to the whole rendered magnitude, so negative values
/// with fractional parts come out right: `-50.5` becomes `"-50.500000"`,
/// never a mangled fraction. Non-finite values and values too wide for the
/// payload buffer (neither of which any driver produces) report
/// `fmt::Error` instead of panicking.
pub fn format_fixed(value: f64) -> Result<Payload, fmt::Error> {
    if !value.is_finite() {
        return Err(fmt::Error);
    }

    let negative = value < 0.0;
    let magnitude = if negative { -value } else { value };

    let whole = magnitude as u64;
    let fraction = ((magnitude - whole as f64) * FRACTION_SCALE) as u32;

    let sign = if negative { "-" } else { "" };
    let mut out = Payload::new();
    write!(out, "{sign}{whole}.{fraction:06}")?;
    Ok(out)
}
