//! Freight and tracking number formats
//!
//! - freight number: `{CC}-FRET-{NNNN}`, e.g. `FR-FRET-0001`
//! - tracking number: `{CC}-FRET{NNNN}-{XXXX}`, e.g. `FR-FRET0001-HYYC`

use crate::types::Country;
use crate::{Error, Result};
use rand::Rng;

/// Minimum width of the sequence part
const DIGITS_WIDTH: usize = 4;

/// Random suffix length of a tracking number
const SUFFIX_LEN: usize = 4;

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Format a freight number from its origin and sequence digits
pub fn format_freight_number(origin: Country, digits: &str) -> Result<String> {
    let digits = digits.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidFreightNumber(digits.to_string()));
    }

    Ok(format!(
        "{}-FRET-{:0>width$}",
        origin.prefix(),
        digits,
        width = DIGITS_WIDTH
    ))
}

/// Generate a tracking number for a shipment of `freight_number`
///
/// Uniqueness is not checked here.
pub fn generate_tracking_number<R: Rng + ?Sized>(freight_number: &str, rng: &mut R) -> String {
    let stem = freight_number.replacen("-FRET-", "-FRET", 1);
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{}-{}", stem, suffix)
}
