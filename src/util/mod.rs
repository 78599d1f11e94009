//! Util module - Byte-unit parsing and secret encoding helpers.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

/// InvalidUnitError reports a byte-unit string the parser does not accept.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidUnitError {
    #[error("value is not a bytes unit: '{0}'")]
    NotAUnit(String),

    #[error("unknown byte unit '{0}'")]
    UnknownUnit(String),

    #[error("byte value out of range: '{0}'")]
    OutOfRange(String),
}

/// Converts a value with a byte-unit suffix ("10Mi", "415P") to bytes.
///
/// Binary suffixes (Ki through Ei) multiply by powers of 1024, decimal
/// suffixes (K through E) by powers of 1000. A bare number has no unit and
/// is rejected.
pub fn unit_to_bytes(value: &str) -> Result<u64, InvalidUnitError> {
    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    if split == 0 {
        return Err(InvalidUnitError::NotAUnit(value.to_string()));
    }
    let number: u64 = value[..split]
        .parse()
        .map_err(|_| InvalidUnitError::OutOfRange(value.to_string()))?;
    let multiplier: u64 = match &value[split..] {
        "Ki" => 1 << 10,
        "Mi" => 1 << 20,
        "Gi" => 1 << 30,
        "Ti" => 1 << 40,
        "Pi" => 1 << 50,
        "Ei" => 1 << 60,
        "K" => 1_000,
        "M" => 1_000_000,
        "G" => 1_000_000_000,
        "T" => 1_000_000_000_000,
        "P" => 1_000_000_000_000_000,
        "E" => 1_000_000_000_000_000_000,
        unit => return Err(InvalidUnitError::UnknownUnit(unit.to_string())),
    };
    number
        .checked_mul(multiplier)
        .ok_or_else(|| InvalidUnitError::OutOfRange(value.to_string()))
}

/// Encodes a secret as base64 text.
pub fn secret_data_encode(data: impl AsRef<[u8]>) -> String {
    STANDARD.encode(data)
}

/// Encodes a secret as raw base64 bytes.
pub fn secret_data_encode_bytes(data: &[u8]) -> Vec<u8> {
    STANDARD.encode(data).into_bytes()
}
