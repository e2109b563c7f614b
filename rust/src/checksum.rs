//! CRC-8 checksum over the UUIDv9 hex payload.
//!
//! Polynomial `0x07`, initial value `0x00`, MSB-first, no reflection and no
//! final XOR (the CRC-8/SMBUS parameter set).

use crate::format::strip_dashes;
use crate::uuidv9::Uuidv9Error;

const POLYNOMIAL: u8 = 0x07;

/// Number of payload hex characters covered by the checksum.
pub const CHECKSUM_COVERAGE: usize = 30;

/// Run CRC-8 over raw bytes.
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0x00;
    for byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ POLYNOMIAL
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// Compute the checksum of an even-length hex string, rendered as two
/// lowercase hex characters.
pub fn calc_checksum(hex_payload: &str) -> Result<String, Uuidv9Error> {
    let data =
        hex::decode(hex_payload).map_err(|_| Uuidv9Error::InvalidHex(hex_payload.to_string()))?;
    Ok(format!("{:02x}", crc8(&data)))
}

/// Verify the trailing checksum of a dashed identifier.
///
/// The first 30 payload characters are hashed and compared against the
/// literal characters at dashed offsets 34..36. Comparison is case-sensitive,
/// so an identifier whose checksum was uppercased does not verify.
pub fn verify_checksum(uuid: &str) -> bool {
    let payload = strip_dashes(uuid);
    let Some(covered) = payload.get(..CHECKSUM_COVERAGE) else {
        return false;
    };
    let Some(stored) = uuid.get(34..36) else {
        return false;
    };
    match calc_checksum(covered) {
        Ok(crc) => crc == stored,
        Err(_) => false,
    }
}
