//! Layout of the 36-character dashed form.
//!
//! Format: `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx` (8-4-4-4-12 hex groups)

use once_cell::sync::Lazy;
use regex::Regex;

use crate::uuidv9::Uuidv9Error;

/// Number of hex characters in a dash-free payload.
pub const PAYLOAD_LEN: usize = 32;

/// Maximum prefix length in hex characters.
pub const MAX_PREFIX_LEN: usize = 8;

/// Payload offset where the version marker is spliced in.
pub const MARKER_OFFSET: usize = 12;

/// Dashed-string offset of the version digit.
pub const VERSION_INDEX: usize = 14;

/// Dashed-string offset of the legacy variant digit.
pub const VARIANT_INDEX: usize = 19;

/// Version digit of the non-legacy marker.
pub const VERSION_DIGIT: char = '9';

static UUID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

/// True when `s` is non-empty and contains only hex digits.
pub fn is_base16(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Check the 8-4-4-4-12 dashed hex shape, case-insensitive.
pub fn is_uuid(uuid: &str) -> bool {
    !uuid.is_empty() && UUID_PATTERN.is_match(uuid)
}

/// Remove every dash.
pub fn strip_dashes(uuid: &str) -> String {
    uuid.replace('-', "")
}

/// Insert dashes into a 32-character payload.
pub fn add_dashes(payload: &str) -> Result<String, Uuidv9Error> {
    if payload.len() != PAYLOAD_LEN || !payload.is_ascii() {
        return Err(Uuidv9Error::InvalidHex(payload.to_string()));
    }
    Ok(format!(
        "{}-{}-{}-{}-{}",
        &payload[0..8],
        &payload[8..12],
        &payload[12..16],
        &payload[16..20],
        &payload[20..]
    ))
}

/// Check the version marker, optionally pinned to `version`.
///
/// The digit at dashed offset 14 must be `9`, or `1`/`4` with a variant digit
/// of `8`, `9`, `a` or `b` (either case) at dashed offset 19.
pub fn check_version(uuid: &str, version: Option<u8>) -> bool {
    let bytes = uuid.as_bytes();
    let (Some(&version_digit), Some(&variant_digit)) =
        (bytes.get(VERSION_INDEX), bytes.get(VARIANT_INDEX))
    else {
        return false;
    };

    let pinned = match version {
        Some(v) => v < 10 && version_digit == b'0' + v,
        None => true,
    };

    let marked = version_digit == VERSION_DIGIT as u8
        || (matches!(version_digit, b'1' | b'4')
            && matches!(variant_digit, b'8' | b'9' | b'a' | b'b' | b'A' | b'B'));

    pinned && marked
}

/// Lowercase and validate a caller prefix.
pub fn validate_prefix(prefix: &str) -> Result<String, Uuidv9Error> {
    let prefix = prefix.to_lowercase();
    if prefix.is_empty() {
        return Ok(prefix);
    }
    if prefix.chars().count() > MAX_PREFIX_LEN {
        return Err(Uuidv9Error::PrefixTooLong(prefix.chars().count()));
    }
    if !is_base16(&prefix) {
        return Err(Uuidv9Error::PrefixNotHex(prefix));
    }
    Ok(prefix)
}
