//! UUIDv9 generation.
//!
//! Payload layout before dashes are inserted:
//!
//! ```text
//! PAYLOAD ::= PREFIX CENTER SUFFIX [ CHECKSUM ]     (32 hex chars)
//! ```
//!
//! with the version marker spliced in at offset 12. `CENTER` is the lowercase
//! hex tick count of the timestamp, `SUFFIX` is random filler sized so the
//! whole payload is exactly 32 characters.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::checksum::calc_checksum;
use crate::format::{MARKER_OFFSET, PAYLOAD_LEN, VERSION_DIGIT, add_dashes, validate_prefix};
use crate::source::{Clock, NibbleSource, SystemClock, ThreadNibbles};

/// Ticks are 100 ns intervals since 0001-01-01T00:00:00 UTC.
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Tick count at 1970-01-01T00:00:00 UTC.
pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// Tick count of 9999-12-31T23:59:59.9999999, the largest accepted tick string.
pub const MAX_TICKS: u64 = 3_155_378_975_999_999_999;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";
const LEGACY_VARIANTS: [char; 4] = ['8', '9', 'a', 'b'];

/// Errors that can occur while generating a UUIDv9.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Uuidv9Error {
    #[error("Prefix must be no more than 8 characters, got {0}")]
    PrefixTooLong(usize),
    #[error("Prefix must be only hexadecimal characters: {0}")]
    PrefixNotHex(String),
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("Layout needs {used} characters but a UUIDv9 holds {capacity}")]
    LayoutOverflow { used: usize, capacity: usize },
    #[error("Invalid hex payload: {0}")]
    InvalidHex(String),
}

/// Timestamp embedded in the center of the payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timestamp {
    /// Read the generator's clock.
    #[default]
    Now,
    /// No timestamp; the payload is prefix plus random filler.
    Disabled,
    At(DateTime<Utc>),
    Ticks(u64),
    /// Decimal tick count.
    TickString(String),
}

impl Timestamp {
    /// Whether the timestamp contributes to the payload.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }

    /// Resolve to a tick count, reading `clock` for [`Timestamp::Now`].
    pub fn ticks<C: Clock>(&self, clock: &C) -> Result<Option<u64>, Uuidv9Error> {
        match self {
            Self::Now => datetime_to_ticks(&clock.now()).map(Some),
            Self::Disabled => Ok(None),
            Self::At(dt) => datetime_to_ticks(dt).map(Some),
            Self::Ticks(ticks) => Ok(Some(*ticks)),
            Self::TickString(s) => parse_tick_string(s).map(Some),
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::At(dt)
    }
}

impl From<u64> for Timestamp {
    fn from(ticks: u64) -> Self {
        Self::Ticks(ticks)
    }
}

impl From<bool> for Timestamp {
    fn from(enabled: bool) -> Self {
        if enabled { Self::Now } else { Self::Disabled }
    }
}

impl FromStr for Timestamp {
    type Err = Uuidv9Error;

    /// Accepts `now`/`true`, `off`/`false`/`none`, a decimal tick count or an
    /// RFC 3339 date.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "now" | "true" => Ok(Self::Now),
            "off" | "false" | "none" => Ok(Self::Disabled),
            _ if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
                Ok(Self::TickString(s.to_string()))
            }
            _ => DateTime::parse_from_rfc3339(s)
                .map(|dt| Self::At(dt.with_timezone(&Utc)))
                .map_err(|_| Uuidv9Error::InvalidTimestamp(s.to_string())),
        }
    }
}

/// Convert a UTC instant to ticks.
pub fn datetime_to_ticks(dt: &DateTime<Utc>) -> Result<u64, Uuidv9Error> {
    let sub_ticks = i64::from(dt.timestamp_subsec_nanos() / 100);
    dt.timestamp()
        .checked_mul(TICKS_PER_SECOND)
        .and_then(|t| t.checked_add(sub_ticks))
        .and_then(|t| t.checked_add(UNIX_EPOCH_TICKS))
        .and_then(|t| u64::try_from(t).ok())
        .filter(|t| *t <= MAX_TICKS)
        .ok_or_else(|| Uuidv9Error::InvalidTimestamp(dt.to_rfc3339()))
}

fn parse_tick_string(s: &str) -> Result<u64, Uuidv9Error> {
    s.trim()
        .parse::<u64>()
        .ok()
        .filter(|t| *t <= MAX_TICKS)
        .ok_or_else(|| Uuidv9Error::InvalidTimestamp(s.to_string()))
}

/// Generation options. Missing fields take their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Uuidv9Options {
    /// Up to 8 hex characters placed at the start of the payload.
    pub prefix: String,
    pub timestamp: Timestamp,
    /// Append a CRC-8 of the first 30 payload characters.
    pub checksum: bool,
    /// Splice the `9` version digit at offset 12.
    pub version: bool,
    /// Splice an RFC 4122 style version and variant pair; wins over `version`.
    pub legacy: bool,
}

impl Uuidv9Options {
    fn marker_len(&self) -> usize {
        if self.legacy {
            2
        } else if self.version {
            1
        } else {
            0
        }
    }

    fn checksum_len(&self) -> usize {
        if self.checksum { 2 } else { 0 }
    }
}

fn suffix_len(prefix_len: usize, center_len: usize, reserved: usize) -> Result<usize, Uuidv9Error> {
    let used = prefix_len + center_len + reserved;
    PAYLOAD_LEN
        .checked_sub(used)
        .ok_or(Uuidv9Error::LayoutOverflow {
            used,
            capacity: PAYLOAD_LEN,
        })
}

/// UUIDv9 generator over an injected nibble source and clock.
#[derive(Debug, Clone, Default)]
pub struct Uuidv9Gen<R = ThreadNibbles, C = SystemClock> {
    rng: R,
    clock: C,
}

impl Uuidv9Gen {
    /// Generator backed by the thread-local RNG and the system clock.
    pub fn new() -> Self {
        Self::with_sources(ThreadNibbles, SystemClock)
    }
}

impl<R: NibbleSource, C: Clock> Uuidv9Gen<R, C> {
    pub fn with_sources(rng: R, clock: C) -> Self {
        Self { rng, clock }
    }

    fn random_hex(&mut self) -> char {
        HEX_DIGITS[usize::from(self.rng.below(16) & 0x0f)] as char
    }

    fn legacy_variant(&mut self) -> char {
        LEGACY_VARIANTS[usize::from(self.rng.below(4) & 0x03)]
    }

    /// Generate one UUIDv9.
    pub fn generate(&mut self, options: &Uuidv9Options) -> Result<String, Uuidv9Error> {
        let prefix = validate_prefix(&options.prefix).inspect_err(|e| {
            debug!(prefix = %options.prefix, error = %e, "rejected prefix");
        })?;

        let center = match options.timestamp.ticks(&self.clock) {
            Ok(Some(ticks)) => format!("{ticks:x}"),
            Ok(None) => String::new(),
            Err(e) => {
                debug!(timestamp = ?options.timestamp, error = %e, "rejected timestamp");
                return Err(e);
            }
        };

        let reserved = options.marker_len() + options.checksum_len();
        let suffix_len = suffix_len(prefix.len(), center.len(), reserved).inspect_err(|e| {
            debug!(prefix = %prefix, center = %center, error = %e, "layout overflow");
        })?;

        let mut joined = String::with_capacity(PAYLOAD_LEN);
        joined.push_str(&prefix);
        joined.push_str(&center);
        for _ in 0..suffix_len {
            joined.push(self.random_hex());
        }

        if options.legacy {
            let version = if options.timestamp.is_enabled() { '1' } else { '4' };
            let variant = self.legacy_variant();
            joined.insert(MARKER_OFFSET, version);
            // The variant lands three characters after the version digit.
            joined.insert(MARKER_OFFSET + 4, variant);
        } else if options.version {
            joined.insert(MARKER_OFFSET, VERSION_DIGIT);
        }

        if options.checksum {
            let crc = calc_checksum(&joined)?;
            joined.push_str(&crc);
        }

        let uuid = add_dashes(&joined)?;
        trace!(uuid = %uuid, "generated uuidv9");
        Ok(uuid)
    }

    /// Generate `n` UUIDv9s with the same options.
    pub fn generate_n(
        &mut self,
        options: &Uuidv9Options,
        n: usize,
    ) -> Result<Vec<String>, Uuidv9Error> {
        (0..n).map(|_| self.generate(options)).collect()
    }
}

/// Generate one UUIDv9 with the thread-local RNG and the system clock.
pub fn generate(options: &Uuidv9Options) -> Result<String, Uuidv9Error> {
    Uuidv9Gen::new().generate(options)
}
