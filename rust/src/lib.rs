//! uuidv9: generation and validation of UUIDv9 identifiers.
//!
//! A UUIDv9 is a 36-character, dash-separated hex string that can carry a
//! caller prefix, a time-ordered center, a version marker compatible with
//! RFC 4122 style UUIDs and a CRC-8 checksum.
//!
//! # Format
//!
//! ```text
//! UUIDv9  ::= G8 "-" G4 "-" G4 "-" G4 "-" G12
//! PAYLOAD ::= PREFIX CENTER SUFFIX [ CHECKSUM ]   (marker spliced at offset 12)
//! ```
//!
//! # Example
//!
//! ```
//! use uuidv9::{Uuidv9Gen, Uuidv9Options, ValidateOptions, is_valid_uuidv9};
//!
//! let options = Uuidv9Options {
//!     prefix: "a1b2c3d4".to_string(),
//!     checksum: true,
//!     version: true,
//!     ..Default::default()
//! };
//! let mut uuid_gen = Uuidv9Gen::new();
//! let id = uuid_gen.generate(&options).expect("valid options");
//! assert!(is_valid_uuidv9(&id, &ValidateOptions { checksum: true, version: true }));
//! println!("{}", id); // e.g., "a1b2c3d4-8dc0-9a5c-9900-c0003f8a9e71"
//! ```

mod async_api;
mod checksum;
mod format;
mod source;
mod uuidv9;
mod validate;

pub use async_api::{async_generate, async_generate_batch};
pub use checksum::{calc_checksum, crc8, verify_checksum};
pub use format::{add_dashes, check_version, is_base16, is_uuid, strip_dashes};
pub use source::{Clock, FixedClock, NibbleSource, RngNibbles, SystemClock, ThreadNibbles};
pub use uuidv9::{
    MAX_TICKS, Timestamp, Uuidv9Error, Uuidv9Gen, Uuidv9Options, datetime_to_ticks, generate,
};
pub use validate::{ValidateOptions, is_valid_uuidv9};
