//! UUIDv9 validation.

use serde::{Deserialize, Serialize};

use crate::checksum::verify_checksum;
use crate::format::{check_version, is_uuid};

/// Which optional checks to run on top of the structural one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateOptions {
    pub checksum: bool,
    pub version: bool,
}

/// Validate a UUIDv9. Never panics; malformed input is simply invalid.
pub fn is_valid_uuidv9(uuid: &str, options: &ValidateOptions) -> bool {
    is_uuid(uuid)
        && (!options.checksum || verify_checksum(uuid))
        && (!options.version || check_version(uuid, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uuidv9::{Timestamp, Uuidv9Gen, Uuidv9Options};

    const ALL: ValidateOptions = ValidateOptions {
        checksum: true,
        version: true,
    };

    #[test]
    fn test_rejects_non_uuids() {
        assert!(!is_valid_uuidv9("not-a-uuid", &ValidateOptions::default()));
        assert!(!is_valid_uuidv9("", &ALL));
        assert!(!is_valid_uuidv9("0123456789abcdef0123456789abcdef", &ALL));
    }

    #[test]
    fn test_structural_only_by_default() {
        assert!(is_valid_uuidv9(
            "01234567-89ab-cdef-0123-456789abcdef",
            &ValidateOptions::default()
        ));
        assert!(!is_valid_uuidv9("01234567-89ab-cdef-0123-456789abcdef", &ALL));
    }

    #[test]
    fn test_round_trip_generated() {
        let mut g = Uuidv9Gen::new();
        for (version, legacy) in [(false, false), (true, false), (false, true), (true, true)] {
            for timestamp in [Timestamp::Now, Timestamp::Disabled] {
                let options = Uuidv9Options {
                    prefix: "c0ffee".to_string(),
                    timestamp,
                    checksum: true,
                    version,
                    legacy,
                };
                let uuid = g.generate(&options).unwrap();
                let check = ValidateOptions {
                    checksum: true,
                    version: version || legacy,
                };
                assert!(is_valid_uuidv9(&uuid, &check), "{uuid}");
            }
        }
    }

    #[test]
    fn test_each_requested_check_can_fail() {
        let mut g = Uuidv9Gen::new();
        let plain = g
            .generate(&Uuidv9Options {
                checksum: true,
                ..Default::default()
            })
            .unwrap();

        // Flip one character of the final group.
        let mut chars: Vec<char> = plain.chars().collect();
        chars[26] = if chars[26] == 'f' { '0' } else { 'f' };
        let tampered: String = chars.into_iter().collect();
        assert!(is_valid_uuidv9(&tampered, &ValidateOptions::default()));
        assert!(!is_valid_uuidv9(
            &tampered,
            &ValidateOptions {
                checksum: true,
                version: false
            }
        ));

        let unmarked = "01234567-89ab-7def-0123-456789abcdef";
        assert!(!is_valid_uuidv9(
            unmarked,
            &ValidateOptions {
                checksum: false,
                version: true
            }
        ));
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let opts: ValidateOptions = serde_json::from_str(r#"{"version":true}"#).unwrap();
        assert!(opts.version);
        assert!(!opts.checksum);
    }
}
