//! Async convenience API built on top of the sync generator.

use crate::{Uuidv9Error, Uuidv9Gen, Uuidv9Options};

/// Get one UUIDv9 in async contexts.
pub async fn async_generate(options: Uuidv9Options) -> Result<String, Uuidv9Error> {
    Uuidv9Gen::new().generate(&options)
}

/// Generate a finite batch of UUIDv9s in async contexts.
pub async fn async_generate_batch(
    options: Uuidv9Options,
    count: usize,
) -> Result<Vec<String>, Uuidv9Error> {
    Uuidv9Gen::new().generate_n(&options, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ValidateOptions, is_valid_uuidv9};
    use futures::executor::block_on;

    #[test]
    fn async_generate_is_valid() {
        let options = Uuidv9Options {
            checksum: true,
            version: true,
            ..Default::default()
        };
        let uuid = block_on(async_generate(options)).unwrap();
        assert!(is_valid_uuidv9(
            &uuid,
            &ValidateOptions {
                checksum: true,
                version: true
            }
        ));
    }

    #[test]
    fn async_generate_propagates_errors() {
        let options = Uuidv9Options {
            prefix: "nothex".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            block_on(async_generate(options)),
            Err(Uuidv9Error::PrefixNotHex(_))
        ));
    }

    #[test]
    fn async_batch_count_matches() {
        let values = block_on(async_generate_batch(
            Uuidv9Options {
                prefix: "ab".to_string(),
                ..Default::default()
            },
            3,
        ))
        .unwrap();
        assert_eq!(values.len(), 3);
        assert!(values.iter().all(|v| v.starts_with("ab")));
    }
}
