//! Nano (`xrb_` / `nano_`) addresses
//!
//! The pattern fixes the encoded length (52 key characters plus an
//! 8-character checksum); the checksum itself is not verified.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::AddressError;

/// Characters after the prefix.
pub const ENCODED_LENGTH: usize = 60;

#[allow(clippy::expect_used)]
static NANO_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^(xrb_|nano_)([0-9a-z]{{{ENCODED_LENGTH}}})$"))
        .expect("valid nano address regex")
});

/// Validate a Nano text address.
pub fn validate(address: &str) -> Result<(), AddressError> {
    if NANO_REGEX.is_match(address) {
        Ok(())
    } else {
        Err(AddressError::Format(format!(
            "expected xrb_ or nano_ followed by {ENCODED_LENGTH} characters"
        )))
    }
}
