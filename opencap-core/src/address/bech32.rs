//! Bech32 (SegWit) addresses
//!
//! Structural checks only: the BCH checksum in the last six data characters
//! is not verified.

use crate::error::AddressError;

/// Maximum total length of a bech32 string.
pub const MAX_LENGTH: usize = 90;

/// Minimum data part length (the checksum alone is six characters).
pub const MIN_DATA_LENGTH: usize = 6;

/// Characters allowed as the witness version (versions 0 through 16).
const WITNESS_VERSIONS: &str = "qpzry9x8gf2tvdw0";

/// Validate a SegWit address for the given human-readable part.
pub fn validate(address: &str, expected_hrp: &str) -> Result<(), AddressError> {
    let Some((hrp, data)) = address.rsplit_once('1') else {
        return Err(AddressError::Format("missing bech32 separator".to_string()));
    };

    if hrp != expected_hrp {
        return Err(AddressError::TypeMismatch(format!(
            "human-readable part is not '{expected_hrp}'"
        )));
    }

    if data.len() < MIN_DATA_LENGTH {
        return Err(AddressError::Format("data part too short".to_string()));
    }

    if address.len() > MAX_LENGTH {
        return Err(AddressError::Format(format!(
            "longer than {MAX_LENGTH} characters"
        )));
    }

    if !data
        .chars()
        .next()
        .is_some_and(|c| WITNESS_VERSIONS.contains(c))
    {
        return Err(AddressError::Format(
            "witness version out of range".to_string(),
        ));
    }

    Ok(())
}
