//! Base58Check (P2PKH / P2SH style) addresses

use sha2::{Digest, Sha256};

use crate::error::AddressError;

/// Decoded size of a Base58Check address: version, 20-byte hash, checksum.
pub const DECODED_LENGTH: usize = 25;

const CHECKSUM_LENGTH: usize = 4;

/// Version byte of Bitcoin (and Bitcoin Cash legacy) P2PKH addresses.
pub const P2PKH_VERSION: u8 = 0;

/// Version byte of Bitcoin (and Bitcoin Cash legacy) P2SH addresses.
pub const P2SH_VERSION: u8 = 5;

/// Decode into the fixed 25-byte buffer.
///
/// The text is read as one big-endian base58 number: surplus leading `1`s
/// are insignificant and shorter values are left-padded with zeros.
fn decode_fixed(address: &str) -> Result<[u8; DECODED_LENGTH], AddressError> {
    if address.is_empty() {
        return Err(AddressError::Format("empty address".to_string()));
    }

    let decoded = bs58::decode(address)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_vec()
        .map_err(|_| AddressError::Format("character outside the base58 alphabet".to_string()))?;

    let significant = decoded
        .iter()
        .position(|b| *b != 0)
        .map_or(&[][..], |start| &decoded[start..]);

    if significant.len() > DECODED_LENGTH {
        return Err(AddressError::Format(format!(
            "decoded value exceeds {DECODED_LENGTH} bytes"
        )));
    }

    let mut buf = [0u8; DECODED_LENGTH];
    buf[DECODED_LENGTH - significant.len()..].copy_from_slice(significant);
    Ok(buf)
}

/// First four bytes of SHA-256(SHA-256(data)).
fn checksum(data: &[u8]) -> [u8; CHECKSUM_LENGTH] {
    let digest = Sha256::digest(Sha256::digest(data));
    let mut out = [0u8; CHECKSUM_LENGTH];
    out.copy_from_slice(&digest[..CHECKSUM_LENGTH]);
    out
}

/// Validate a Base58Check address against the expected version byte.
///
/// Checks run in order: alphabet and size, checksum, then version.
pub fn validate(address: &str, expected_version: u8) -> Result<(), AddressError> {
    let buf = decode_fixed(address)?;
    let (body, embedded) = buf.split_at(DECODED_LENGTH - CHECKSUM_LENGTH);

    if checksum(body) != embedded {
        return Err(AddressError::Checksum);
    }

    let version = body[0];
    if version != expected_version {
        return Err(AddressError::TypeMismatch(format!(
            "version byte {version}, expected {expected_version}"
        )));
    }

    Ok(())
}
