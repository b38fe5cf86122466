//! Parsing of the `key=value` advertisement carried in TXT records.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ResolverError, ResolverResult};
use crate::types::{PUBLIC_KEY_LENGTH, ResolverKeys};

#[allow(clippy::expect_used)]
static PAIR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*([^=\s]+)=([^=\s]+)\s*").expect("valid TXT pair regex"));

/// Collect every `key=value` pair found across the TXT strings.
///
/// Fragments that do not match are skipped. A key seen twice keeps its last value.
pub(crate) fn parse_pairs<S: AsRef<str>>(records: &[S]) -> HashMap<String, String> {
    let mut pairs = HashMap::new();
    for record in records {
        for caps in PAIR_REGEX.captures_iter(record.as_ref()) {
            pairs.insert(caps[1].to_string(), caps[2].to_string());
        }
    }
    pairs
}

/// Extract the public key and DNS-signature flag from TXT strings.
pub fn parse_advertisement<S: AsRef<str>>(
    domain: &str,
    records: &[S],
    keys: &ResolverKeys,
) -> ResolverResult<(Option<[u8; PUBLIC_KEY_LENGTH]>, bool)> {
    let pairs = parse_pairs(records);

    let public_key = pairs
        .get(&keys.public_key)
        .map(|value| decode_public_key(domain, value))
        .transpose()?;

    let dns_signature = pairs
        .get(&keys.dns_signature)
        .is_some_and(|value| value == "1");

    Ok((public_key, dns_signature))
}

fn decode_public_key(domain: &str, value: &str) -> ResolverResult<[u8; PUBLIC_KEY_LENGTH]> {
    let bytes = hex::decode(value).map_err(|e| ResolverError::InvalidPublicKey {
        domain: domain.to_string(),
        message: format!("not valid hex: {e}"),
    })?;

    let len = bytes.len();
    <[u8; PUBLIC_KEY_LENGTH]>::try_from(bytes).map_err(|_| ResolverError::InvalidPublicKey {
        domain: domain.to_string(),
        message: format!("expected {PUBLIC_KEY_LENGTH} bytes, got {len}"),
    })
}
