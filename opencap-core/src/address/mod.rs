//! Address type table and validation
//!
//! Every supported coin family is a row in a fixed, process-wide table.
//! Binary types carry raw decoded bytes whose length depends on the subtype;
//! text types carry the UTF-8 address string and ignore the subtype.

pub mod base58;
pub mod bech32;
pub mod nano;

use serde::Serialize;

use crate::error::AddressError;
use crate::types::{AddressTypeId, SubtypeId};

/// How payloads of one address type are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AddressFormat {
    /// Raw bytes; `(subtype, expected length)` pairs.
    Binary {
        subtypes: &'static [(SubtypeId, usize)],
    },
    /// Base58Check text with a fixed version byte.
    Base58Check { version: u8 },
    /// SegWit bech32 text with a fixed human-readable part.
    Bech32 { hrp: &'static str },
    /// `xrb_` / `nano_` text.
    Nano,
    /// Accepted as long as it is present.
    Opaque,
}

/// One row of the address type table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AddressType {
    pub id: AddressTypeId,
    pub name: &'static str,
    pub format: AddressFormat,
}

pub const BITCOIN: AddressTypeId = 0;
pub const NANO: AddressTypeId = 1;
pub const PAYMENT_CODE: AddressTypeId = 2;
pub const SEGWIT: AddressTypeId = 3;
pub const BITCOIN_P2PKH: AddressTypeId = 100;
pub const BITCOIN_P2SH: AddressTypeId = 101;
pub const BITCOIN_BECH32: AddressTypeId = 102;
pub const BITCOIN_PAYMENT_CODE: AddressTypeId = 103;
pub const BITCOIN_CASH_P2PKH: AddressTypeId = 200;
pub const BITCOIN_CASH_P2SH: AddressTypeId = 201;
pub const NANO_TEXT: AddressTypeId = 300;

static ADDRESS_TYPES: &[AddressType] = &[
    AddressType {
        id: BITCOIN,
        name: "Bitcoin",
        format: AddressFormat::Binary {
            subtypes: &[(0, 20), (1, 20)],
        },
    },
    AddressType {
        id: NANO,
        name: "Nano",
        format: AddressFormat::Binary {
            subtypes: &[(0, 32)],
        },
    },
    AddressType {
        id: PAYMENT_CODE,
        name: "BIP-47 payment code",
        format: AddressFormat::Binary {
            subtypes: &[(0, 79), (1, 79)],
        },
    },
    AddressType {
        id: SEGWIT,
        name: "SegWit",
        format: AddressFormat::Binary {
            subtypes: &[(0, 20), (1, 32)],
        },
    },
    AddressType {
        id: BITCOIN_P2PKH,
        name: "Bitcoin P2PKH",
        format: AddressFormat::Base58Check {
            version: base58::P2PKH_VERSION,
        },
    },
    AddressType {
        id: BITCOIN_P2SH,
        name: "Bitcoin P2SH",
        format: AddressFormat::Base58Check {
            version: base58::P2SH_VERSION,
        },
    },
    AddressType {
        id: BITCOIN_BECH32,
        name: "Bitcoin Bech32",
        format: AddressFormat::Bech32 { hrp: "bc" },
    },
    AddressType {
        id: BITCOIN_PAYMENT_CODE,
        name: "Bitcoin payment code",
        format: AddressFormat::Opaque,
    },
    AddressType {
        id: BITCOIN_CASH_P2PKH,
        name: "Bitcoin Cash P2PKH",
        format: AddressFormat::Base58Check {
            version: base58::P2PKH_VERSION,
        },
    },
    AddressType {
        id: BITCOIN_CASH_P2SH,
        name: "Bitcoin Cash P2SH",
        format: AddressFormat::Base58Check {
            version: base58::P2SH_VERSION,
        },
    },
    AddressType {
        id: NANO_TEXT,
        name: "Nano",
        format: AddressFormat::Nano,
    },
];

/// Read-only view over the address type table.
pub struct AddressTypeRegistry;

impl AddressTypeRegistry {
    /// All supported types, ordered by id.
    #[must_use]
    pub fn all() -> &'static [AddressType] {
        ADDRESS_TYPES
    }

    #[must_use]
    pub fn lookup(id: AddressTypeId) -> Option<&'static AddressType> {
        ADDRESS_TYPES.iter().find(|t| t.id == id)
    }

    /// Validate a payload for `(address_type, subtype)`.
    ///
    /// Errors never include the payload itself.
    pub fn validate(
        address_type: AddressTypeId,
        subtype: SubtypeId,
        payload: &[u8],
    ) -> Result<(), AddressError> {
        let entry = Self::lookup(address_type).ok_or_else(|| {
            AddressError::TypeMismatch(format!("unknown address type {address_type}"))
        })?;

        match entry.format {
            AddressFormat::Binary { subtypes } => {
                let expected = subtypes
                    .iter()
                    .find(|(id, _)| *id == subtype)
                    .map(|(_, len)| *len)
                    .ok_or_else(|| {
                        AddressError::TypeMismatch(format!(
                            "unknown subtype {subtype} for address type {address_type}"
                        ))
                    })?;
                if payload.len() == expected {
                    Ok(())
                } else {
                    Err(AddressError::Format(format!(
                        "expected {expected} bytes, got {}",
                        payload.len()
                    )))
                }
            }
            AddressFormat::Base58Check { version } => base58::validate(as_text(payload)?, version),
            AddressFormat::Bech32 { hrp } => bech32::validate(as_text(payload)?, hrp),
            AddressFormat::Nano => nano::validate(as_text(payload)?),
            AddressFormat::Opaque => {
                if payload.is_empty() {
                    Err(AddressError::Format("empty address".to_string()))
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Boolean form of [`Self::validate`].
    #[must_use]
    pub fn is_valid(address_type: AddressTypeId, subtype: SubtypeId, payload: &[u8]) -> bool {
        Self::validate(address_type, subtype, payload).is_ok()
    }
}

fn as_text(payload: &[u8]) -> Result<&str, AddressError> {
    std::str::from_utf8(payload)
        .map_err(|_| AddressError::Format("text address is not valid UTF-8".to_string()))
}
