//! Address record types

use serde::{Deserialize, Serialize};

/// Numeric coin-family selector.
pub type AddressTypeId = u16;

/// Sub-format selector within a coin family (e.g. P2PKH vs P2SH).
pub type SubtypeId = u8;

/// Registry key: one record per (domain, username, type).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressKey {
    pub domain: String,
    pub username: String,
    pub address_type: AddressTypeId,
}

impl AddressKey {
    #[must_use]
    pub fn new(domain: &str, username: &str, address_type: AddressTypeId) -> Self {
        Self {
            domain: domain.to_string(),
            username: username.to_string(),
            address_type,
        }
    }
}

impl std::fmt::Display for AddressKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{} type {}", self.username, self.domain, self.address_type)
    }
}

/// A stored address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    pub domain: String,
    pub username: String,
    pub address_type: AddressTypeId,
    pub subtype: SubtypeId,
    /// Raw bytes for binary types, UTF-8 text for text types.
    pub payload: Vec<u8>,
}

impl AddressRecord {
    /// Key this record is stored under.
    #[must_use]
    pub fn key(&self) -> AddressKey {
        AddressKey::new(&self.domain, &self.username, self.address_type)
    }
}
