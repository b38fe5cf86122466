//! Type definitions

mod address;
mod alias;
mod user;

pub use address::{AddressKey, AddressRecord, AddressTypeId, SubtypeId};
pub use alias::{validate_alias_domain, validate_username, Alias, MAX_USERNAME_LENGTH};
pub use user::{Principal, UserCredential};

// Re-export discovery types so callers need a single import path
pub use opencap_resolver::{DomainAdvertisement, ResolverKeys, SrvTarget};
