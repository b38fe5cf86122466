//! OpenCAP domain discovery
//!
//! Finds the server responsible for a domain through the `_opencap._tcp` SRV
//! record and reads the public key a domain operator publishes in TXT
//! records. All functions are stateless.

mod error;
mod services;
mod types;

pub use error::{ResolverError, ResolverResult};
pub use services::{parse_advertisement, validate_domain, OpencapResolver};
pub use types::{
    DomainAdvertisement, ResolverKeys, SrvTarget, DEFAULT_PORT, PROTOCOL, PUBLIC_KEY_LENGTH,
    SERVICE,
};
