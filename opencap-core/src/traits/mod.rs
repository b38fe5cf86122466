//! Storage and discovery abstraction trait definition

mod address_registry;
mod domain_resolver;

pub use address_registry::AddressRegistry;
pub use domain_resolver::DomainResolver;
