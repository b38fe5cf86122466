//! OpenCAP Core Library
//!
//! Core logic of an OpenCAP alias server:
//! - Address type table and per-coin address validation
//! - Bearer tokens and the authorization gate for mutating operations
//! - Password hashing and alias parsing
//! - Address, account and domain services
//!
//! Storage and DNS discovery are reached through the [`AddressRegistry`] and
//! [`DomainResolver`] traits, so the services run unchanged on any backend.

pub mod address;
pub mod auth;
pub mod crypto;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use address::AddressTypeRegistry;
pub use auth::{AuthorizationGate, SigningAlgorithm, TokenService};
pub use error::{AddressError, AuthError, CoreError, CoreResult};
pub use services::{AccountService, AddressService, DomainService, ServiceContext};
pub use traits::{AddressRegistry, DomainResolver};
