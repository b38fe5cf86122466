//! Address registry persistence abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{AddressKey, AddressRecord, UserCredential};

/// Persistence contract for users, addresses and domain public keys.
///
/// Implementations:
/// - `DatabaseStore` (`SeaORM`, SQLite / Postgres / MySQL)
/// - `MemoryStore` (process-local, for tests and ephemeral servers)
///
/// Payloads are stored as given: callers validate them first.
#[async_trait]
pub trait AddressRegistry: Send + Sync {
    /// Get one address record.
    async fn get_address(&self, key: &AddressKey) -> CoreResult<Option<AddressRecord>>;

    /// All address records of a user, ordered by type.
    async fn list_addresses(&self, domain: &str, username: &str) -> CoreResult<Vec<AddressRecord>>;

    /// Create or overwrite the record at `record.key()`.
    ///
    /// Must be a single atomic write. Fails with `UserNotFound` when the
    /// owning user does not exist.
    async fn put_address(&self, record: &AddressRecord) -> CoreResult<()>;

    /// Delete one record. Returns whether a record was removed.
    async fn delete_address(&self, key: &AddressKey) -> CoreResult<bool>;

    /// Create a user. Fails with `Duplicate` when `(domain, username)` exists.
    async fn create_user(&self, user: &UserCredential) -> CoreResult<()>;

    /// Delete a user together with all of its address records.
    ///
    /// Returns whether the user existed.
    async fn delete_user(&self, domain: &str, username: &str) -> CoreResult<bool>;

    /// Stored password hash of a user.
    async fn get_password_hash(&self, domain: &str, username: &str) -> CoreResult<Option<String>>;

    /// Public key recorded for a domain.
    async fn get_public_key(&self, domain: &str) -> CoreResult<Option<Vec<u8>>>;

    /// Set or overwrite the public key of a domain.
    async fn set_public_key(&self, domain: &str, public_key: &[u8]) -> CoreResult<()>;

    /// Remove the public key of a domain. Returns whether one was stored.
    async fn delete_public_key(&self, domain: &str) -> CoreResult<bool>;
}
