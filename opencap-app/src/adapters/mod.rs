//! Storage adapters implementing `AddressRegistry`.

mod memory;

pub use memory::MemoryStore;

#[cfg(feature = "database-store")]
mod database;

#[cfg(feature = "database-store")]
pub use database::DatabaseStore;

use std::sync::Arc;

use opencap_core::error::CoreResult;
use opencap_core::traits::AddressRegistry;

/// URL value that selects [`MemoryStore`].
pub const MEMORY_URL: &str = "memory";

/// Open the store selected by a database URL.
///
/// `memory` yields a [`MemoryStore`]; anything else is handed to
/// `DatabaseStore::connect`.
///
/// # Errors
/// Returns `CoreError::StorageError` when the database cannot be opened, or
/// `CoreError::ValidationError` for a database URL when the crate was built
/// without the `database-store` feature.
pub async fn open_registry(url: &str) -> CoreResult<Arc<dyn AddressRegistry>> {
    if url.trim() == MEMORY_URL {
        log::warn!("Using the in-memory store; data is lost on exit");
        return Ok(Arc::new(MemoryStore::new()));
    }

    #[cfg(feature = "database-store")]
    {
        Ok(Arc::new(DatabaseStore::connect(url).await?))
    }

    #[cfg(not(feature = "database-store"))]
    {
        Err(opencap_core::CoreError::ValidationError(format!(
            "Database URL {url} requires the database-store feature"
        )))
    }
}
