//! Relational store using `SeaORM`.
//!
//! A single `DatabaseStore` implements `AddressRegistry` against SQLite (and,
//! with the matching cargo features, Postgres or MySQL). The schema is
//! migrated on connect.

pub(crate) mod entity;
mod migration;
mod registry;

use std::path::Path;

use opencap_core::error::{CoreError, CoreResult};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use migration::Migrator;

/// `SeaORM`-backed address registry.
pub struct DatabaseStore {
    /// Shared `SeaORM` database connection.
    pub(crate) db: DatabaseConnection,
}

impl DatabaseStore {
    /// Connect to `url` (e.g. `sqlite://opencap.db?mode=rwc`) and migrate.
    ///
    /// # Errors
    /// Returns `CoreError::StorageError` if the connection or a migration fails.
    pub async fn connect(url: &str) -> CoreResult<Self> {
        let db = Database::connect(url)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to connect to database: {e}")))?;

        let store = Self { db };

        // Ensure schema is up to date before the store is used.
        Migrator::up(&store.db, None)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to run migrations: {e}")))?;

        log::info!("Database store ready");
        Ok(store)
    }

    /// Open (or create) an `SQLite` database file.
    ///
    /// # Errors
    /// Returns `CoreError::StorageError` if directory creation, database
    /// connection, or schema migration fails.
    pub async fn open_sqlite(db_path: &Path) -> CoreResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CoreError::StorageError(format!("Failed to create directory: {e}")))?;
        }

        Self::connect(&format!("sqlite://{}?mode=rwc", db_path.display())).await
    }
}
