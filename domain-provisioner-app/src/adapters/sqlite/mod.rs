//! SQLite-based store using `SeaORM`.
//!
//! A single `SqliteStore` implements both `ServerDomainRepository` and
//! `DomainRootRepository` against one local database file.

mod domain_root_repo;
pub(crate) mod entity;
mod migration;
mod server_domain_repo;

use std::path::Path;

use chrono::{DateTime, Utc};
use domain_provisioner_core::error::{CoreError, CoreResult};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use migration::Migrator;

/// SQLite-backed storage for server domains and domain roots.
pub struct SqliteStore {
    /// Shared `SeaORM` database connection.
    pub(crate) db: DatabaseConnection,
}

impl SqliteStore {
    /// Open (or create) the database at `db_path` and bring the schema up to date.
    ///
    /// # Errors
    /// Returns `CoreError::StorageError` if directory creation, database
    /// connection, or schema migration fails.
    pub async fn new(db_path: &Path) -> CoreResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CoreError::StorageError(format!("Failed to create directory: {e}")))?;
        }

        let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
        let db = Database::connect(&db_url)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to connect to SQLite: {e}")))?;

        Migrator::up(&db, None)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to run migrations: {e}")))?;

        log::info!("SQLite store ready at {}", db_path.display());
        Ok(Self { db })
    }
}

/// Parse an RFC 3339 column value.
pub(crate) fn parse_timestamp(column: &str, value: &str) -> CoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CoreError::SerializationError(format!("Invalid {column}: {e}")))
}

pub(crate) fn storage_error(action: &str) -> impl Fn(sea_orm::DbErr) -> CoreError + '_ {
    move |e| CoreError::StorageError(format!("Failed to {action}: {e}"))
}
