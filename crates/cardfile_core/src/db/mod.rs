//! SQLite storage bootstrap, schema migration and task entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the contact store.
//! - Apply schema migrations in deterministic order.
//! - Implement the rake-style database tasks the CLI exposes.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read or write contact data before the schema checks
//!   succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;
pub mod seed;
pub mod tasks;

pub use open::{open_db, open_db_in_memory, open_existing_db};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file-backed store does not exist; `create` has never run.
    DatabaseMissing(PathBuf),
    /// The store's schema is older than this binary expects; `migrate` must
    /// run before the application may touch it.
    SchemaOutOfDate {
        db_version: u32,
        latest_supported: u32,
    },
    /// The store's schema is newer than this binary knows how to read.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::DatabaseMissing(path) => write!(
                f,
                "database file `{}` does not exist; run the create and migrate tasks first",
                path.display()
            ),
            Self::SchemaOutOfDate {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is behind expected {latest_supported}; run the migrate task"
            ),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::DatabaseMissing(_)
            | Self::SchemaOutOfDate { .. }
            | Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
