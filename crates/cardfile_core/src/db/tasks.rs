//! Database task operations: create, migrate, seed, drop.
//!
//! # Responsibility
//! - Implement the bootstrap commands the task runner exposes, driven by a
//!   parsed connection config.
//! - Keep every task safe to re-run; repeat runs report an outcome instead
//!   of failing.
//!
//! # Invariants
//! - `seed` never duplicates the seed contact.
//! - `drop` only ever removes the configured database file.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use log::info;
use rusqlite::{Connection, OpenFlags};

use crate::config::ConnectionConfig;
use crate::db::migrations::{apply_migrations, current_version, latest_version};
use crate::db::seed::seed_contact;
use crate::db::{open_existing_db, DbError};
use crate::model::contact::ContactId;
use crate::repo::contact_repo::{ContactRepository, RepoError, SqliteContactRepository};

pub type TaskResult<T> = Result<T, TaskError>;

#[derive(Debug)]
pub enum TaskError {
    Db(DbError),
    Repo(RepoError),
    Io { path: PathBuf, source: io::Error },
}

impl Display for TaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Io { path, source } => write!(f, "io error on `{}`: {source}", path.display()),
        }
    }
}

impl Error for TaskError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<DbError> for TaskError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for TaskError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for TaskError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrateOutcome {
    pub from_version: u32,
    pub to_version: u32,
}

impl MigrateOutcome {
    /// True when no migration had to run.
    pub fn is_noop(self) -> bool {
        self.from_version == self.to_version
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded(ContactId),
    SkippedExisting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Dropped,
    NotFound,
}

/// Creates the configured database file, including missing parent
/// directories. An existing file is left untouched.
pub fn create_database(config: &ConnectionConfig) -> TaskResult<CreateOutcome> {
    let path = &config.database;
    if path.exists() {
        info!(
            "event=task_create module=db status=ok outcome=exists path={}",
            path.display()
        );
        return Ok(CreateOutcome::AlreadyExists);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| TaskError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let conn = Connection::open(path)?;
    // An untouched SQLite connection leaves a zero-byte file behind; writing
    // the header pragma materializes a real database.
    conn.execute_batch("PRAGMA user_version = 0;")?;

    info!(
        "event=task_create module=db status=ok outcome=created path={}",
        path.display()
    );
    Ok(CreateOutcome::Created)
}

/// Applies pending migrations, creating the database file when missing.
pub fn migrate_database(config: &ConnectionConfig) -> TaskResult<MigrateOutcome> {
    let path = &config.database;
    if !path.exists() {
        create_database(config)?;
    }

    let mut conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;

    let from_version = current_version(&conn)?;
    apply_migrations(&mut conn)?;
    let outcome = MigrateOutcome {
        from_version,
        to_version: latest_version(),
    };

    info!(
        "event=task_migrate module=db status=ok from_version={} to_version={} path={}",
        outcome.from_version,
        outcome.to_version,
        path.display()
    );
    Ok(outcome)
}

/// Loads the seed contact into an empty, fully migrated store.
///
/// A store that already holds contacts is left as it is; seeding is
/// idempotent, not additive.
pub fn seed_database(config: &ConnectionConfig) -> TaskResult<SeedOutcome> {
    let conn = open_existing_db(&config.database)?;
    let repo = SqliteContactRepository::try_new(&conn)?;

    if repo.count_contacts()? > 0 {
        info!("event=task_seed module=db status=ok outcome=skipped");
        return Ok(SeedOutcome::SkippedExisting);
    }

    let id = repo.insert_contact(&seed_contact())?;
    info!("event=task_seed module=db status=ok outcome=seeded contact_id={id}");
    Ok(SeedOutcome::Seeded(id))
}

/// Deletes the configured database file.
pub fn drop_database(config: &ConnectionConfig) -> TaskResult<DropOutcome> {
    let path = &config.database;
    if !path.exists() {
        info!(
            "event=task_drop module=db status=ok outcome=missing path={}",
            path.display()
        );
        return Ok(DropOutcome::NotFound);
    }

    fs::remove_file(path).map_err(|source| TaskError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        "event=task_drop module=db status=ok outcome=dropped path={}",
        path.display()
    );
    Ok(DropOutcome::Dropped)
}

/// Reads the schema version of the configured database without migrating.
///
/// Opens read-only so the version probe can never disturb the file.
pub fn current_schema_version(config: &ConnectionConfig) -> TaskResult<u32> {
    let path = &config.database;
    if !path.exists() {
        return Err(DbError::DatabaseMissing(path.to_path_buf()).into());
    }

    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
    Ok(current_version(&conn)?)
}
