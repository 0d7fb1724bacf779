//! Contact repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `contacts` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - A repository is only handed out after its connection passed the schema
//!   checks in `try_new`.
//! - The store assigns row ids; inserting a record that already carries one
//!   is rejected instead of silently duplicated.

use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

use rusqlite::{params, Connection, Row};

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::contact::{Contact, ContactId};

const CONTACTS_TABLE: &str = "contacts";

const CONTACT_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    email,
    phone,
    street,
    city,
    state_or_province,
    zip_or_postal_code,
    country
FROM contacts";

const REQUIRED_COLUMNS: [&str; 12] = [
    "id",
    "first_name",
    "last_name",
    "email",
    "phone",
    "street",
    "city",
    "state_or_province",
    "zip_or_postal_code",
    "country",
    "created_at",
    "updated_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for contact persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(ContactId),
    InvalidData(String),
    /// The connection's schema version is still 0; migrations never ran.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// The schema version looks right but a required table is absent.
    MissingRequiredTable(&'static str),
    /// A required table exists without one of its required columns.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "contact not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is uninitialized; expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::InvalidData(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for contact CRUD operations.
pub trait ContactRepository {
    fn insert_contact(&self, contact: &Contact) -> RepoResult<ContactId>;
    fn update_contact(&self, contact: &Contact) -> RepoResult<()>;
    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>>;
    fn first_contact(&self) -> RepoResult<Option<Contact>>;
    fn count_contacts(&self) -> RepoResult<u64>;
}

/// SQLite-backed contact repository.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    /// Validates the connection's schema before exposing any operation.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `PRAGMA user_version` is still 0.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not hold the structure this repository queries.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_version(conn)?;
        if actual_version == 0 {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        if !table_exists(conn, CONTACTS_TABLE)? {
            return Err(RepoError::MissingRequiredTable(CONTACTS_TABLE));
        }

        let columns = table_columns(conn, CONTACTS_TABLE)?;
        for column in REQUIRED_COLUMNS {
            if !columns.contains(column) {
                return Err(RepoError::MissingRequiredColumn {
                    table: CONTACTS_TABLE,
                    column,
                });
            }
        }

        Ok(Self { conn })
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn insert_contact(&self, contact: &Contact) -> RepoResult<ContactId> {
        if let Some(id) = contact.id {
            return Err(RepoError::InvalidData(format!(
                "contact already has store id {id}; the store assigns ids on insert"
            )));
        }

        self.conn.execute(
            "INSERT INTO contacts (
                first_name,
                last_name,
                email,
                phone,
                street,
                city,
                state_or_province,
                zip_or_postal_code,
                country
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                contact.first_name.as_str(),
                contact.last_name.as_str(),
                contact.email.as_str(),
                contact.phone.as_str(),
                contact.street.as_str(),
                contact.city.as_str(),
                contact.state_or_province.as_str(),
                contact.zip_or_postal_code.as_str(),
                contact.country.as_str(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_contact(&self, contact: &Contact) -> RepoResult<()> {
        let Some(id) = contact.id else {
            return Err(RepoError::InvalidData(String::from(
                "cannot update a contact that has no store id",
            )));
        };

        let changed = self.conn.execute(
            "UPDATE contacts
             SET
                first_name = ?1,
                last_name = ?2,
                email = ?3,
                phone = ?4,
                street = ?5,
                city = ?6,
                state_or_province = ?7,
                zip_or_postal_code = ?8,
                country = ?9,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?10;",
            params![
                contact.first_name.as_str(),
                contact.last_name.as_str(),
                contact.email.as_str(),
                contact.phone.as_str(),
                contact.street.as_str(),
                contact.city.as_str(),
                contact.state_or_province.as_str(),
                contact.zip_or_postal_code.as_str(),
                contact.country.as_str(),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_contact_row(row)?));
        }

        Ok(None)
    }

    fn first_contact(&self) -> RepoResult<Option<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} ORDER BY id ASC LIMIT 1;"))?;

        let mut rows = stmt.query([])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_contact_row(row)?));
        }

        Ok(None)
    }

    fn count_contacts(&self) -> RepoResult<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM contacts;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative contact count {count}")))
    }
}

fn parse_contact_row(row: &Row<'_>) -> RepoResult<Contact> {
    Ok(Contact {
        id: Some(row.get("id")?),
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        street: row.get("street")?,
        city: row.get("city")?,
        state_or_province: row.get("state_or_province")?,
        zip_or_postal_code: row.get("zip_or_postal_code")?,
        country: row.get("country")?,
    })
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS (
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        params![table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<HashSet<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;

    let mut columns = HashSet::new();
    while let Some(row) = rows.next()? {
        columns.insert(row.get::<_, String>("name")?);
    }
    Ok(columns)
}
