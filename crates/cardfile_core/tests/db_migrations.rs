use cardfile_core::db::migrations::latest_version;
use cardfile_core::db::{open_db, open_db_in_memory, open_existing_db, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "contacts");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cardfile.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "contacts");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn contacts_table_defaults_every_text_column_to_empty() {
    let conn = open_db_in_memory().unwrap();

    conn.execute("INSERT INTO contacts DEFAULT VALUES;", [])
        .unwrap();
    let (first_name, country): (String, String) = conn
        .query_row(
            "SELECT first_name, country FROM contacts LIMIT 1;",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();

    assert_eq!(first_name, "");
    assert_eq!(country, "");
}

#[test]
fn open_existing_rejects_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.db");

    let err = open_existing_db(&path).unwrap_err();
    assert!(matches!(err, DbError::DatabaseMissing(missing) if missing == path));
    assert!(!path.exists(), "runtime open must not create the file");
}

#[test]
fn open_existing_rejects_unmigrated_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unmigrated.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 0;").unwrap();
    drop(conn);

    let err = open_existing_db(&path).unwrap_err();
    match err {
        DbError::SchemaOutOfDate {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 0);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn open_existing_rejects_newer_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_existing_db(&path).unwrap_err();
    assert!(matches!(err, DbError::UnsupportedSchemaVersion { .. }));
}

#[test]
fn open_existing_accepts_a_bootstrapped_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ready.db");

    drop(open_db(&path).unwrap());

    let conn = open_existing_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "contacts");
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
