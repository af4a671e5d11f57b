//! DDL mirror of the host tables
//!
//! The host application owns and migrates these tables; gedstats never does.
//! This mirror covers exactly the columns the repository layer reads and
//! exists so fixtures and tests can build a compatible in-memory database.
//! `gedcom_record` stands in for the host's per-type content tables,
//! coalesced into one (collection, xref) -> text view.

use rusqlite::Connection;

/// Subset of the host schema read by this crate.
pub const HOST_TABLES: &str = r#"
    -- Trees (collections)
    CREATE TABLE IF NOT EXISTS gedcom (
        gedcom_id    INTEGER PRIMARY KEY,
        gedcom_name  TEXT NOT NULL UNIQUE
    );

    -- Edit history: one row per record revision
    CREATE TABLE IF NOT EXISTS change (
        change_id    INTEGER PRIMARY KEY,
        change_time  DATETIME NOT NULL,
        status       TEXT NOT NULL,
        gedcom_id    INTEGER NOT NULL REFERENCES gedcom(gedcom_id),
        xref         TEXT NOT NULL,
        old_gedcom   TEXT NOT NULL,
        new_gedcom   TEXT NOT NULL,
        user_id      INTEGER
    );

    -- Actor directory
    CREATE TABLE IF NOT EXISTS user (
        user_id      INTEGER PRIMARY KEY,
        user_name    TEXT NOT NULL,
        real_name    TEXT
    );

    -- Security/audit log
    CREATE TABLE IF NOT EXISTS log (
        log_id       INTEGER PRIMARY KEY,
        log_time     DATETIME NOT NULL,
        log_type     TEXT NOT NULL,
        log_message  TEXT NOT NULL,
        ip_address   TEXT NOT NULL,
        user_id      INTEGER,
        gedcom_id    INTEGER
    );

    -- Private messages
    CREATE TABLE IF NOT EXISTS message (
        message_id   INTEGER PRIMARY KEY,
        sender       TEXT NOT NULL,
        user_id      INTEGER,
        subject      TEXT,
        body         TEXT,
        created      DATETIME NOT NULL
    );

    -- Record content, for name/label resolution only
    CREATE TABLE IF NOT EXISTS gedcom_record (
        gedcom_id    INTEGER NOT NULL,
        xref         TEXT NOT NULL,
        gedcom_text  TEXT NOT NULL,
        PRIMARY KEY (gedcom_id, xref)
    );

    CREATE INDEX IF NOT EXISTS idx_change_time ON change(change_time);
    CREATE INDEX IF NOT EXISTS idx_change_tree ON change(gedcom_id);
"#;

/// Create the mirrored tables on a connection (fixture/test support).
pub fn create_host_tables(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(HOST_TABLES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_create_cleanly() {
        let conn = Connection::open_in_memory().unwrap();
        create_host_tables(&conn).unwrap();
        // Idempotent
        create_host_tables(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 6);
    }
}
