//! Database repository layer
//!
//! Read-only queries over the host schema, plus fixture insert helpers for
//! tests and demos (the production path never writes). Timestamps are stored
//! as RFC 3339 text; an unparseable timestamp means the stream is
//! structurally invalid and surfaces as an error rather than a silent skip.

use crate::error::{Error, Result};
use crate::types::{Actor, ChangeRecord, ChangeStatus, LogRow, LogType, MessageRow};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

/// Handle on the host database (single connection).
pub struct Database {
    conn: Mutex<Connection>,
}

fn parse_time(raw: &str, column: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

fn map_change(row: &Row<'_>) -> rusqlite::Result<ChangeRecord> {
    let time_raw: String = row.get(1)?;
    let status_raw: String = row.get(2)?;

    // Unknown status strings degrade to pending rather than dropping the row
    let status = ChangeStatus::from_str(&status_raw).unwrap_or_else(|_| {
        tracing::warn!(status = %status_raw, "Unknown change status, treating as pending");
        ChangeStatus::Pending
    });

    Ok(ChangeRecord {
        change_id: row.get(0)?,
        change_time: parse_time(&time_raw, 1)?,
        status,
        tree: row.get(3)?,
        xref: row.get(4)?,
        old_gedcom: row.get(5)?,
        new_gedcom: row.get(6)?,
        user_id: row.get(7)?,
    })
}

impl Database {
    /// Open the host database file read-only.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        tracing::debug!(path = %path.display(), "Opened host database read-only");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (writable; fixture/test support).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create the mirrored host tables (fixture/test support).
    pub fn create_host_tables(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::create_host_tables(&conn)?;
        Ok(())
    }

    // ============================================
    // Change stream
    // ============================================

    /// All change rows, optionally scoped to one tree, ascending by time.
    pub fn changes(&self, tree: Option<&str>) -> Result<Vec<ChangeRecord>> {
        let conn = self.conn.lock().unwrap();

        let sql = r#"
            SELECT c.change_id, c.change_time, c.status, g.gedcom_name,
                   c.xref, c.old_gedcom, c.new_gedcom, c.user_id
            FROM change c
            JOIN gedcom g ON c.gedcom_id = g.gedcom_id
            WHERE (?1 IS NULL OR g.gedcom_name = ?1)
            ORDER BY c.change_time, c.change_id
        "#;

        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params![tree], map_change)?;

        let mut changes = Vec::new();
        for row in rows {
            changes.push(row?);
        }

        tracing::debug!(count = changes.len(), tree = ?tree, "Loaded change stream");
        Ok(changes)
    }

    // ============================================
    // Actor directory
    // ============================================

    /// All actors, with display name coalesced from real name then user name.
    pub fn actors(&self) -> Result<Vec<Actor>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT user_id, COALESCE(NULLIF(real_name, ''), user_name)
            FROM user
            ORDER BY user_id
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Actor {
                user_id: row.get(0)?,
                display_name: row.get(1)?,
            })
        })?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Batched display-name lookup for a set of actor ids.
    ///
    /// One query regardless of set size; missing ids are simply absent from
    /// the returned map.
    pub fn actors_by_ids(&self, ids: &[i64]) -> Result<HashMap<i64, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let conn = self.conn.lock().unwrap();
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT user_id, COALESCE(NULLIF(real_name, ''), user_name) \
             FROM user WHERE user_id IN ({})",
            placeholders
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(ids.iter()), |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut names = HashMap::new();
        for row in rows {
            let (user_id, name) = row?;
            names.insert(user_id, name);
        }
        Ok(names)
    }

    // ============================================
    // Security/audit log and messaging streams
    // ============================================

    /// Log rows, optionally restricted to one category, ascending by time.
    pub fn logs(&self, log_type: Option<LogType>) -> Result<Vec<LogRow>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT log_time, log_type, log_message, user_id, ip_address
            FROM log
            WHERE (?1 IS NULL OR log_type = ?1)
            ORDER BY log_time, log_id
            "#,
        )?;

        let type_str = log_type.map(|t| t.as_str());
        let rows = stmt.query_map(params![type_str], |row| {
            let time_raw: String = row.get(0)?;
            let type_raw: String = row.get(1)?;
            Ok((time_raw, type_raw, row.get::<_, String>(2)?, row.get::<_, Option<i64>>(3)?, row.get::<_, String>(4)?))
        })?;

        let mut logs = Vec::new();
        for row in rows {
            let (time_raw, type_raw, message, user_id, ip_address) = row?;
            // Rows of categories we do not model are skipped, not fatal
            let Ok(log_type) = LogType::from_str(&type_raw) else {
                continue;
            };
            logs.push(LogRow {
                log_type,
                log_time: parse_time(&time_raw, 0).map_err(Error::Database)?,
                message,
                user_id,
                ip_address,
            });
        }
        Ok(logs)
    }

    /// Message rows, ascending by creation time.
    pub fn messages(&self) -> Result<Vec<MessageRow>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT created, user_id, sender
            FROM message
            ORDER BY created, message_id
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            let time_raw: String = row.get(0)?;
            Ok(MessageRow {
                created: parse_time(&time_raw, 0)?,
                recipient_id: row.get(1)?,
                sender: row.get(2)?,
            })
        })?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    // ============================================
    // Record content (name resolution only)
    // ============================================

    /// Raw GEDCOM text of a record, if present.
    pub fn record_text(&self, tree: &str, xref: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let text = conn
            .query_row(
                r#"
                SELECT r.gedcom_text
                FROM gedcom_record r
                JOIN gedcom g ON r.gedcom_id = g.gedcom_id
                WHERE g.gedcom_name = ?1 AND r.xref = ?2
                "#,
                params![tree, xref],
                |row| row.get(0),
            )
            .optional()?;
        Ok(text)
    }

    // ============================================
    // Fixture inserts (tests and demos only)
    // ============================================

    /// Insert a tree if missing and return its id (fixture support).
    pub fn insert_tree(&self, name: &str) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO gedcom (gedcom_name) VALUES (?1)",
            params![name],
        )?;
        let id = conn.query_row(
            "SELECT gedcom_id FROM gedcom WHERE gedcom_name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Insert a change row (fixture support).
    pub fn insert_change(&self, change: &ChangeRecord) -> Result<()> {
        let tree_id = self.insert_tree(&change.tree)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO change
                (change_time, status, gedcom_id, xref, old_gedcom, new_gedcom, user_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                change.change_time.to_rfc3339(),
                change.status.as_str(),
                tree_id,
                change.xref,
                change.old_gedcom,
                change.new_gedcom,
                change.user_id,
            ],
        )?;
        Ok(())
    }

    /// Insert an actor row (fixture support).
    pub fn insert_user(&self, user_id: i64, user_name: &str, real_name: Option<&str>) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO user (user_id, user_name, real_name) VALUES (?1, ?2, ?3)",
            params![user_id, user_name, real_name],
        )?;
        Ok(())
    }

    /// Insert a log row (fixture support).
    pub fn insert_log(&self, log: &LogRow) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO log (log_time, log_type, log_message, ip_address, user_id)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                log.log_time.to_rfc3339(),
                log.log_type.as_str(),
                log.message,
                log.ip_address,
                log.user_id,
            ],
        )?;
        Ok(())
    }

    /// Insert a message row (fixture support).
    pub fn insert_message(&self, message: &MessageRow) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO message (sender, user_id, created) VALUES (?1, ?2, ?3)",
            params![message.sender, message.recipient_id, message.created.to_rfc3339()],
        )?;
        Ok(())
    }

    /// Insert record content (fixture support).
    pub fn insert_record_text(&self, tree: &str, xref: &str, text: &str) -> Result<()> {
        let tree_id = self.insert_tree(tree)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO gedcom_record (gedcom_id, xref, gedcom_text) VALUES (?1, ?2, ?3)",
            params![tree_id, xref, text],
        )?;
        Ok(())
    }
}
