//! Core domain types for gedstats
//!
//! These types mirror the rows gedstats reads from the host genealogy
//! application's relational schema (`change`, `log`, `message`, `user`), plus
//! the derived entities computed per query.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Tree** | One genealogy collection; every change row belongs to exactly one |
//! | **Record** | A GEDCOM record inside a tree, addressed by its xref |
//! | **Change** | One edit-history row: old and new text snapshots of a record |
//! | **Commit** | The set of change rows sharing identical actor and timestamp |
//! | **Session** | A run of one actor's commits separated by at most a gap threshold |
//! | **Fact** | A level-1 tag inside a record (BIRT, NAME, ...), the unit of content |
//!
//! Everything here is transient and recomputed per query; gedstats never writes
//! to the host schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// Change history
// ============================================

/// Review status of a change row
///
/// The discriminant order is the canonical grouping order, like [`RecordType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    Accepted,
    Rejected,
    Pending,
}

impl ChangeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeStatus::Accepted => "accepted",
            ChangeStatus::Rejected => "rejected",
            ChangeStatus::Pending => "pending",
        }
    }
}

impl std::fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ChangeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accepted" => Ok(ChangeStatus::Accepted),
            "rejected" => Ok(ChangeStatus::Rejected),
            "pending" => Ok(ChangeStatus::Pending),
            _ => Err(format!("unknown change status: {}", s)),
        }
    }
}

/// One row of edit history, read from the host `change` table.
///
/// `old_gedcom` empty means the record did not exist before the change
/// (creation); `new_gedcom` empty means it no longer exists afterwards
/// (deletion). A row with both texts empty is meaningless and never observed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRecord {
    /// Primary key of the change row
    pub change_id: i64,
    /// Record identifier within the tree (opaque key, e.g. "I123")
    pub xref: String,
    /// Owning tree name
    pub tree: String,
    /// Actor who saved the change; None for anonymous/system events
    pub user_id: Option<i64>,
    /// When the change was saved (second precision)
    pub change_time: DateTime<Utc>,
    /// Review status
    pub status: ChangeStatus,
    /// Full record text before the change (empty = creation)
    pub old_gedcom: String,
    /// Full record text after the change (empty = deletion)
    pub new_gedcom: String,
}

impl ChangeRecord {
    /// Whether this change created the record.
    pub fn is_creation(&self) -> bool {
        self.old_gedcom.is_empty() && !self.new_gedcom.is_empty()
    }

    /// Whether this change deleted the record.
    pub fn is_deletion(&self) -> bool {
        self.new_gedcom.is_empty() && !self.old_gedcom.is_empty()
    }

    /// Composite key identifying the record this change touched.
    pub fn record_key(&self) -> (String, String) {
        (self.tree.clone(), self.xref.clone())
    }
}

// ============================================
// Record types
// ============================================

/// Canonical classification of a GEDCOM record.
///
/// The discriminant order is the canonical presentation order used by grouped
/// counts and pivot axes; it is never sorted lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    Individual,
    Family,
    Source,
    Repository,
    Note,
    Media,
    Submitter,
    Location,
    Header,
    Other,
}

impl RecordType {
    /// All types in canonical presentation order.
    pub const ALL: [RecordType; 10] = [
        RecordType::Individual,
        RecordType::Family,
        RecordType::Source,
        RecordType::Repository,
        RecordType::Note,
        RecordType::Media,
        RecordType::Submitter,
        RecordType::Location,
        RecordType::Header,
        RecordType::Other,
    ];

    /// Returns the identifier used in report keys
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Individual => "individual",
            RecordType::Family => "family",
            RecordType::Source => "source",
            RecordType::Repository => "repository",
            RecordType::Note => "note",
            RecordType::Media => "media",
            RecordType::Submitter => "submitter",
            RecordType::Location => "location",
            RecordType::Header => "header",
            RecordType::Other => "other",
        }
    }

    /// Returns the display label for this record type
    pub fn display_name(&self) -> &'static str {
        match self {
            RecordType::Individual => "Individual",
            RecordType::Family => "Family",
            RecordType::Source => "Source",
            RecordType::Repository => "Repository",
            RecordType::Note => "Note",
            RecordType::Media => "Media",
            RecordType::Submitter => "Submitter",
            RecordType::Location => "Location",
            RecordType::Header => "Header",
            RecordType::Other => "Other",
        }
    }

    /// Position in the canonical presentation order.
    pub fn order_index(&self) -> usize {
        Self::ALL.iter().position(|t| t == self).unwrap_or(Self::ALL.len())
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================
// Actor directory
// ============================================

/// One row of the host `user` table, reduced to what reports need.
///
/// The display name is coalesced from the real-name and user-name columns by
/// the query; callers always get a non-empty string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Numeric actor identity
    pub user_id: i64,
    /// Human-readable name
    pub display_name: String,
}

// ============================================
// Security/audit log
// ============================================

/// Category of a security-log row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogType {
    Auth,
    Search,
}

impl LogType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogType::Auth => "auth",
            LogType::Search => "search",
        }
    }
}

impl std::str::FromStr for LogType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auth" => Ok(LogType::Auth),
            "search" => Ok(LogType::Search),
            _ => Err(format!("unknown log type: {}", s)),
        }
    }
}

/// One row of the host `log` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRow {
    /// Log category
    pub log_type: LogType,
    /// When the event happened
    pub log_time: DateTime<Utc>,
    /// Free-form log message
    pub message: String,
    /// Actor, if the event is attributable
    pub user_id: Option<i64>,
    /// Source address of the request
    pub ip_address: String,
}

// ============================================
// Messaging
// ============================================

/// One row of the host `message` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRow {
    /// When the message was created
    pub created: DateTime<Utc>,
    /// Recipient actor, if registered
    pub recipient_id: Option<i64>,
    /// Sender address (not necessarily a registered actor)
    pub sender: String,
}

// ============================================
// Derived entities
// ============================================

/// A maximal run of one actor's change events where consecutive timestamps
/// stay within the configured gap threshold. Recomputed per query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Actor who owns the session (None for anonymous events)
    pub user_id: Option<i64>,
    /// First event in the run
    pub start: DateTime<Utc>,
    /// Last event in the run
    pub end: DateTime<Utc>,
    /// Number of change events in the run
    pub changes: usize,
    /// `end - start` in whole minutes
    pub duration_minutes: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_change_status_round_trip() {
        for status in [
            ChangeStatus::Accepted,
            ChangeStatus::Rejected,
            ChangeStatus::Pending,
        ] {
            assert_eq!(ChangeStatus::from_str(status.as_str()), Ok(status));
        }
        assert!(ChangeStatus::from_str("bogus").is_err());
    }

    #[test]
    fn test_change_status_orders_by_declaration() {
        // Grouped counts key on status, so it must order like RecordType does
        assert!(ChangeStatus::Accepted < ChangeStatus::Rejected);
        assert!(ChangeStatus::Rejected < ChangeStatus::Pending);

        let mut statuses = [
            ChangeStatus::Pending,
            ChangeStatus::Accepted,
            ChangeStatus::Rejected,
        ];
        statuses.sort();
        assert_eq!(
            statuses,
            [
                ChangeStatus::Accepted,
                ChangeStatus::Rejected,
                ChangeStatus::Pending,
            ]
        );
    }

    #[test]
    fn test_record_type_order() {
        assert_eq!(RecordType::Individual.order_index(), 0);
        assert_eq!(RecordType::Family.order_index(), 1);
        assert_eq!(RecordType::Other.order_index(), 9);
        // Canonical order is not lexicographic: Family sorts before Media
        assert!(RecordType::Family.order_index() < RecordType::Media.order_index());
    }

    #[test]
    fn test_creation_deletion_flags() {
        let mut change = ChangeRecord {
            change_id: 1,
            xref: "I1".to_string(),
            tree: "demo".to_string(),
            user_id: Some(1),
            change_time: Utc::now(),
            status: ChangeStatus::Accepted,
            old_gedcom: String::new(),
            new_gedcom: "0 @I1@ INDI\n1 NAME John".to_string(),
        };
        assert!(change.is_creation());
        assert!(!change.is_deletion());

        std::mem::swap(&mut change.old_gedcom, &mut change.new_gedcom);
        assert!(change.is_deletion());
        assert!(!change.is_creation());
    }
}
