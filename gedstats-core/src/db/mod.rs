//! Read-only access to the host application's relational schema
//!
//! The `change`, `log`, `message`, `user`, and per-record content tables are
//! owned by the host genealogy application; this crate only reads them.
//! [`schema`] carries a DDL mirror of exactly the columns we read, used to
//! build in-memory fixture databases for tests.

pub mod repo;
pub mod schema;

pub use repo::Database;
