//! # gedstats-core
//!
//! Core library for gedstats - change-history statistics for genealogy trees.
//!
//! This library provides:
//! - Domain types for change rows, record types, and sessions
//! - A read-only SQLite store layer over the host genealogy schema
//! - GEDCOM tokenizing, bookkeeping-noise stripping, and fact extraction
//! - A shortest-edit-script line diff and per-change classification
//! - Aggregation operations (grouped counts, time series, histograms,
//!   sessions, collaboration graphs, pivot heatmaps)
//! - Configuration management and logging infrastructure
//!
//! ## Architecture
//!
//! Every report follows the same three-step pipeline:
//! - **Fetch:** read rows from the host store ([`db`])
//! - **Filter:** build the working set with a [`QueryFilter`]
//! - **Aggregate:** run pure summarization over the working set ([`stats`])
//!
//! Nothing is persisted back; all derived data is recomputed per query.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gedstats_core::{Config, Database, QueryFilter, StatsService};
//! use gedstats_core::stats::CalendarUnit;
//!
//! let config = Config::load().expect("failed to load config");
//! let db = Database::open("webtrees.db".as_ref()).expect("failed to open database");
//!
//! let filter = QueryFilter::new().with_last_days(90);
//! let service = StatsService::new(&db, filter, config.stats);
//! let weekly = service.changes_over_time(CalendarUnit::Week).expect("query failed");
//! for entry in weekly {
//!     println!("{}: {}", entry.key, entry.count);
//! }
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use filter::QueryFilter;
pub use stats::StatsService;
pub use types::*;

// Public modules
pub mod classify;
pub mod config;
pub mod db;
pub mod diff;
pub mod error;
pub mod filter;
pub mod gedcom;
pub mod labels;
pub mod logging;
pub mod stats;
pub mod types;
