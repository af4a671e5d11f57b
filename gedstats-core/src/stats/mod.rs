//! Aggregation engine
//!
//! A collection of independent summarization operations, all pure functions
//! over a filtered slice of change records:
//! - grouped counts by categorical key ([`counts`])
//! - calendar-bucketed counts with ISO-8601 weeks ([`counts`])
//! - commit-size histogram with mean/median/mode ([`histogram`])
//! - trailing moving averages ([`moving`])
//! - gap-based session segmentation ([`sessions`])
//! - pairwise collaboration graphs ([`collaboration`])
//! - generic 2D pivot/heatmap cross-tabulation ([`pivot`])
//!
//! [`service`] wires these to the store behind JSON-shaped report operations.
//! Every operation tolerates empty input and returns a well-formed empty
//! result; none of them hold state across calls.

pub mod collaboration;
pub mod counts;
pub mod histogram;
pub mod moving;
pub mod pivot;
pub mod service;
pub mod sessions;

pub use collaboration::{collaboration_graph, CollaborationGraph};
pub use counts::{count_by, count_by_bucket, CalendarUnit};
pub use histogram::{commit_size_histogram, CommitSizeHistogram};
pub use moving::moving_average;
pub use pivot::{pivot, Dimension, Measure, PivotCell, PivotTable};
pub use service::StatsService;
pub use sessions::segment_sessions;
