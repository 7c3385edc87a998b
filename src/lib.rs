//! Analytics data layer for a municipal administrative portal.
//!
//! This crate owns everything between the upstream data-access layer and the
//! document renderer: the typed record model for the six served categories,
//! the flattener that projects nested relational payloads into tabular rows,
//! the statistics aggregator that derives series and cross-category metrics,
//! and the lightweight filter/sort/paginate engine used for on-screen
//! browsing.
//!
//! Document composition and chart geometry live in the companion
//! `muni-report-render` crate, which consumes the row and series types
//! defined here.

pub mod aggregate;
pub mod browse;
pub mod flatten;
pub mod record;

#[cfg(feature = "async")]
pub mod source;

pub use aggregate::{CategoryRows, NumericReport, SeriesPoint};
pub use flatten::Flatten;
pub use record::{FieldValue, FlatRow, RawRecord, RecordCategory};

#[cfg(feature = "async")]
pub use source::{FetchError, RecordQuery, RecordSource};

// Re-exported so downstream crates share one date type without their own
// chrono dependency.
pub use chrono;
