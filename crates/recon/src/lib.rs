//! `csvrecon-engine`: keyed CSV reconciliation engine.
//!
//! Loads two exports, aligns rows by a key column and reports every
//! field-level discrepancy, then aggregates those into a per-field report.
//! No CLI dependencies. The only IO is reading sources and writing the report.

pub mod config;
pub mod duplicates;
pub mod engine;
pub mod error;
pub mod loader;
pub mod model;
pub mod report;
pub mod summary;

pub use config::CompareConfig;
pub use engine::{reconcile, reconcile_datasets, reconcile_with};
pub use error::{DuplicateKeys, ReconError};
pub use model::{Dataset, Difference, DifferenceKind, KindTally, Row, SummaryRow};
pub use report::{write_report, write_report_with, ReportOptions};
pub use summary::{summarize, tally_kinds};
