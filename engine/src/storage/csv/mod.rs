//! # CSV/JSON Storage Backend
//!
//! File-based implementation of the storage traits. Raw inputs
//! (metrics, ledger, insight feed) are CSV and JSON-lines files
//! written by the logging subsystem; the engine's own summary output
//! is one JSON file per (subject, period), written atomically.
//!
//! The domain layer is storage-agnostic: the hosted store in
//! production implements the same traits.

pub mod connection;
pub mod insight_repository;
pub mod ledger_repository;
pub mod metric_repository;
pub mod profile_repository;
pub mod summary_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::CsvConnection;
pub use insight_repository::InsightRepository;
pub use ledger_repository::LedgerRepository;
pub use metric_repository::MetricRepository;
pub use profile_repository::ProfileRepository;
pub use summary_repository::SummaryRepository;
