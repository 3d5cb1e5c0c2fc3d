//! Storage layer: trait abstractions plus the file-based backend.

pub mod csv;
pub mod notifier;
pub mod traits;

pub use csv::CsvConnection;
pub use notifier::LogNotifier;
