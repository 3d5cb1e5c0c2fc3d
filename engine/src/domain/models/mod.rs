//! Domain models: raw log rows, per-subject profiles and shared
//! cross-domain events. Persisted summary records live in the `shared`
//! crate because the client reads them too.

pub mod daily_metric;
pub mod insight;
pub mod profile;

pub use daily_metric::{DailyMetric, Expense};
pub use insight::{InsightKind, SharedInsight};
pub use profile::{BudgetSplit, FinanceProfile, FitnessProfile, Subject};
