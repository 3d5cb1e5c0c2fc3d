//! # Storage Traits
//!
//! Abstractions over the log store, summary store, insight feed and
//! push channel, so the domain layer works against any backend (CSV
//! files here, the hosted store in production) without modification.
//! The engine is the single writer of summary records; metric, ledger
//! and insight rows are read-only inputs owned by the logging
//! subsystem. All operations are synchronous.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use shared::{
    CombinedWeeklySummary, FinanceMonthlySummary, FinanceWeeklySummary, FitnessMonthlySummary,
    FitnessWeeklySummary,
};

use crate::domain::models::{
    DailyMetric, Expense, FinanceProfile, FitnessProfile, SharedInsight, Subject,
};

/// Read access to the per-day metric rollups.
pub trait MetricStorage: Send + Sync {
    /// Rows for the inclusive date range, ordered by date ascending.
    /// Dates with no logs simply have no row.
    fn get_daily_metrics(
        &self,
        subject_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyMetric>>;
}

/// Read access to the money ledger.
pub trait LedgerStorage: Send + Sync {
    /// Categorized expenses in the inclusive date range, date ascending.
    fn get_expenses(&self, subject_id: &str, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<Expense>>;

    /// Total income recorded in the inclusive date range.
    fn get_income_total(&self, subject_id: &str, start: NaiveDate, end: NaiveDate) -> Result<f64>;

    /// Total savings contributions in the inclusive date range.
    fn get_savings_contributions(
        &self,
        subject_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<f64>;

    /// All-time savings contributions through `end`, for goal progress.
    fn get_savings_total(&self, subject_id: &str, end: NaiveDate) -> Result<f64>;
}

/// Read access to the subject roster and per-domain profiles.
pub trait ProfileStorage: Send + Sync {
    /// All known subjects.
    fn list_subjects(&self) -> Result<Vec<Subject>>;

    /// Fitness profile, or None when the subject has no fitness agent.
    fn get_fitness_profile(&self, subject_id: &str) -> Result<Option<FitnessProfile>>;

    /// Finance profile, or None when the subject has no finance agent.
    fn get_finance_profile(&self, subject_id: &str) -> Result<Option<FinanceProfile>>;
}

/// Summary persistence. Every upsert is keyed by
/// `(subject_id, period_start)` and must be idempotent: recomputing
/// from the same inputs writes an identical record. Writes are atomic;
/// a failed write leaves any previous record untouched.
pub trait SummaryStorage: Send + Sync {
    fn get_fitness_weekly(
        &self,
        subject_id: &str,
        period_start: NaiveDate,
    ) -> Result<Option<FitnessWeeklySummary>>;

    fn upsert_fitness_weekly(&self, summary: &FitnessWeeklySummary) -> Result<()>;

    fn get_finance_weekly(
        &self,
        subject_id: &str,
        period_start: NaiveDate,
    ) -> Result<Option<FinanceWeeklySummary>>;

    fn upsert_finance_weekly(&self, summary: &FinanceWeeklySummary) -> Result<()>;

    fn get_fitness_monthly(
        &self,
        subject_id: &str,
        month: &str,
    ) -> Result<Option<FitnessMonthlySummary>>;

    fn upsert_fitness_monthly(&self, summary: &FitnessMonthlySummary) -> Result<()>;

    fn get_finance_monthly(
        &self,
        subject_id: &str,
        month: &str,
    ) -> Result<Option<FinanceMonthlySummary>>;

    fn upsert_finance_monthly(&self, summary: &FinanceMonthlySummary) -> Result<()>;

    fn get_combined_weekly(
        &self,
        subject_id: &str,
        period_start: NaiveDate,
    ) -> Result<Option<CombinedWeeklySummary>>;

    fn upsert_combined_weekly(&self, summary: &CombinedWeeklySummary) -> Result<()>;

    /// Read the combined record on behalf of a consumer, flipping
    /// `viewed` to true on first read.
    fn mark_combined_viewed(
        &self,
        subject_id: &str,
        period_start: NaiveDate,
    ) -> Result<Option<CombinedWeeklySummary>>;
}

/// Read access to the cross-domain insight feed.
pub trait InsightStorage: Send + Sync {
    /// Non-expired insights created at or after `since`, newest first.
    fn get_shared_insights(
        &self,
        subject_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<SharedInsight>>;
}

/// Push notification channel. Fire-and-forget from the engine's point
/// of view: the orchestrator logs a failure and moves on.
pub trait PushNotifier: Send + Sync {
    fn send_push(
        &self,
        tokens: &[String],
        title: &str,
        body: &str,
        data: &serde_json::Value,
    ) -> Result<()>;
}
