//! Periodic aggregation and insight engine.
//!
//! Turns the raw per-day activity logs two domain agents produce
//! (fitness and finance) into weekly and monthly summaries, and runs
//! the Sunday-evening pass that merges both domains into one combined
//! record with team wins and a headline insight.
//!
//! The engine is a single writer over its summary store and runs as a
//! one-shot batch tick; an external scheduler owns the cadence.

pub mod domain;
pub mod storage;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use domain::finance::FinanceSummaryService;
use domain::fitness::FitnessSummaryService;
use domain::weekly_job::WeeklyInsightJob;
use storage::csv::{
    CsvConnection, InsightRepository, LedgerRepository, MetricRepository, ProfileRepository,
    SummaryRepository,
};
use storage::notifier::LogNotifier;
use storage::traits::PushNotifier;

/// The wired-up engine: file-backed repositories behind the storage
/// traits, the two domain services, and the weekly job on top.
pub struct Engine {
    pub fitness_service: FitnessSummaryService,
    pub finance_service: FinanceSummaryService,
    pub weekly_job: WeeklyInsightJob,
}

impl Engine {
    /// Create an engine rooted at the given data directory, with the
    /// log-only push channel.
    pub fn new<P: AsRef<Path>>(data_directory: P) -> Result<Self> {
        Self::with_notifier(data_directory, Arc::new(LogNotifier::new()))
    }

    /// Create an engine in the default data directory
    /// (`INSIGHT_ENGINE_DATA_DIR` or `~/.insight-engine`).
    pub fn new_default() -> Result<Self> {
        let connection = Arc::new(CsvConnection::new_default()?);
        Self::from_connection(connection, Arc::new(LogNotifier::new()))
    }

    /// Create an engine with a caller-supplied push channel.
    pub fn with_notifier<P: AsRef<Path>>(
        data_directory: P,
        notifier: Arc<dyn PushNotifier>,
    ) -> Result<Self> {
        let connection = Arc::new(CsvConnection::new(data_directory)?);
        Self::from_connection(connection, notifier)
    }

    fn from_connection(
        connection: Arc<CsvConnection>,
        notifier: Arc<dyn PushNotifier>,
    ) -> Result<Self> {
        let metrics = Arc::new(MetricRepository::new(Arc::clone(&connection)));
        let ledger = Arc::new(LedgerRepository::new(Arc::clone(&connection)));
        let profiles = Arc::new(ProfileRepository::new(Arc::clone(&connection)));
        let summaries = Arc::new(SummaryRepository::new(Arc::clone(&connection)));
        let insight_feed = Arc::new(InsightRepository::new(Arc::clone(&connection)));

        let fitness_service = FitnessSummaryService::new(
            metrics,
            profiles.clone(),
            summaries.clone(),
        );
        let finance_service = FinanceSummaryService::new(
            ledger,
            profiles.clone(),
            summaries.clone(),
        );

        let weekly_job = WeeklyInsightJob::new(
            profiles,
            summaries,
            insight_feed,
            notifier,
            fitness_service.clone(),
            finance_service.clone(),
        );

        Ok(Self {
            fitness_service,
            finance_service,
            weekly_job,
        })
    }
}
