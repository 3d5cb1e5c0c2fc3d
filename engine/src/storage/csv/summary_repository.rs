use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use shared::{
    CombinedWeeklySummary, FinanceMonthlySummary, FinanceWeeklySummary, FitnessMonthlySummary,
    FitnessWeeklySummary,
};

use crate::storage::traits::SummaryStorage;

use super::connection::CsvConnection;

/// JSON-file summary store: one file per (subject, kind, period) under
/// the subject's `summaries/` directory.
///
/// Upserts go through a temp file followed by a rename, so a crash
/// mid-write leaves the previous record intact and readers never see a
/// partial file.
#[derive(Clone)]
pub struct SummaryRepository {
    connection: Arc<CsvConnection>,
}

impl SummaryRepository {
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self { connection }
    }

    fn weekly_path(&self, subject_id: &str, kind: &str, period_start: NaiveDate) -> Result<PathBuf> {
        let dir = self.connection.summaries_directory(subject_id)?;
        Ok(dir.join(format!("{}_weekly_{}.json", kind, period_start)))
    }

    fn monthly_path(&self, subject_id: &str, kind: &str, month: &str) -> Result<PathBuf> {
        let dir = self.connection.summaries_directory(subject_id)?;
        Ok(dir.join(format!("{}_monthly_{}.json", kind, month)))
    }

    fn read_record<T: DeserializeOwned>(&self, file_path: &Path) -> Result<Option<T>> {
        if !file_path.exists() {
            debug!("No summary record at {}", file_path.display());
            return Ok(None);
        }
        let contents = fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read {}", file_path.display()))?;
        let record = serde_json::from_str(&contents)
            .with_context(|| format!("Malformed summary record in {}", file_path.display()))?;
        Ok(Some(record))
    }

    fn write_record<T: Serialize>(&self, file_path: &Path, record: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(record)?;
        let tmp_path = file_path.with_extension("json.tmp");
        fs::write(&tmp_path, json.as_bytes())
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, file_path)
            .with_context(|| format!("Failed to move {} into place", tmp_path.display()))?;
        Ok(())
    }
}

impl SummaryStorage for SummaryRepository {
    fn get_fitness_weekly(
        &self,
        subject_id: &str,
        period_start: NaiveDate,
    ) -> Result<Option<FitnessWeeklySummary>> {
        self.read_record(&self.weekly_path(subject_id, "fitness", period_start)?)
    }

    fn upsert_fitness_weekly(&self, summary: &FitnessWeeklySummary) -> Result<()> {
        let path = self.weekly_path(&summary.subject_id, "fitness", summary.period_start)?;
        self.write_record(&path, summary)
    }

    fn get_finance_weekly(
        &self,
        subject_id: &str,
        period_start: NaiveDate,
    ) -> Result<Option<FinanceWeeklySummary>> {
        self.read_record(&self.weekly_path(subject_id, "finance", period_start)?)
    }

    fn upsert_finance_weekly(&self, summary: &FinanceWeeklySummary) -> Result<()> {
        let path = self.weekly_path(&summary.subject_id, "finance", summary.period_start)?;
        self.write_record(&path, summary)
    }

    fn get_fitness_monthly(
        &self,
        subject_id: &str,
        month: &str,
    ) -> Result<Option<FitnessMonthlySummary>> {
        self.read_record(&self.monthly_path(subject_id, "fitness", month)?)
    }

    fn upsert_fitness_monthly(&self, summary: &FitnessMonthlySummary) -> Result<()> {
        let path = self.monthly_path(&summary.subject_id, "fitness", &summary.month)?;
        self.write_record(&path, summary)
    }

    fn get_finance_monthly(
        &self,
        subject_id: &str,
        month: &str,
    ) -> Result<Option<FinanceMonthlySummary>> {
        self.read_record(&self.monthly_path(subject_id, "finance", month)?)
    }

    fn upsert_finance_monthly(&self, summary: &FinanceMonthlySummary) -> Result<()> {
        let path = self.monthly_path(&summary.subject_id, "finance", &summary.month)?;
        self.write_record(&path, summary)
    }

    fn get_combined_weekly(
        &self,
        subject_id: &str,
        period_start: NaiveDate,
    ) -> Result<Option<CombinedWeeklySummary>> {
        self.read_record(&self.weekly_path(subject_id, "combined", period_start)?)
    }

    fn upsert_combined_weekly(&self, summary: &CombinedWeeklySummary) -> Result<()> {
        let path = self.weekly_path(&summary.subject_id, "combined", summary.period_start)?;
        self.write_record(&path, summary)
    }

    fn mark_combined_viewed(
        &self,
        subject_id: &str,
        period_start: NaiveDate,
    ) -> Result<Option<CombinedWeeklySummary>> {
        let path = self.weekly_path(subject_id, "combined", period_start)?;
        let record: Option<CombinedWeeklySummary> = self.read_record(&path)?;
        match record {
            Some(mut record) => {
                if !record.viewed {
                    record.viewed = true;
                    self.write_record(&path, &record)?;
                }
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }
}
