use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::Reader;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use crate::domain::models::DailyMetric;
use crate::storage::traits::MetricStorage;

use super::connection::CsvConnection;

/// CSV-backed reader for the per-day metric rollups.
///
/// `metrics.csv` is written by the logging subsystem with one row per
/// logged date. A missing file just means the subject has not logged
/// anything yet.
#[derive(Clone)]
pub struct MetricRepository {
    connection: Arc<CsvConnection>,
}

impl MetricRepository {
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self { connection }
    }

    fn read_all(&self, subject_id: &str) -> Result<Vec<DailyMetric>> {
        let file_path = self.connection.metrics_file_path(subject_id);

        if !file_path.exists() {
            debug!("No metrics file for {}, returning empty list", subject_id);
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)
            .with_context(|| format!("Failed to open {}", file_path.display()))?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        // The logging subsystem should write at most one row per date;
        // if it ever duplicates, the later row wins.
        let mut by_date: BTreeMap<NaiveDate, DailyMetric> = BTreeMap::new();
        for result in csv_reader.deserialize() {
            let metric: DailyMetric = result
                .with_context(|| format!("Malformed metric row in {}", file_path.display()))?;
            if by_date.insert(metric.date, metric.clone()).is_some() {
                warn!(
                    "Duplicate metric row for {} on {}, keeping the later one",
                    subject_id, metric.date
                );
            }
        }

        Ok(by_date.into_values().collect())
    }
}

impl MetricStorage for MetricRepository {
    fn get_daily_metrics(
        &self,
        subject_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyMetric>> {
        let rows = self.read_all(subject_id)?;
        Ok(rows
            .into_iter()
            .filter(|m| m.date >= start && m.date <= end)
            .collect())
    }
}
