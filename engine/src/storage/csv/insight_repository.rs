use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::sync::Arc;

use crate::domain::models::SharedInsight;
use crate::storage::traits::InsightStorage;

use super::connection::CsvConnection;

/// Reader for the cross-domain insight feed, a JSON-lines file the
/// two logging agents append to. One event per line; a line that does
/// not parse is skipped with a warning rather than failing the whole
/// read, since the feed is append-only and a torn tail line is
/// possible.
#[derive(Clone)]
pub struct InsightRepository {
    connection: Arc<CsvConnection>,
}

impl InsightRepository {
    pub fn new(connection: Arc<CsvConnection>) -> Self {
        Self { connection }
    }
}

impl InsightStorage for InsightRepository {
    fn get_shared_insights(
        &self,
        subject_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<SharedInsight>> {
        let file_path = self.connection.insights_file_path(subject_id);

        if !file_path.exists() {
            debug!("No insight feed for {}, returning empty list", subject_id);
            return Ok(Vec::new());
        }

        let file = File::open(&file_path)
            .with_context(|| format!("Failed to open {}", file_path.display()))?;
        let reader = BufReader::new(file);

        let now = Utc::now();
        let mut insights = Vec::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let insight: SharedInsight = match serde_json::from_str(&line) {
                Ok(insight) => insight,
                Err(e) => {
                    warn!(
                        "Skipping unparseable insight at {}:{}: {}",
                        file_path.display(),
                        line_no + 1,
                        e
                    );
                    continue;
                }
            };
            if insight.created_at >= since && !insight.is_expired(now) {
                insights.push(insight);
            }
        }

        insights.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(insights)
    }
}
