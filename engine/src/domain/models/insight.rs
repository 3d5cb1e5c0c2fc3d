//! Shared-insight events exchanged between the domain agents.
//!
//! These originate outside the engine (each agent posts them as it
//! reacts to logs); the combined weekly pass only reads the non-expired
//! ones. The kind is a closed enum with one formatter per variant, so
//! adding a new kind is a compile-time-checked change instead of a
//! silent string-switch fallthrough.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::Domain;

/// The closed set of cross-domain event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    OverspendAlert,
    SavingsMilestone,
    WorkoutCompleted,
    CalorieGoalHit,
    BudgetReset,
    /// Forward-compatibility catch-all for kinds this build does not
    /// know about yet.
    #[serde(other)]
    Other,
}

/// A typed event one domain shares with the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedInsight {
    pub subject_id: String,
    pub source_domain: Domain,
    pub kind: InsightKind,
    /// Kind-specific payload, e.g. `{"percent": 62.5}` for a savings
    /// milestone.
    #[serde(default)]
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SharedInsight {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Human-readable one-liner for logs and diagnostics.
    pub fn describe(&self) -> String {
        match self.kind {
            InsightKind::OverspendAlert => format!(
                "{} agent flagged an overspend ({})",
                self.source_domain,
                self.data_summary()
            ),
            InsightKind::SavingsMilestone => format!(
                "savings milestone reached ({})",
                self.data_summary()
            ),
            InsightKind::WorkoutCompleted => "workout completed".to_string(),
            InsightKind::CalorieGoalHit => "calorie goal hit".to_string(),
            InsightKind::BudgetReset => "monthly budget reset".to_string(),
            InsightKind::Other => format!("unrecognized {} event", self.source_domain),
        }
    }

    /// Percent value carried by milestone payloads, when present.
    pub fn percent(&self) -> Option<f64> {
        self.data.get("percent").and_then(|v| v.as_f64())
    }

    fn data_summary(&self) -> String {
        match self.percent() {
            Some(pct) => format!("{:.0}%", pct),
            None => "no detail".to_string(),
        }
    }
}
