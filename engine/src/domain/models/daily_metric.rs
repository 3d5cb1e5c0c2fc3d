//! Domain models for raw activity logs.
//!
//! These rows are produced incrementally by the logging subsystem as
//! the user records workouts, meals, water and money movements. The
//! engine only ever reads them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-day rollup of everything a subject logged on one calendar date.
///
/// Invariant: at most one row per (subject, date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMetric {
    pub subject_id: String,
    pub date: NaiveDate,
    pub total_calories: f64,
    pub total_protein_g: f64,
    pub total_carbs_g: f64,
    pub total_fat_g: f64,
    pub meal_count: u32,
    pub total_water_ml: f64,
    pub workout_count: u32,
    pub workout_mins: u32,
    pub total_spent: f64,
    pub total_income: f64,
    pub expense_count: u32,
}

impl DailyMetric {
    /// An empty row for a date with no logs at all.
    pub fn empty(subject_id: &str, date: NaiveDate) -> Self {
        Self {
            subject_id: subject_id.to_string(),
            date,
            total_calories: 0.0,
            total_protein_g: 0.0,
            total_carbs_g: 0.0,
            total_fat_g: 0.0,
            meal_count: 0,
            total_water_ml: 0.0,
            workout_count: 0,
            workout_mins: 0,
            total_spent: 0.0,
            total_income: 0.0,
            expense_count: 0,
        }
    }

    /// Whether anything at all was logged on this day.
    pub fn has_any_log(&self) -> bool {
        self.total_calories > 0.0
            || self.total_water_ml > 0.0
            || self.meal_count > 0
            || self.workout_count > 0
            || self.workout_mins > 0
            || self.expense_count > 0
            || self.total_income > 0.0
    }
}

/// A single categorized expense, as read from the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub date: NaiveDate,
    pub amount: f64,
    pub category: String,
}
