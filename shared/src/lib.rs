//! Shared record types for the insight engine.
//!
//! Everything the engine persists (weekly/monthly per-domain summaries,
//! the combined weekly record) and the derived structures embedded in
//! them live here, so the mobile client's backend can deserialize the
//! same records the engine writes. All types round-trip losslessly
//! through serde_json; the storage key for every summary is the pair
//! `(subject_id, period_start)`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two independently tracked domains per subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Fitness,
    Finance,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Fitness => write!(f, "fitness"),
            Domain::Finance => write!(f, "finance"),
        }
    }
}

/// Direction of a metric compared to the previous period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// No previous period to compare against (or previous was zero).
    New,
    Up,
    Down,
    Stable,
}

/// Budget alert tier derived from percent-used thresholds.
///
/// All four tiers are always computed and persisted; some consumers
/// only distinguish three and treat `Danger` as `Warning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    Ok,
    Warning,
    Danger,
    Over,
}

/// Month-to-date budget position, rolled up across buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    Under,
    Over,
    /// No budget configured (zero or missing monthly income).
    NoBudget,
}

/// Goal status for a single calendar day inside a summary window.
///
/// Weekly breakdowns are always exactly 7 rows, Monday first. Days
/// after "today" are marked `future`: no data yet, not a miss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyGoalStatus {
    pub date: NaiveDate,
    /// 0 = Monday .. 6 = Sunday.
    pub weekday: u8,
    pub calories: f64,
    pub water_ml: f64,
    pub workout_count: u32,
    pub workout_mins: u32,
    pub calories_hit: bool,
    pub water_hit: bool,
    pub workout_done: bool,
    pub future: bool,
}

/// Tracking numbers for one budget bucket (needs, wants or savings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketTracking {
    pub budget: f64,
    pub spent: f64,
    pub remaining: f64,
    /// 0 when the bucket has no budget, never a division by zero.
    pub percent_used: f64,
    pub alert_level: AlertLevel,
}

/// Current-month budget snapshot for a subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetTracking {
    /// "YYYY-MM" label for the tracked month.
    pub month: String,
    pub needs: BucketTracking,
    pub wants: BucketTracking,
    pub savings: BucketTracking,
    /// Remaining discretionary budget spread over the days left in the
    /// month (today inclusive). Floored at 0, never negative.
    pub daily_safe_spend: f64,
    pub days_left_in_month: u32,
}

/// Weekly fitness summary, one row per (subject, week start).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessWeeklySummary {
    pub subject_id: String,
    /// Monday of the summarized week.
    pub period_start: NaiveDate,
    /// Sunday of the summarized week (period_start + 6 days).
    pub period_end: NaiveDate,
    pub avg_calories: f64,
    pub avg_protein_g: f64,
    pub avg_water_ml: f64,
    pub total_workouts: u32,
    pub total_workout_mins: u32,
    pub calorie_goal_days: u32,
    pub water_goal_days: u32,
    pub active_days: u32,
    /// Longest contiguous run of active days inside the week.
    pub longest_streak: u32,
    pub calorie_trend: Trend,
    pub water_trend: Trend,
    pub workout_trend: Trend,
    /// Always 7 rows, Monday first.
    pub daily_breakdown: Vec<DailyGoalStatus>,
    /// At most 3, in rule-priority order.
    pub highlights: Vec<String>,
    pub has_activity: bool,
    pub is_complete: bool,
    pub updated_at: String,
}

/// Weekly finance summary, one row per (subject, week start).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceWeeklySummary {
    pub subject_id: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub total_spent: f64,
    pub total_income: f64,
    pub expense_count: u32,
    /// Days in the week with at least one logged expense.
    pub days_with_logging: u32,
    /// Days whose spend stayed at or under the even daily budget.
    pub days_under_daily_budget: u32,
    pub top_category: Option<String>,
    pub budget_status: BudgetStatus,
    /// Percent progress toward the configured savings goal, if any.
    pub savings_progress_pct: Option<f64>,
    pub savings_contributed: f64,
    pub spending_trend: Trend,
    /// Month-to-date snapshot backing `budget_status`; absent when no
    /// budget is configured.
    pub budget: Option<BudgetTracking>,
    pub highlights: Vec<String>,
    pub has_activity: bool,
    pub is_complete: bool,
    pub updated_at: String,
}

/// Monthly fitness summary, one row per (subject, first of month).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessMonthlySummary {
    pub subject_id: String,
    /// "YYYY-MM" label for the month.
    pub month: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub avg_calories: f64,
    pub avg_water_ml: f64,
    pub total_workouts: u32,
    pub total_workout_mins: u32,
    pub calorie_goal_days: u32,
    pub water_goal_days: u32,
    pub active_days: u32,
    pub longest_streak: u32,
    pub calorie_trend: Trend,
    pub workout_trend: Trend,
    /// One row per calendar day of the month, first-of-month first.
    pub daily_breakdown: Vec<DailyGoalStatus>,
    pub is_complete: bool,
    pub updated_at: String,
}

/// Monthly finance summary, one row per (subject, first of month).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceMonthlySummary {
    pub subject_id: String,
    pub month: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub total_spent: f64,
    pub total_income: f64,
    pub expense_count: u32,
    pub top_category: Option<String>,
    pub spending_trend: Trend,
    pub budget: Option<BudgetTracking>,
    pub is_complete: bool,
    pub updated_at: String,
}

/// The combined weekly record the Sunday-evening job produces for
/// dual-profile subjects. A domain slot is `None` when the subject had
/// no agent/data for it that week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedWeeklySummary {
    pub subject_id: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub fitness: Option<FitnessWeeklySummary>,
    pub finance: Option<FinanceWeeklySummary>,
    /// At most 3 cross-domain wins, in rule order.
    pub team_wins: Vec<String>,
    /// Headline insight; `None` means a quiet week (the client renders
    /// its own fallback).
    pub insight: Option<String>,
    /// Flipped to true the first time a consumer reads the record.
    pub viewed: bool,
    pub updated_at: String,
}
