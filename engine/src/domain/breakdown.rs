//! Daily goal-status breakdown.
//!
//! Folds raw per-day metric rows into the ordered goal-status rows a
//! summary embeds. The weekly form is always exactly 7 rows, Monday
//! first; dates with no metric row are zero days, and dates after
//! "today" are marked future so a half-finished week never reads as a
//! string of misses.

use chrono::{Datelike, Duration, NaiveDate};
use shared::DailyGoalStatus;

use crate::domain::models::DailyMetric;

/// Relative tolerance for the calorie goal: a day hits the goal when
/// its intake lands within ±10% of the target, not merely under it.
pub const CALORIE_TOLERANCE: f64 = 0.10;

/// Daily goal targets the breakdown evaluates against.
#[derive(Debug, Clone, Copy)]
pub struct FitnessTargets {
    pub daily_calories: f64,
    pub daily_water_ml: f64,
}

/// Build the 7-row Monday-first breakdown for the week starting at
/// `week_start`.
pub fn build_week_breakdown(
    week_start: NaiveDate,
    metrics: &[DailyMetric],
    targets: FitnessTargets,
    today: NaiveDate,
) -> Vec<DailyGoalStatus> {
    build_breakdown(week_start, 7, metrics, targets, today)
}

/// Build an N-row breakdown starting at `start`. Used directly for
/// monthly windows.
pub fn build_breakdown(
    start: NaiveDate,
    days: u32,
    metrics: &[DailyMetric],
    targets: FitnessTargets,
    today: NaiveDate,
) -> Vec<DailyGoalStatus> {
    (0..days as i64)
        .map(|offset| {
            let date = start + Duration::days(offset);
            let metric = metrics.iter().find(|m| m.date == date);
            day_status(date, metric, targets, today)
        })
        .collect()
}

fn day_status(
    date: NaiveDate,
    metric: Option<&DailyMetric>,
    targets: FitnessTargets,
    today: NaiveDate,
) -> DailyGoalStatus {
    let future = date > today;
    let (calories, water_ml, workout_count, workout_mins) = match metric {
        Some(m) => (
            m.total_calories,
            m.total_water_ml,
            m.workout_count,
            m.workout_mins,
        ),
        None => (0.0, 0.0, 0, 0),
    };

    let calories_hit = !future && calories_within_band(calories, targets.daily_calories);
    let water_hit = !future && targets.daily_water_ml > 0.0 && water_ml >= targets.daily_water_ml;
    let workout_done = !future && (workout_count > 0 || workout_mins > 0);

    DailyGoalStatus {
        date,
        weekday: date.weekday().num_days_from_monday() as u8,
        calories,
        water_ml,
        workout_count,
        workout_mins,
        calories_hit,
        water_hit,
        workout_done,
        future,
    }
}

/// The calorie goal is a band, not a ceiling: zero intake never hits,
/// and anything more than 10% off target in either direction misses.
fn calories_within_band(calories: f64, target: f64) -> bool {
    if calories <= 0.0 || target <= 0.0 {
        return false;
    }
    (calories - target).abs() / target <= CALORIE_TOLERANCE
}
