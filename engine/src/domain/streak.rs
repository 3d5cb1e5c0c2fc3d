//! Streak calculations over a breakdown window.
//!
//! Two distinct questions, two distinct operations: the longest
//! contiguous run of active days anywhere in the window (what the
//! weekly summary persists), and the streak still running as of today
//! (what a "keep it going" nudge wants). They are deliberately not the
//! same number.

use chrono::NaiveDate;
use shared::DailyGoalStatus;

/// A day counts as active when anything fitness-related was logged.
/// Future days are never active.
pub fn is_active_day(day: &DailyGoalStatus) -> bool {
    !day.future && (day.calories > 0.0 || day.water_ml > 0.0 || day.workout_done)
}

/// Longest contiguous run of active days within the window. Single
/// forward scan; an inactive day resets the current run.
pub fn longest_streak(days: &[DailyGoalStatus]) -> u32 {
    let mut max_run: u32 = 0;
    let mut current_run: u32 = 0;
    for day in days {
        if is_active_day(day) {
            current_run += 1;
            max_run = max_run.max(current_run);
        } else {
            current_run = 0;
        }
    }
    max_run
}

/// Streak ending today: walk backward from `today`'s row while days
/// remain active. Days after `today` are ignored entirely, so a
/// mid-week run is not broken by the empty remainder of the window.
pub fn current_streak(days: &[DailyGoalStatus], today: NaiveDate) -> u32 {
    let mut run = 0;
    for day in days.iter().rev() {
        if day.date > today {
            continue;
        }
        if is_active_day(day) {
            run += 1;
        } else {
            break;
        }
    }
    run
}
