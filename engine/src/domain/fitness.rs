//! Fitness summary service.
//!
//! Builds the weekly and monthly fitness summaries for a subject:
//! metric rows in, breakdown + streaks + trends + highlights out, then
//! an idempotent upsert. Recomputing from unchanged inputs yields an
//! identical record except `is_complete` and `updated_at`, which track
//! the wall clock.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use log::info;
use std::sync::Arc;

use shared::{FitnessMonthlySummary, FitnessWeeklySummary};

use crate::domain::breakdown::{self, FitnessTargets};
use crate::domain::calendar;
use crate::domain::commands::summaries::{BuildMonthlySummaryCommand, BuildWeeklySummaryCommand};
use crate::domain::{insights, streak, trend};
use crate::storage::traits::{MetricStorage, ProfileStorage, SummaryStorage};

#[derive(Clone)]
pub struct FitnessSummaryService {
    metrics: Arc<dyn MetricStorage>,
    profiles: Arc<dyn ProfileStorage>,
    summaries: Arc<dyn SummaryStorage>,
}

impl FitnessSummaryService {
    pub fn new(
        metrics: Arc<dyn MetricStorage>,
        profiles: Arc<dyn ProfileStorage>,
        summaries: Arc<dyn SummaryStorage>,
    ) -> Self {
        Self {
            metrics,
            profiles,
            summaries,
        }
    }

    /// Build and persist the weekly summary for the week containing
    /// the command's anchor date.
    pub fn refresh_weekly(
        &self,
        command: BuildWeeklySummaryCommand,
        now_utc: DateTime<Utc>,
    ) -> Result<FitnessWeeklySummary> {
        let summary = self.build_weekly(&command, now_utc)?;
        self.summaries.upsert_fitness_weekly(&summary)?;
        info!(
            "📊 FITNESS: Upserted weekly summary for {} week {} ({} active days, streak {})",
            summary.subject_id, summary.period_start, summary.active_days, summary.longest_streak
        );
        Ok(summary)
    }

    /// Pure recompute of the weekly summary; no writes.
    pub fn build_weekly(
        &self,
        command: &BuildWeeklySummaryCommand,
        now_utc: DateTime<Utc>,
    ) -> Result<FitnessWeeklySummary> {
        let (monday, sunday) = calendar::week_bounds(command.anchor, 0);
        let profile = self
            .profiles
            .get_fitness_profile(&command.subject_id)?
            .ok_or_else(|| {
                anyhow::anyhow!("No fitness profile for subject {}", command.subject_id)
            })?;
        let today = calendar::local_today(now_utc, &profile.timezone);

        let metrics = self
            .metrics
            .get_daily_metrics(&command.subject_id, monday, sunday)?;
        let targets = FitnessTargets {
            daily_calories: profile.daily_calorie_target,
            daily_water_ml: profile.daily_water_target_ml,
        };
        let daily_breakdown = breakdown::build_week_breakdown(monday, &metrics, targets, today);

        let logged_days = daily_breakdown
            .iter()
            .filter(|d| streak::is_active_day(d))
            .count() as u32;
        let (avg_calories, avg_water_ml) = averages(&daily_breakdown, logged_days);
        let avg_protein_g = divide_or_zero(
            metrics.iter().map(|m| m.total_protein_g).sum::<f64>(),
            logged_days,
        );
        let total_workouts: u32 = metrics.iter().map(|m| m.workout_count).sum();
        let total_workout_mins: u32 = metrics.iter().map(|m| m.workout_mins).sum();
        let calorie_goal_days = daily_breakdown.iter().filter(|d| d.calories_hit).count() as u32;
        let water_goal_days = daily_breakdown.iter().filter(|d| d.water_hit).count() as u32;

        let previous = self
            .summaries
            .get_fitness_weekly(&command.subject_id, monday - Duration::days(7))?;

        let mut summary = FitnessWeeklySummary {
            subject_id: command.subject_id.clone(),
            period_start: monday,
            period_end: sunday,
            avg_calories,
            avg_protein_g,
            avg_water_ml,
            total_workouts,
            total_workout_mins,
            calorie_goal_days,
            water_goal_days,
            active_days: logged_days,
            longest_streak: streak::longest_streak(&daily_breakdown),
            calorie_trend: trend::classify(avg_calories, previous.as_ref().map(|p| p.avg_calories)),
            water_trend: trend::classify(avg_water_ml, previous.as_ref().map(|p| p.avg_water_ml)),
            workout_trend: trend::classify(
                total_workouts as f64,
                previous.as_ref().map(|p| p.total_workouts as f64),
            ),
            daily_breakdown,
            highlights: Vec::new(),
            has_activity: logged_days > 0,
            is_complete: calendar::is_period_complete(sunday, now_utc),
            updated_at: now_utc.to_rfc3339(),
        };
        summary.highlights = insights::fitness_highlights(&summary);
        Ok(summary)
    }

    /// Build and persist the monthly summary for the month containing
    /// the command's anchor date.
    pub fn refresh_monthly(
        &self,
        command: BuildMonthlySummaryCommand,
        now_utc: DateTime<Utc>,
    ) -> Result<FitnessMonthlySummary> {
        let (first_day, month_label) = calendar::month_bounds(command.anchor, 0);
        let last_day = calendar::month_end(first_day);
        let profile = self
            .profiles
            .get_fitness_profile(&command.subject_id)?
            .ok_or_else(|| {
                anyhow::anyhow!("No fitness profile for subject {}", command.subject_id)
            })?;
        let today = calendar::local_today(now_utc, &profile.timezone);

        let metrics = self
            .metrics
            .get_daily_metrics(&command.subject_id, first_day, last_day)?;
        let targets = FitnessTargets {
            daily_calories: profile.daily_calorie_target,
            daily_water_ml: profile.daily_water_target_ml,
        };
        let day_count = (last_day - first_day).num_days() as u32 + 1;
        let daily_breakdown =
            breakdown::build_breakdown(first_day, day_count, &metrics, targets, today);

        let logged_days = daily_breakdown
            .iter()
            .filter(|d| streak::is_active_day(d))
            .count() as u32;
        let (avg_calories, avg_water_ml) = averages(&daily_breakdown, logged_days);
        let total_workouts: u32 = metrics.iter().map(|m| m.workout_count).sum();
        let total_workout_mins: u32 = metrics.iter().map(|m| m.workout_mins).sum();

        let (_, previous_label) = calendar::month_bounds(command.anchor, -1);
        let previous = self
            .summaries
            .get_fitness_monthly(&command.subject_id, &previous_label)?;

        let summary = FitnessMonthlySummary {
            subject_id: command.subject_id.clone(),
            month: month_label,
            period_start: first_day,
            period_end: last_day,
            avg_calories,
            avg_water_ml,
            total_workouts,
            total_workout_mins,
            calorie_goal_days: daily_breakdown.iter().filter(|d| d.calories_hit).count() as u32,
            water_goal_days: daily_breakdown.iter().filter(|d| d.water_hit).count() as u32,
            active_days: logged_days,
            longest_streak: streak::longest_streak(&daily_breakdown),
            calorie_trend: trend::classify(avg_calories, previous.as_ref().map(|p| p.avg_calories)),
            workout_trend: trend::classify(
                total_workouts as f64,
                previous.as_ref().map(|p| p.total_workouts as f64),
            ),
            daily_breakdown,
            is_complete: calendar::is_period_complete(last_day, now_utc),
            updated_at: now_utc.to_rfc3339(),
        };
        self.summaries.upsert_fitness_monthly(&summary)?;
        info!(
            "📊 FITNESS: Upserted monthly summary for {} month {}",
            summary.subject_id, summary.month
        );
        Ok(summary)
    }
}

/// Averages over days that saw any logging; an untouched week reports
/// zeros rather than diluting by empty days.
fn averages(breakdown: &[shared::DailyGoalStatus], logged_days: u32) -> (f64, f64) {
    let calories: f64 = breakdown.iter().map(|d| d.calories).sum();
    let water: f64 = breakdown.iter().map(|d| d.water_ml).sum();
    (
        divide_or_zero(calories, logged_days),
        divide_or_zero(water, logged_days),
    )
}

fn divide_or_zero(total: f64, days: u32) -> f64 {
    if days == 0 {
        0.0
    } else {
        total / days as f64
    }
}
