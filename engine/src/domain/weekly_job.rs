//! Weekly insight job.
//!
//! The scheduled pass over all subjects: gate each subject on their
//! local Sunday-evening window, rebuild both domain summaries, merge
//! them into the combined record, persist it and fire one push. One
//! subject's failure never touches another's run; the job classifies
//! and logs it, then moves on.

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use std::sync::Arc;

use shared::CombinedWeeklySummary;

use crate::domain::calendar;
use crate::domain::commands::summaries::{BuildMonthlySummaryCommand, BuildWeeklySummaryCommand};
use crate::domain::finance::FinanceSummaryService;
use crate::domain::fitness::FitnessSummaryService;
use crate::domain::insights;
use crate::domain::models::{FitnessProfile, InsightKind};
use crate::storage::traits::{InsightStorage, ProfileStorage, PushNotifier, SummaryStorage};

/// Per-subject failure classification. Nothing here ever escapes the
/// subject loop; it exists so the log line says which side of the
/// contract broke.
#[derive(Debug, thiserror::Error)]
pub enum SubjectRunError {
    #[error("read failure: {0}")]
    Read(anyhow::Error),
    #[error("write failure: {0}")]
    Write(anyhow::Error),
    #[error("notification failure: {0}")]
    Notify(anyhow::Error),
}

/// Outcome counts for one tick, for the run-summary log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub processed: u32,
    pub skipped: u32,
    pub failed: u32,
}

pub struct WeeklyInsightJob {
    profiles: Arc<dyn ProfileStorage>,
    summaries: Arc<dyn SummaryStorage>,
    insight_feed: Arc<dyn InsightStorage>,
    notifier: Arc<dyn PushNotifier>,
    fitness: FitnessSummaryService,
    finance: FinanceSummaryService,
}

impl WeeklyInsightJob {
    pub fn new(
        profiles: Arc<dyn ProfileStorage>,
        summaries: Arc<dyn SummaryStorage>,
        insight_feed: Arc<dyn InsightStorage>,
        notifier: Arc<dyn PushNotifier>,
        fitness: FitnessSummaryService,
        finance: FinanceSummaryService,
    ) -> Self {
        Self {
            profiles,
            summaries,
            insight_feed,
            notifier,
            fitness,
            finance,
        }
    }

    /// One pass over all subjects. Only subjects with both a fitness
    /// and a finance profile are eligible; the fitness profile's
    /// timezone is canonical for the trigger window. `force` bypasses
    /// the window gate for manual reruns.
    pub fn run_tick(&self, now_utc: DateTime<Utc>, force: bool) -> Result<TickReport> {
        let subjects = self.profiles.list_subjects()?;
        info!(
            "⏰ WEEKLY JOB: Tick at {} over {} subjects (force={})",
            now_utc.to_rfc3339(),
            subjects.len(),
            force
        );

        let mut report = TickReport::default();
        for subject in subjects {
            let profile_pair = self
                .profiles
                .get_fitness_profile(&subject.id)
                .and_then(|fit| {
                    Ok((fit, self.profiles.get_finance_profile(&subject.id)?))
                });
            let fitness_profile = match profile_pair {
                Ok((Some(fit), Some(_))) => fit,
                Ok(_) => {
                    // Single-profile subjects get per-domain summaries
                    // elsewhere; the combined pass is not for them.
                    debug!("Skipping {}: not a dual-profile subject", subject.id);
                    report.skipped += 1;
                    continue;
                }
                Err(e) => {
                    error!("Failed to load profiles for {}: {}", subject.id, e);
                    report.failed += 1;
                    continue;
                }
            };

            if !force && !calendar::in_trigger_window(now_utc, &fitness_profile.timezone) {
                report.skipped += 1;
                continue;
            }

            match self.run_subject(&subject.id, &fitness_profile, now_utc) {
                Ok(combined) => {
                    info!(
                        "✅ WEEKLY JOB: {} done ({} team wins)",
                        subject.id,
                        combined.team_wins.len()
                    );
                    report.processed += 1;
                }
                Err(e) => {
                    error!("Weekly run failed for {}: {}", subject.id, e);
                    report.failed += 1;
                }
            }
        }

        info!(
            "⏰ WEEKLY JOB: Tick complete - {} processed, {} skipped, {} failed",
            report.processed, report.skipped, report.failed
        );
        Ok(report)
    }

    /// Build, persist and announce one subject's combined week.
    fn run_subject(
        &self,
        subject_id: &str,
        fitness_profile: &FitnessProfile,
        now_utc: DateTime<Utc>,
    ) -> Result<CombinedWeeklySummary, SubjectRunError> {
        let anchor = calendar::local_today(now_utc, &fitness_profile.timezone);
        let weekly = BuildWeeklySummaryCommand {
            subject_id: subject_id.to_string(),
            anchor,
        };

        let fitness = self
            .fitness
            .build_weekly(&weekly, now_utc)
            .map_err(SubjectRunError::Read)?;
        self.summaries
            .upsert_fitness_weekly(&fitness)
            .map_err(SubjectRunError::Write)?;

        let finance = self
            .finance
            .build_weekly(&weekly, now_utc)
            .map_err(SubjectRunError::Read)?;
        self.summaries
            .upsert_finance_weekly(&finance)
            .map_err(SubjectRunError::Write)?;

        // Current-month summaries ride along on the same tick; they
        // are idempotent, and a hiccup here must not sink the week.
        let monthly = BuildMonthlySummaryCommand {
            subject_id: subject_id.to_string(),
            anchor,
        };
        if let Err(e) = self.fitness.refresh_monthly(monthly.clone(), now_utc) {
            warn!("Monthly fitness refresh failed for {}: {}", subject_id, e);
        }
        if let Err(e) = self.finance.refresh_monthly(monthly, now_utc) {
            warn!("Monthly finance refresh failed for {}: {}", subject_id, e);
        }

        // Cross-domain events posted during the week.
        let week_start_utc = fitness
            .period_start
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always valid")
            .and_utc();
        let shared_insights = self
            .insight_feed
            .get_shared_insights(subject_id, week_start_utc)
            .map_err(SubjectRunError::Read)?;
        for event in &shared_insights {
            debug!("Shared insight for {}: {}", subject_id, event.describe());
        }
        // A savings milestone event can stand in for a configured goal
        // when scoring wins; the persisted summary stays a pure
        // recompute of its own inputs.
        let mut wins_view = finance.clone();
        if wins_view.savings_progress_pct.is_none() {
            wins_view.savings_progress_pct = shared_insights
                .iter()
                .filter(|e| e.kind == InsightKind::SavingsMilestone)
                .find_map(|e| e.percent());
        }

        let team_wins = insights::team_wins(&fitness, &wins_view);
        let insight =
            insights::select_insight(Some(&fitness), Some(&finance), &team_wins).map(|i| i.message());

        let combined = CombinedWeeklySummary {
            subject_id: subject_id.to_string(),
            period_start: fitness.period_start,
            period_end: fitness.period_end,
            fitness: Some(fitness),
            finance: Some(finance),
            team_wins,
            insight,
            viewed: false,
            updated_at: now_utc.to_rfc3339(),
        };
        self.summaries
            .upsert_combined_weekly(&combined)
            .map_err(SubjectRunError::Write)?;

        self.dispatch_push(&combined, fitness_profile)?;
        Ok(combined)
    }

    fn dispatch_push(
        &self,
        combined: &CombinedWeeklySummary,
        profile: &FitnessProfile,
    ) -> Result<(), SubjectRunError> {
        if profile.push_tokens.is_empty() {
            debug!("No push tokens for {}, skipping notification", combined.subject_id);
            return Ok(());
        }
        let body = match combined.team_wins.len() {
            0 => "Your weekly summary is ready".to_string(),
            1 => "1 team win this week - tap to see your summary".to_string(),
            n => format!("{} team wins this week - tap to see your summary", n),
        };
        let data = serde_json::json!({
            "type": "weekly_summary",
            "period_start": combined.period_start,
        });
        self.notifier
            .send_push(&profile.push_tokens, "Your week in review", &body, &data)
            .map_err(SubjectRunError::Notify)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::DailyMetric;
    use crate::domain::test_fixtures::{MemoryStore, RecordingNotifier};
    use crate::storage::traits::SummaryStorage;
    use chrono::{NaiveDate, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // Sunday 2025-06-08 19:05 UTC: inside the window for UTC subjects.
    fn sunday_evening() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 8, 19, 5, 0).unwrap()
    }

    fn job(store: &Arc<MemoryStore>, notifier: &Arc<RecordingNotifier>) -> WeeklyInsightJob {
        WeeklyInsightJob::new(
            store.clone(),
            store.clone(),
            store.clone(),
            notifier.clone(),
            FitnessSummaryService::new(store.clone(), store.clone(), store.clone()),
            FinanceSummaryService::new(store.clone(), store.clone(), store.clone()),
        )
    }

    /// The end-to-end scenario: 4 workouts (180 mins), calorie goal on
    /// 5 of 7 days, water goal every day, a silent finance week.
    fn seed_strong_fitness_week(store: &MemoryStore) {
        for offset in 0..7 {
            let mut m = DailyMetric::empty("s1", date(2025, 6, 2 + offset));
            // Days 0-4 land inside the ±10% band; days 5-6 miss low.
            m.total_calories = if offset < 5 { 2100.0 } else { 1200.0 };
            m.total_water_ml = 2500.0;
            if offset % 2 == 0 {
                m.workout_count = 1;
                m.workout_mins = 45;
            }
            store.put_metric(m);
        }
    }

    #[test]
    fn test_end_to_end_fitness_only_week() {
        let store = Arc::new(MemoryStore::with_default_subject("s1"));
        seed_strong_fitness_week(&store);
        let notifier = Arc::new(RecordingNotifier::default());

        let report = job(&store, &notifier).run_tick(sunday_evening(), false).unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.failed, 0);

        let combined = store
            .get_combined_weekly("s1", date(2025, 6, 2))
            .unwrap()
            .expect("combined record persisted");
        let fitness = combined.fitness.as_ref().unwrap();
        assert_eq!(fitness.total_workouts, 4);
        assert_eq!(fitness.total_workout_mins, 180);
        assert_eq!(
            fitness.highlights,
            vec![
                "Hit calorie goal 5 of 7 days".to_string(),
                "Hit water goal every day".to_string(),
                "4 workouts this week".to_string(),
            ]
        );
        let finance = combined.finance.as_ref().unwrap();
        assert!(!finance.has_activity);
        // An idle finance agent disqualifies every cross-domain rule.
        assert!(combined.team_wins.is_empty());
        assert_eq!(
            combined.insight.as_deref(),
            Some(insights::WeeklyInsight::FitnessOnly.message().as_str())
        );
        assert!(!combined.viewed);

        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].2, "Your weekly summary is ready");
    }

    #[test]
    fn test_active_week_under_budget_earns_team_wins() {
        let store = Arc::new(MemoryStore::with_default_subject("s1"));
        seed_strong_fitness_week(&store);
        // Modest spending, well under the 3000 income budget.
        store.put_expense("s1", date(2025, 6, 3), 30.0, "groceries");
        store.put_expense("s1", date(2025, 6, 5), 20.0, "transport");
        let notifier = Arc::new(RecordingNotifier::default());

        job(&store, &notifier).run_tick(sunday_evening(), false).unwrap();
        let combined = store
            .get_combined_weekly("s1", date(2025, 6, 2))
            .unwrap()
            .unwrap();
        assert!(combined
            .team_wins
            .iter()
            .any(|w| w.contains("Active week and under budget")));
        assert_eq!(combined.team_wins.len(), 3);
        assert_eq!(
            combined.insight.as_deref(),
            Some(insights::WeeklyInsight::TeamEffort.message().as_str())
        );
    }

    #[test]
    fn test_single_profile_subject_is_skipped() {
        let store = Arc::new(MemoryStore::with_default_subject("s1"));
        store.add_fitness_only_subject("s2");
        let notifier = Arc::new(RecordingNotifier::default());

        let report = job(&store, &notifier).run_tick(sunday_evening(), false).unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.skipped, 1);
        assert!(store.get_combined_weekly("s2", date(2025, 6, 2)).unwrap().is_none());
    }

    #[test]
    fn test_outside_trigger_window_is_skipped_unless_forced() {
        let store = Arc::new(MemoryStore::with_default_subject("s1"));
        let notifier = Arc::new(RecordingNotifier::default());
        let saturday = Utc.with_ymd_and_hms(2025, 6, 7, 19, 30, 0).unwrap();

        let report = job(&store, &notifier).run_tick(saturday, false).unwrap();
        assert_eq!(report.processed, 0);
        assert_eq!(report.skipped, 1);

        let report = job(&store, &notifier).run_tick(saturday, true).unwrap();
        assert_eq!(report.processed, 1);
    }

    #[test]
    fn test_one_failing_subject_does_not_abort_the_rest() {
        let store = Arc::new(MemoryStore::with_default_subject("s1"));
        store.add_dual_profile_subject("s2");
        store.fail_metric_reads_for("s1");
        let notifier = Arc::new(RecordingNotifier::default());

        let report = job(&store, &notifier).run_tick(sunday_evening(), false).unwrap();
        assert_eq!(report.failed, 1);
        assert_eq!(report.processed, 1);
        assert!(store.get_combined_weekly("s2", date(2025, 6, 2)).unwrap().is_some());
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let store = Arc::new(MemoryStore::with_default_subject("s1"));
        seed_strong_fitness_week(&store);
        let notifier = Arc::new(RecordingNotifier::default());
        let j = job(&store, &notifier);

        j.run_tick(sunday_evening(), false).unwrap();
        let first = store.get_combined_weekly("s1", date(2025, 6, 2)).unwrap().unwrap();
        j.run_tick(sunday_evening(), false).unwrap();
        let second = store.get_combined_weekly("s1", date(2025, 6, 2)).unwrap().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_savings_milestone_event_feeds_team_wins() {
        let store = Arc::new(MemoryStore::with_default_subject("s1"));
        // A modest week: two logged days, one workout, so the
        // higher-priority fitness wins stay quiet and the savings win
        // survives the cap.
        for offset in [0, 3] {
            let mut m = DailyMetric::empty("s1", date(2025, 6, 2 + offset));
            m.total_water_ml = 1000.0;
            if offset == 0 {
                m.workout_count = 1;
                m.workout_mins = 30;
            }
            store.put_metric(m);
        }
        store.put_expense("s1", date(2025, 6, 3), 30.0, "groceries");
        store.put_savings_milestone_insight("s1", 75.0, sunday_evening());
        let notifier = Arc::new(RecordingNotifier::default());

        job(&store, &notifier).run_tick(sunday_evening(), false).unwrap();
        let combined = store
            .get_combined_weekly("s1", date(2025, 6, 2))
            .unwrap()
            .unwrap();
        assert_eq!(
            combined.finance.as_ref().unwrap().savings_progress_pct,
            None,
            "persisted finance summary keeps its own (absent) goal progress"
        );
        assert!(combined
            .team_wins
            .iter()
            .any(|w| w.contains("75% of the way to the savings goal")));
    }

    #[test]
    fn test_viewed_flips_on_first_read() {
        let store = Arc::new(MemoryStore::with_default_subject("s1"));
        let notifier = Arc::new(RecordingNotifier::default());
        job(&store, &notifier).run_tick(sunday_evening(), false).unwrap();

        let first = store.mark_combined_viewed("s1", date(2025, 6, 2)).unwrap().unwrap();
        assert!(first.viewed);
        let stored = store.get_combined_weekly("s1", date(2025, 6, 2)).unwrap().unwrap();
        assert!(stored.viewed);
    }
}
