//! In-memory storage fakes for domain-level tests.
//!
//! One `MemoryStore` implements every storage trait so service and job
//! tests run without touching the filesystem, plus a notifier that
//! records what would have been pushed.

use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use shared::{
    CombinedWeeklySummary, Domain, FinanceMonthlySummary, FinanceWeeklySummary,
    FitnessMonthlySummary, FitnessWeeklySummary,
};

use crate::domain::models::{
    BudgetSplit, DailyMetric, Expense, FinanceProfile, FitnessProfile, InsightKind, SharedInsight,
    Subject,
};
use crate::storage::traits::{
    InsightStorage, LedgerStorage, MetricStorage, ProfileStorage, PushNotifier, SummaryStorage,
};

#[derive(Default)]
struct Inner {
    subjects: Vec<Subject>,
    fitness_profiles: HashMap<String, FitnessProfile>,
    finance_profiles: HashMap<String, FinanceProfile>,
    metrics: HashMap<String, Vec<DailyMetric>>,
    expenses: HashMap<String, Vec<Expense>>,
    income: HashMap<String, Vec<(NaiveDate, f64)>>,
    savings: HashMap<String, Vec<(NaiveDate, f64)>>,
    insights: HashMap<String, Vec<SharedInsight>>,
    fitness_weekly: HashMap<(String, NaiveDate), FitnessWeeklySummary>,
    finance_weekly: HashMap<(String, NaiveDate), FinanceWeeklySummary>,
    fitness_monthly: HashMap<(String, String), FitnessMonthlySummary>,
    finance_monthly: HashMap<(String, String), FinanceMonthlySummary>,
    combined: HashMap<(String, NaiveDate), CombinedWeeklySummary>,
    fail_metric_reads_for: Option<String>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with one dual-profile subject: 2000 kcal and
    /// 2000 ml targets, UTC timezone, one push token, 3000 income on
    /// the default split, no savings goal.
    pub fn with_default_subject(subject_id: &str) -> Self {
        let store = Self::new();
        store.add_dual_profile_subject(subject_id);
        store
    }

    pub fn add_dual_profile_subject(&self, subject_id: &str) {
        self.add_fitness_only_subject(subject_id);
        let mut inner = self.inner.lock().unwrap();
        inner.finance_profiles.insert(
            subject_id.to_string(),
            FinanceProfile {
                subject_id: subject_id.to_string(),
                monthly_income: 3000.0,
                split: BudgetSplit::default(),
                savings_goal_target: None,
            },
        );
    }

    pub fn add_fitness_only_subject(&self, subject_id: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.subjects.push(Subject {
            id: subject_id.to_string(),
            display_name: subject_id.to_string(),
        });
        inner.fitness_profiles.insert(
            subject_id.to_string(),
            FitnessProfile {
                subject_id: subject_id.to_string(),
                daily_calorie_target: 2000.0,
                daily_water_target_ml: 2000.0,
                timezone: "UTC".to_string(),
                push_tokens: vec![format!("token-{}", subject_id)],
            },
        );
    }

    pub fn set_fitness_profile(&self, profile: FitnessProfile) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .fitness_profiles
            .insert(profile.subject_id.clone(), profile);
    }

    pub fn set_finance_profile(&self, profile: FinanceProfile) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .finance_profiles
            .insert(profile.subject_id.clone(), profile);
    }

    pub fn put_metric(&self, metric: DailyMetric) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .metrics
            .entry(metric.subject_id.clone())
            .or_default()
            .push(metric);
    }

    pub fn put_expense(&self, subject_id: &str, date: NaiveDate, amount: f64, category: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .expenses
            .entry(subject_id.to_string())
            .or_default()
            .push(Expense {
                date,
                amount,
                category: category.to_string(),
            });
    }

    pub fn put_income(&self, subject_id: &str, date: NaiveDate, amount: f64) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .income
            .entry(subject_id.to_string())
            .or_default()
            .push((date, amount));
    }

    pub fn put_savings(&self, subject_id: &str, date: NaiveDate, amount: f64) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .savings
            .entry(subject_id.to_string())
            .or_default()
            .push((date, amount));
    }

    /// A non-expired savings-milestone event posted two hours ago.
    pub fn put_savings_milestone_insight(
        &self,
        subject_id: &str,
        percent: f64,
        now: DateTime<Utc>,
    ) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .insights
            .entry(subject_id.to_string())
            .or_default()
            .push(SharedInsight {
                subject_id: subject_id.to_string(),
                source_domain: Domain::Finance,
                kind: InsightKind::SavingsMilestone,
                data: serde_json::json!({ "percent": percent }),
                created_at: now - Duration::hours(2),
                expires_at: now + Duration::days(7),
            });
    }

    /// Make metric reads for one subject fail, to exercise the
    /// per-subject isolation of the job loop.
    pub fn fail_metric_reads_for(&self, subject_id: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_metric_reads_for = Some(subject_id.to_string());
    }
}

impl MetricStorage for MemoryStore {
    fn get_daily_metrics(
        &self,
        subject_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyMetric>> {
        let inner = self.inner.lock().unwrap();
        if inner.fail_metric_reads_for.as_deref() == Some(subject_id) {
            anyhow::bail!("injected metric read failure for {}", subject_id);
        }
        let mut rows: Vec<DailyMetric> = inner
            .metrics
            .get(subject_id)
            .map(|v| {
                v.iter()
                    .filter(|m| m.date >= start && m.date <= end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        rows.sort_by_key(|m| m.date);
        Ok(rows)
    }
}

impl LedgerStorage for MemoryStore {
    fn get_expenses(
        &self,
        subject_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Expense>> {
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<Expense> = inner
            .expenses
            .get(subject_id)
            .map(|v| {
                v.iter()
                    .filter(|e| e.date >= start && e.date <= end)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        rows.sort_by_key(|e| e.date);
        Ok(rows)
    }

    fn get_income_total(&self, subject_id: &str, start: NaiveDate, end: NaiveDate) -> Result<f64> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .income
            .get(subject_id)
            .map(|v| {
                v.iter()
                    .filter(|(d, _)| *d >= start && *d <= end)
                    .map(|(_, a)| a)
                    .sum()
            })
            .unwrap_or(0.0))
    }

    fn get_savings_contributions(
        &self,
        subject_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<f64> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .savings
            .get(subject_id)
            .map(|v| {
                v.iter()
                    .filter(|(d, _)| *d >= start && *d <= end)
                    .map(|(_, a)| a)
                    .sum()
            })
            .unwrap_or(0.0))
    }

    fn get_savings_total(&self, subject_id: &str, end: NaiveDate) -> Result<f64> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .savings
            .get(subject_id)
            .map(|v| v.iter().filter(|(d, _)| *d <= end).map(|(_, a)| a).sum())
            .unwrap_or(0.0))
    }
}

impl ProfileStorage for MemoryStore {
    fn list_subjects(&self) -> Result<Vec<Subject>> {
        Ok(self.inner.lock().unwrap().subjects.clone())
    }

    fn get_fitness_profile(&self, subject_id: &str) -> Result<Option<FitnessProfile>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .fitness_profiles
            .get(subject_id)
            .cloned())
    }

    fn get_finance_profile(&self, subject_id: &str) -> Result<Option<FinanceProfile>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .finance_profiles
            .get(subject_id)
            .cloned())
    }
}

impl SummaryStorage for MemoryStore {
    fn get_fitness_weekly(
        &self,
        subject_id: &str,
        period_start: NaiveDate,
    ) -> Result<Option<FitnessWeeklySummary>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .fitness_weekly
            .get(&(subject_id.to_string(), period_start))
            .cloned())
    }

    fn upsert_fitness_weekly(&self, summary: &FitnessWeeklySummary) -> Result<()> {
        self.inner.lock().unwrap().fitness_weekly.insert(
            (summary.subject_id.clone(), summary.period_start),
            summary.clone(),
        );
        Ok(())
    }

    fn get_finance_weekly(
        &self,
        subject_id: &str,
        period_start: NaiveDate,
    ) -> Result<Option<FinanceWeeklySummary>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .finance_weekly
            .get(&(subject_id.to_string(), period_start))
            .cloned())
    }

    fn upsert_finance_weekly(&self, summary: &FinanceWeeklySummary) -> Result<()> {
        self.inner.lock().unwrap().finance_weekly.insert(
            (summary.subject_id.clone(), summary.period_start),
            summary.clone(),
        );
        Ok(())
    }

    fn get_fitness_monthly(
        &self,
        subject_id: &str,
        month: &str,
    ) -> Result<Option<FitnessMonthlySummary>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .fitness_monthly
            .get(&(subject_id.to_string(), month.to_string()))
            .cloned())
    }

    fn upsert_fitness_monthly(&self, summary: &FitnessMonthlySummary) -> Result<()> {
        self.inner.lock().unwrap().fitness_monthly.insert(
            (summary.subject_id.clone(), summary.month.clone()),
            summary.clone(),
        );
        Ok(())
    }

    fn get_finance_monthly(
        &self,
        subject_id: &str,
        month: &str,
    ) -> Result<Option<FinanceMonthlySummary>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .finance_monthly
            .get(&(subject_id.to_string(), month.to_string()))
            .cloned())
    }

    fn upsert_finance_monthly(&self, summary: &FinanceMonthlySummary) -> Result<()> {
        self.inner.lock().unwrap().finance_monthly.insert(
            (summary.subject_id.clone(), summary.month.clone()),
            summary.clone(),
        );
        Ok(())
    }

    fn get_combined_weekly(
        &self,
        subject_id: &str,
        period_start: NaiveDate,
    ) -> Result<Option<CombinedWeeklySummary>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .combined
            .get(&(subject_id.to_string(), period_start))
            .cloned())
    }

    fn upsert_combined_weekly(&self, summary: &CombinedWeeklySummary) -> Result<()> {
        self.inner.lock().unwrap().combined.insert(
            (summary.subject_id.clone(), summary.period_start),
            summary.clone(),
        );
        Ok(())
    }

    fn mark_combined_viewed(
        &self,
        subject_id: &str,
        period_start: NaiveDate,
    ) -> Result<Option<CombinedWeeklySummary>> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner
            .combined
            .get_mut(&(subject_id.to_string(), period_start))
            .map(|record| {
                record.viewed = true;
                record.clone()
            }))
    }
}

impl InsightStorage for MemoryStore {
    fn get_shared_insights(
        &self,
        subject_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<SharedInsight>> {
        let now = Utc::now();
        let inner = self.inner.lock().unwrap();
        let mut rows: Vec<SharedInsight> = inner
            .insights
            .get(subject_id)
            .map(|v| {
                v.iter()
                    .filter(|i| i.created_at >= since && !i.is_expired(now))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}

/// Notifier that records pushes as (tokens, title, body) tuples.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(Vec<String>, String, String)>>,
}

impl PushNotifier for RecordingNotifier {
    fn send_push(
        &self,
        tokens: &[String],
        title: &str,
        body: &str,
        _data: &serde_json::Value,
    ) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((tokens.to_vec(), title.to_string(), body.to_string()));
        Ok(())
    }
}
