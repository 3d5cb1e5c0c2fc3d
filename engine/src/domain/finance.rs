//! Finance summary service.
//!
//! Weekly and monthly finance summaries: ledger reads in, totals,
//! month-to-date budget snapshot, trend and highlights out, then an
//! idempotent upsert. All derived values are deterministic for a given
//! set of ledger rows; category ties break to the alphabetically last
//! name so reruns never flip the top category.

use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use log::info;
use std::collections::BTreeMap;
use std::sync::Arc;

use shared::{BudgetStatus, BudgetTracking, FinanceMonthlySummary, FinanceWeeklySummary};

use crate::domain::budget;
use crate::domain::calendar;
use crate::domain::commands::summaries::{BuildMonthlySummaryCommand, BuildWeeklySummaryCommand};
use crate::domain::models::{Expense, FinanceProfile};
use crate::domain::{insights, trend};
use crate::storage::traits::{LedgerStorage, ProfileStorage, SummaryStorage};

#[derive(Clone)]
pub struct FinanceSummaryService {
    ledger: Arc<dyn LedgerStorage>,
    profiles: Arc<dyn ProfileStorage>,
    summaries: Arc<dyn SummaryStorage>,
}

impl FinanceSummaryService {
    pub fn new(
        ledger: Arc<dyn LedgerStorage>,
        profiles: Arc<dyn ProfileStorage>,
        summaries: Arc<dyn SummaryStorage>,
    ) -> Self {
        Self {
            ledger,
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
    ) -> Result<FinanceWeeklySummary> {
        let summary = self.build_weekly(&command, now_utc)?;
        self.summaries.upsert_finance_weekly(&summary)?;
        info!(
            "💰 FINANCE: Upserted weekly summary for {} week {} (${:.2} spent, {:?})",
            summary.subject_id, summary.period_start, summary.total_spent, summary.budget_status
        );
        Ok(summary)
    }

    /// Pure recompute of the weekly summary; no writes.
    pub fn build_weekly(
        &self,
        command: &BuildWeeklySummaryCommand,
        now_utc: DateTime<Utc>,
    ) -> Result<FinanceWeeklySummary> {
        let (monday, sunday) = calendar::week_bounds(command.anchor, 0);
        let profile = self
            .profiles
            .get_finance_profile(&command.subject_id)?
            .ok_or_else(|| {
                anyhow::anyhow!("No finance profile for subject {}", command.subject_id)
            })?;
        // The job anchors on the subject's local today; deriving it
        // from `now_utc` here would slide the budget snapshot into the
        // next day (or month) for subjects west of UTC.
        let today = command.anchor;

        let expenses = self
            .ledger
            .get_expenses(&command.subject_id, monday, sunday)?;
        let total_spent: f64 = expenses.iter().map(|e| e.amount).sum();
        let expense_count = expenses.len() as u32;
        let total_income = self
            .ledger
            .get_income_total(&command.subject_id, monday, sunday)?;
        let savings_contributed =
            self.ledger
                .get_savings_contributions(&command.subject_id, monday, sunday)?;

        let tracking = self.month_to_date_tracking(&command.subject_id, &profile, today)?;
        let budget_status = match &tracking {
            Some(t) => budget::budget_status(t),
            None => BudgetStatus::NoBudget,
        };

        let spend_by_day = group_spend_by_day(&expenses);
        let days_with_logging = spend_by_day.len() as u32;
        let days_under_daily_budget = match &tracking {
            Some(t) => days_under_daily_budget(t, &spend_by_day, monday, sunday, today),
            None => 0,
        };

        let savings_progress_pct = match profile.savings_goal_target {
            Some(target) if target > 0.0 => {
                let saved = self.ledger.get_savings_total(&command.subject_id, sunday)?;
                Some(saved / target * 100.0)
            }
            _ => None,
        };

        let previous = self
            .summaries
            .get_finance_weekly(&command.subject_id, monday - Duration::days(7))?;

        let mut summary = FinanceWeeklySummary {
            subject_id: command.subject_id.clone(),
            period_start: monday,
            period_end: sunday,
            total_spent,
            total_income,
            expense_count,
            days_with_logging,
            days_under_daily_budget,
            top_category: top_category(&expenses),
            budget_status,
            savings_progress_pct,
            savings_contributed,
            spending_trend: trend::classify(
                total_spent,
                previous.as_ref().map(|p| p.total_spent),
            ),
            budget: tracking,
            highlights: Vec::new(),
            has_activity: expense_count > 0 || total_income > 0.0 || savings_contributed > 0.0,
            is_complete: calendar::is_period_complete(sunday, now_utc),
            updated_at: now_utc.to_rfc3339(),
        };
        summary.highlights = insights::finance_highlights(&summary);
        Ok(summary)
    }

    /// Build and persist the monthly summary for the month containing
    /// the command's anchor date.
    pub fn refresh_monthly(
        &self,
        command: BuildMonthlySummaryCommand,
        now_utc: DateTime<Utc>,
    ) -> Result<FinanceMonthlySummary> {
        let (first_day, month_label) = calendar::month_bounds(command.anchor, 0);
        let last_day = calendar::month_end(first_day);
        let profile = self
            .profiles
            .get_finance_profile(&command.subject_id)?
            .ok_or_else(|| {
                anyhow::anyhow!("No finance profile for subject {}", command.subject_id)
            })?;
        // The anchor is the subject's local today, same as weekly, and
        // the month bounds are derived from it, so it always falls
        // inside the summarized month.
        let today = command.anchor;

        let expenses = self
            .ledger
            .get_expenses(&command.subject_id, first_day, last_day)?;
        let total_spent: f64 = expenses.iter().map(|e| e.amount).sum();
        let total_income = self
            .ledger
            .get_income_total(&command.subject_id, first_day, last_day)?;

        let tracking = if profile.monthly_income > 0.0 {
            Some(budget::track_month(
                profile.monthly_income,
                profile.split,
                &expenses,
                today,
            ))
        } else {
            None
        };

        let (_, previous_label) = calendar::month_bounds(command.anchor, -1);
        let previous = self
            .summaries
            .get_finance_monthly(&command.subject_id, &previous_label)?;

        let summary = FinanceMonthlySummary {
            subject_id: command.subject_id.clone(),
            month: month_label,
            period_start: first_day,
            period_end: last_day,
            total_spent,
            total_income,
            expense_count: expenses.len() as u32,
            top_category: top_category(&expenses),
            spending_trend: trend::classify(
                total_spent,
                previous.as_ref().map(|p| p.total_spent),
            ),
            budget: tracking,
            is_complete: calendar::is_period_complete(last_day, now_utc),
            updated_at: now_utc.to_rfc3339(),
        };
        self.summaries.upsert_finance_monthly(&summary)?;
        info!(
            "💰 FINANCE: Upserted monthly summary for {} month {}",
            summary.subject_id, summary.month
        );
        Ok(summary)
    }

    /// Month-to-date budget snapshot for the month containing `today`.
    /// None when no income is configured, so a missing budget reads as
    /// absent rather than a wall of zeros.
    fn month_to_date_tracking(
        &self,
        subject_id: &str,
        profile: &FinanceProfile,
        today: NaiveDate,
    ) -> Result<Option<BudgetTracking>> {
        if profile.monthly_income <= 0.0 {
            return Ok(None);
        }
        let (month_first, _) = calendar::month_bounds(today, 0);
        let month_expenses = self.ledger.get_expenses(subject_id, month_first, today)?;
        Ok(Some(budget::track_month(
            profile.monthly_income,
            profile.split,
            &month_expenses,
            today,
        )))
    }
}

fn group_spend_by_day(expenses: &[Expense]) -> BTreeMap<NaiveDate, f64> {
    let mut by_day = BTreeMap::new();
    for expense in expenses {
        *by_day.entry(expense.date).or_insert(0.0) += expense.amount;
    }
    by_day
}

/// Days of the week (up to today) whose spend stayed within the even
/// daily slice of the total monthly budget. Days with no expenses
/// count as under.
fn days_under_daily_budget(
    tracking: &BudgetTracking,
    spend_by_day: &BTreeMap<NaiveDate, f64>,
    monday: NaiveDate,
    sunday: NaiveDate,
    today: NaiveDate,
) -> u32 {
    let total_budget = tracking.needs.budget + tracking.wants.budget + tracking.savings.budget;
    if total_budget <= 0.0 {
        return 0;
    }
    let (month, year) = tracking_month_number(&tracking.month);
    let daily_budget = total_budget / calendar::days_in_month(month, year) as f64;

    let mut count = 0;
    let mut day = monday;
    while day <= sunday && day <= today {
        let spent = spend_by_day.get(&day).copied().unwrap_or(0.0);
        if spent <= daily_budget {
            count += 1;
        }
        day += Duration::days(1);
    }
    count
}

/// Parse a "YYYY-MM" label into (month, year); falls back to January
/// of year 1 on a malformed label, which only skews a derived count.
fn tracking_month_number(label: &str) -> (u32, i32) {
    let mut parts = label.splitn(2, '-');
    let year = parts.next().and_then(|y| y.parse().ok()).unwrap_or(1);
    let month = parts.next().and_then(|m| m.parse().ok()).unwrap_or(1);
    (month, year)
}

/// Category with the largest summed spend. `max_by` over the sorted
/// map keeps the last maximal entry, so ties go to the alphabetically
/// last category, the same one on every rerun.
fn top_category(expenses: &[Expense]) -> Option<String> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for expense in expenses {
        *totals.entry(expense.category.as_str()).or_insert(0.0) += expense.amount;
    }
    totals
        .into_iter()
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(category, _)| category.to_string())
}
