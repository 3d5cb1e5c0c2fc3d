//! Budget classification and month-to-date tracking.
//!
//! Spending categories map onto the needs/wants/savings split; the
//! monthly budget for each bucket derives from the subject's configured
//! income and split ratios. Everything here is pure arithmetic over
//! inputs the caller already fetched.

use chrono::{Datelike, NaiveDate};
use shared::{AlertLevel, BucketTracking, BudgetStatus, BudgetTracking};

use crate::domain::calendar;
use crate::domain::models::{BudgetSplit, Expense};

/// The three budget buckets of the configured split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BudgetBucket {
    Needs,
    Wants,
    Savings,
}

/// Static category-to-bucket lookup. Unknown categories are wants: the
/// safe default for discretionary-looking spend.
pub fn classify_category(category: &str) -> BudgetBucket {
    match category.trim().to_lowercase().as_str() {
        "groceries" | "rent" | "mortgage" | "utilities" | "transport" | "transportation"
        | "healthcare" | "insurance" | "childcare" => BudgetBucket::Needs,
        "savings" | "investment" | "investments" | "debt payment" | "retirement" => {
            BudgetBucket::Savings
        }
        _ => BudgetBucket::Wants,
    }
}

/// Alert tier from percent-used. All four tiers are computed here;
/// consumers that only care about three collapse Danger into Warning.
pub fn alert_level(percent_used: f64) -> AlertLevel {
    if percent_used >= 100.0 {
        AlertLevel::Over
    } else if percent_used >= 90.0 {
        AlertLevel::Danger
    } else if percent_used >= 80.0 {
        AlertLevel::Warning
    } else {
        AlertLevel::Ok
    }
}

/// Percent of a budget consumed. A non-positive budget reports 0 so a
/// missing configuration never divides by zero or false-alarms.
pub fn percent_used(spent: f64, budget: f64) -> f64 {
    if budget <= 0.0 {
        0.0
    } else {
        spent / budget * 100.0
    }
}

/// Build the month-to-date budget snapshot for the month containing
/// `today`, from that month's expenses.
pub fn track_month(
    monthly_income: f64,
    split: BudgetSplit,
    expenses: &[Expense],
    today: NaiveDate,
) -> BudgetTracking {
    let mut spent_needs = 0.0;
    let mut spent_wants = 0.0;
    let mut spent_savings = 0.0;
    for expense in expenses {
        match classify_category(&expense.category) {
            BudgetBucket::Needs => spent_needs += expense.amount,
            BudgetBucket::Wants => spent_wants += expense.amount,
            BudgetBucket::Savings => spent_savings += expense.amount,
        }
    }

    let needs = bucket_tracking(monthly_income * split.needs, spent_needs);
    let wants = bucket_tracking(monthly_income * split.wants, spent_wants);
    let savings = bucket_tracking(monthly_income * split.savings, spent_savings);

    let days_left = calendar::days_left_in_month(today);
    let discretionary_remaining = needs.remaining + wants.remaining;
    let daily_safe_spend = (discretionary_remaining / days_left as f64).max(0.0);

    BudgetTracking {
        month: format!("{:04}-{:02}", today.year(), today.month()),
        needs,
        wants,
        savings,
        daily_safe_spend,
        days_left_in_month: days_left,
    }
}

/// Overall month-to-date position: under once total spend is inside
/// the total budget, `NoBudget` when no income is configured.
pub fn budget_status(tracking: &BudgetTracking) -> BudgetStatus {
    let total_budget = tracking.needs.budget + tracking.wants.budget + tracking.savings.budget;
    if total_budget <= 0.0 {
        return BudgetStatus::NoBudget;
    }
    let total_spent = tracking.needs.spent + tracking.wants.spent + tracking.savings.spent;
    if total_spent <= total_budget {
        BudgetStatus::Under
    } else {
        BudgetStatus::Over
    }
}

fn bucket_tracking(budget: f64, spent: f64) -> BucketTracking {
    let pct = percent_used(spent, budget);
    BucketTracking {
        budget,
        spent,
        remaining: budget - spent,
        percent_used: pct,
        alert_level: alert_level(pct),
    }
}
