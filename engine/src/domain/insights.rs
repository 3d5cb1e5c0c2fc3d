//! Rule-based highlight and insight selection.
//!
//! Per-domain highlights and cross-domain team wins are fixed rule
//! lists evaluated in a fixed priority order; only the first three
//! triggered rules survive truncation, so the ordering is a contract.
//! The headline insight is a closed enum with one message per variant,
//! chosen by a priority ladder.

use shared::{BudgetStatus, FinanceWeeklySummary, FitnessWeeklySummary};

/// Highlights per domain and team wins are both capped at 3.
pub const MAX_HIGHLIGHTS: usize = 3;

/// Fitness highlights in priority order: streak, calories, water,
/// workouts. The streak line only covers partial-week streaks; a
/// perfect 7-day week already speaks through the goal highlights.
pub fn fitness_highlights(summary: &FitnessWeeklySummary) -> Vec<String> {
    let mut highlights = Vec::new();
    if !summary.has_activity {
        return highlights;
    }

    if summary.longest_streak >= 3 && summary.longest_streak < 7 {
        highlights.push(format!("{}-day logging streak", summary.longest_streak));
    }
    if summary.calorie_goal_days >= 5 {
        highlights.push(format!(
            "Hit calorie goal {} of 7 days",
            summary.calorie_goal_days
        ));
    }
    if summary.water_goal_days == 7 {
        highlights.push("Hit water goal every day".to_string());
    } else if summary.water_goal_days >= 5 {
        highlights.push(format!(
            "Hit water goal {} of 7 days",
            summary.water_goal_days
        ));
    }
    if summary.total_workouts >= 4 {
        highlights.push(format!("{} workouts this week", summary.total_workouts));
    }

    highlights.truncate(MAX_HIGHLIGHTS);
    highlights
}

/// Finance highlights in priority order: monthly budget position,
/// logging consistency, savings movement, daily discipline.
pub fn finance_highlights(summary: &FinanceWeeklySummary) -> Vec<String> {
    let mut highlights = Vec::new();
    if !summary.has_activity {
        return highlights;
    }

    if summary.budget.is_some() && summary.budget_status == BudgetStatus::Under {
        highlights.push("On track with this month's budget".to_string());
    }
    if summary.days_with_logging >= 5 {
        highlights.push(format!(
            "Logged expenses {} of 7 days",
            summary.days_with_logging
        ));
    }
    if summary.savings_contributed > 0.0 {
        highlights.push(format!("Added ${:.2} to savings", summary.savings_contributed));
    }
    if summary.days_under_daily_budget == 7 {
        highlights.push("Stayed under daily budget every day".to_string());
    }

    highlights.truncate(MAX_HIGHLIGHTS);
    highlights
}

/// Cross-domain team wins. Both domains must have seen activity this
/// week; an idle domain disqualifies the whole list, including the
/// wins that read like single-domain achievements. Rules are
/// independent of each other and evaluated in this order.
pub fn team_wins(
    fitness: &FitnessWeeklySummary,
    finance: &FinanceWeeklySummary,
) -> Vec<String> {
    let mut wins = Vec::new();
    if !fitness.has_activity || !finance.has_activity {
        return wins;
    }

    let under_budget = finance.budget_status == BudgetStatus::Under;

    if fitness.total_workouts >= 3 && under_budget {
        wins.push("Active week and under budget - a balanced performance".to_string());
    }
    if fitness.calorie_goal_days >= 5 && !top_category_is_food(finance) {
        wins.push("Consistent nutrition tracking plus smart spending".to_string());
    }
    if fitness.total_workouts >= 5
        || (fitness.longest_streak >= 5 && fitness.total_workouts >= 3)
    {
        wins.push("Crushed fitness goals this week".to_string());
    }
    if finance.days_under_daily_budget >= 6 && under_budget {
        wins.push(format!(
            "Budget master: under daily budget {} of 7 days",
            finance.days_under_daily_budget
        ));
    }
    if let Some(pct) = finance.savings_progress_pct {
        if pct >= 50.0 {
            wins.push(format!("{:.0}% of the way to the savings goal", pct));
        }
    }
    if fitness.water_goal_days >= 5 && fitness.calorie_goal_days >= 5 {
        wins.push("Nutrition and hydration on point".to_string());
    }

    wins.truncate(MAX_HIGHLIGHTS);
    wins
}

fn top_category_is_food(finance: &FinanceWeeklySummary) -> bool {
    matches!(
        finance.top_category.as_deref().map(str::to_lowercase).as_deref(),
        Some("food") | Some("groceries") | Some("dining")
    )
}

/// The closed set of headline insights for a combined weekly record.
/// One formatter per variant; adding a variant is a compile-time
/// checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeeklyInsight {
    /// Two or more team wins this week.
    TeamEffort,
    BothStrong,
    FitnessStrong,
    FinanceStrong,
    BothActive,
    FitnessOnly,
    FinanceOnly,
}

impl WeeklyInsight {
    pub fn message(&self) -> String {
        match self {
            WeeklyInsight::TeamEffort => {
                "Your agents worked well together this week - keep the momentum going".to_string()
            }
            WeeklyInsight::BothStrong => {
                "Strong week on both fronts: fitness goals hit and budget on track".to_string()
            }
            WeeklyInsight::FitnessStrong => {
                "Fitness carried the week - a little budget attention next week rounds it out"
                    .to_string()
            }
            WeeklyInsight::FinanceStrong => {
                "Budget discipline carried the week - squeeze in a few workouts next time"
                    .to_string()
            }
            WeeklyInsight::BothActive => {
                "Both agents saw action this week - steady logging is how trends start".to_string()
            }
            WeeklyInsight::FitnessOnly => {
                "Great fitness logging this week - your finance agent is ready when you are"
                    .to_string()
            }
            WeeklyInsight::FinanceOnly => {
                "Solid money tracking this week - your fitness agent is ready when you are"
                    .to_string()
            }
        }
    }
}

/// Pick the headline insight. `None` means a quiet week; the client
/// renders its own fallback for that.
pub fn select_insight(
    fitness: Option<&FitnessWeeklySummary>,
    finance: Option<&FinanceWeeklySummary>,
    wins: &[String],
) -> Option<WeeklyInsight> {
    let fitness_active = fitness.map(|s| s.has_activity).unwrap_or(false);
    let finance_active = finance.map(|s| s.has_activity).unwrap_or(false);

    if wins.len() >= 2 {
        return Some(WeeklyInsight::TeamEffort);
    }

    match (fitness_active, finance_active) {
        (true, true) => {
            let fitness_good = fitness
                .map(|s| s.total_workouts >= 3 || s.calorie_goal_days >= 5)
                .unwrap_or(false);
            let finance_good = finance
                .map(|s| s.budget_status == BudgetStatus::Under)
                .unwrap_or(false);
            Some(match (fitness_good, finance_good) {
                (true, true) => WeeklyInsight::BothStrong,
                (true, false) => WeeklyInsight::FitnessStrong,
                (false, true) => WeeklyInsight::FinanceStrong,
                (false, false) => WeeklyInsight::BothActive,
            })
        }
        (true, false) => Some(WeeklyInsight::FitnessOnly),
        (false, true) => Some(WeeklyInsight::FinanceOnly),
        (false, false) => None,
    }
}
