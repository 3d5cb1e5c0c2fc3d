//! Per-subject configuration models.

use serde::{Deserialize, Serialize};

/// Fitness-domain profile: goal targets plus the subject's canonical
/// timezone and push tokens. The timezone here gates the weekly job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessProfile {
    pub subject_id: String,
    pub daily_calorie_target: f64,
    pub daily_water_target_ml: f64,
    /// IANA name, e.g. "America/New_York". Unrecognized values fall
    /// back to UTC at the call site.
    pub timezone: String,
    #[serde(default)]
    pub push_tokens: Vec<String>,
}

/// Finance-domain profile: persona-level monthly income and the
/// needs/wants/savings split the budgets derive from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceProfile {
    pub subject_id: String,
    pub monthly_income: f64,
    #[serde(default)]
    pub split: BudgetSplit,
    /// Target amount for the subject's savings goal, if one is set.
    #[serde(default)]
    pub savings_goal_target: Option<f64>,
}

/// Budget split ratios. The engine default is the classic 50/30/20;
/// subjects can configure their own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetSplit {
    pub needs: f64,
    pub wants: f64,
    pub savings: f64,
}

impl Default for BudgetSplit {
    fn default() -> Self {
        Self {
            needs: 0.50,
            wants: 0.30,
            savings: 0.20,
        }
    }
}

/// A subject known to the engine, from the subject roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub display_name: String,
}
