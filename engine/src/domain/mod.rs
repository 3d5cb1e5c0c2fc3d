//! Domain logic: calendar math, per-day breakdowns, streaks, trends,
//! budget tracking, insight rules, and the summary services that tie
//! them together.

pub mod breakdown;
pub mod budget;
pub mod calendar;
pub mod commands;
pub mod finance;
pub mod fitness;
pub mod insights;
pub mod models;
pub mod streak;
#[cfg(test)]
pub mod test_fixtures;
pub mod trend;
pub mod weekly_job;
