//! Domain-level command types.
//!
//! These structs are the inputs to the summary services. They stay
//! internal to the engine; the records the services produce (in the
//! `shared` crate) are the public contract.

pub mod summaries {
    use chrono::NaiveDate;

    /// Build (or rebuild) the weekly summary for the week containing
    /// `anchor`. Any date works; the service snaps to Monday.
    #[derive(Debug, Clone)]
    pub struct BuildWeeklySummaryCommand {
        pub subject_id: String,
        pub anchor: NaiveDate,
    }

    /// Build (or rebuild) the monthly summary for the month containing
    /// `anchor`.
    #[derive(Debug, Clone)]
    pub struct BuildMonthlySummaryCommand {
        pub subject_id: String,
        pub anchor: NaiveDate,
    }
}
