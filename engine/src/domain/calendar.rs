//! Calendar arithmetic for aggregation periods.
//!
//! Weeks run Monday through Sunday (ISO). All period math happens on
//! calendar dates, not instants, so results are stable under DST and
//! arbitrary subject timezones; timezones only enter the picture for
//! the scheduled trigger window.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use log::warn;

/// Local hour (inclusive) at which the Sunday-evening job window opens.
pub const TRIGGER_HOUR: u32 = 19;

/// Get the Monday..Sunday bounds of the week containing `date`, shifted
/// by `offset_weeks`. A Sunday input belongs to the week that started
/// six days earlier, not the upcoming one.
pub fn week_bounds(date: NaiveDate, offset_weeks: i64) -> (NaiveDate, NaiveDate) {
    let days_from_monday = date.weekday().num_days_from_monday() as i64;
    let monday = date - Duration::days(days_from_monday) + Duration::weeks(offset_weeks);
    (monday, monday + Duration::days(6))
}

/// Get the first day of the month containing `date`, shifted by
/// `offset_months`, plus its "YYYY-MM" label. Year rollover is handled
/// in both directions.
pub fn month_bounds(date: NaiveDate, offset_months: i32) -> (NaiveDate, String) {
    let total_months = date.year() * 12 + date.month0() as i32 + offset_months;
    let year = total_months.div_euclid(12);
    let month = total_months.rem_euclid(12) as u32 + 1;
    let first_day = NaiveDate::from_ymd_opt(year, month, 1)
        .expect("month in 1..=12 always yields a valid first day");
    (first_day, format!("{:04}-{:02}", year, month))
}

/// Last day of the month that `first_day` opens.
pub fn month_end(first_day: NaiveDate) -> NaiveDate {
    let days = days_in_month(first_day.month(), first_day.year());
    first_day + Duration::days(days as i64 - 1)
}

/// Number of days in a given month and year.
pub fn days_in_month(month: u32, year: i32) -> u32 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Check if a year is a leap year.
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Whether `now_utc` falls inside the subject's Sunday-evening trigger
/// window (19:00 to 19:59 local wall clock). An unrecognized timezone
/// name falls back to UTC with a warning; this never errors.
pub fn in_trigger_window(now_utc: DateTime<Utc>, tz_name: &str) -> bool {
    let tz: Tz = match tz_name.parse() {
        Ok(tz) => tz,
        Err(_) => {
            warn!(
                "Unrecognized timezone '{}', falling back to UTC for trigger window",
                tz_name
            );
            chrono_tz::UTC
        }
    };
    let local = now_utc.with_timezone(&tz);
    local.weekday() == Weekday::Sun && local.hour() == TRIGGER_HOUR
}

/// The subject's local calendar date for a UTC instant, with the same
/// UTC fallback as the trigger window.
pub fn local_today(now_utc: DateTime<Utc>, tz_name: &str) -> NaiveDate {
    let tz: Tz = match tz_name.parse() {
        Ok(tz) => tz,
        Err(_) => {
            warn!("Unrecognized timezone '{}', using UTC for local date", tz_name);
            chrono_tz::UTC
        }
    };
    now_utc.with_timezone(&tz).date_naive()
}

/// Whether a period ending on `period_end` is over: true once now (UTC)
/// is past `period_end` 23:59:59.
pub fn is_period_complete(period_end: NaiveDate, now_utc: DateTime<Utc>) -> bool {
    let end_of_day = period_end
        .and_hms_opt(23, 59, 59)
        .expect("23:59:59 is always a valid time");
    now_utc.naive_utc() > end_of_day
}

/// Days remaining in `today`'s month, counting today itself. Never less
/// than 1, so it is always safe as a divisor.
pub fn days_left_in_month(today: NaiveDate) -> u32 {
    let end = month_end(today.with_day(1).unwrap_or(today));
    let left = (end - today).num_days() + 1;
    left.max(1) as u32
}
