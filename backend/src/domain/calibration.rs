//! Calibration scheduler: cycle parsing, next-due arithmetic and urgency.
//!
//! Everything here is pure. Callers pass "today" explicitly so the rules can
//! be exercised without a clock.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Days added per cycle year. Calendar years and leap days are ignored.
pub const DAYS_PER_CYCLE_YEAR: u64 = 365;

/// Width of the inclusive due-soon window, in days.
pub const DUE_SOON_WINDOW_DAYS: i64 = 30;

/// Longest cycle accepted from a label; longer values count as malformed.
pub const MAX_CYCLE_YEARS: u32 = 100;

const FALLBACK_CYCLE_YEARS: u32 = 1;

/// Urgency bucket of a device relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    /// The next-due date has passed.
    Overdue,
    /// Due today or within the next [`DUE_SOON_WINDOW_DAYS`] days.
    DueSoon,
    /// Due later than the window.
    Safe,
}

impl Urgency {
    /// Every bucket in dashboard order.
    pub const ALL: [Self; 3] = [Self::Overdue, Self::DueSoon, Self::Safe];

    /// Colour hint for the status chart.
    #[must_use]
    pub const fn chart_colour(self) -> &'static str {
        match self {
            Self::Overdue => "red",
            Self::DueSoon => "orange",
            Self::Safe => "green",
        }
    }
}

/// Signed number of days from `today` until `next_due`.
#[must_use]
pub fn days_remaining(next_due: NaiveDate, today: NaiveDate) -> i64 {
    next_due.signed_duration_since(today).num_days()
}

/// Classify `next_due` against `today`.
///
/// ```
/// use chrono::NaiveDate;
/// use calibration_tracker::domain::{Urgency, classify};
///
/// let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
/// assert_eq!(classify(today, today), Urgency::DueSoon);
/// ```
#[must_use]
pub fn classify(next_due: NaiveDate, today: NaiveDate) -> Urgency {
    match days_remaining(next_due, today) {
        days if days < 0 => Urgency::Overdue,
        days if days <= DUE_SOON_WINDOW_DAYS => Urgency::DueSoon,
        _ => Urgency::Safe,
    }
}

/// Number of years encoded by a free-text cycle label.
///
/// The first whitespace-delimited token is parsed as a whole number of at most
/// [`MAX_CYCLE_YEARS`]; anything else yields one year so a malformed label
/// never blocks a completion.
///
/// ```
/// use calibration_tracker::domain::years_from_cycle_text;
///
/// assert_eq!(years_from_cycle_text("2 Năm/ Lần"), 2);
/// assert_eq!(years_from_cycle_text("hằng năm"), 1);
/// assert_eq!(years_from_cycle_text("99999999 Năm"), 1);
/// ```
#[must_use]
pub fn years_from_cycle_text(text: &str) -> u32 {
    text.split_whitespace()
        .next()
        .and_then(|token| token.parse::<u32>().ok())
        .filter(|years| *years <= MAX_CYCLE_YEARS)
        .unwrap_or(FALLBACK_CYCLE_YEARS)
}

/// Next-due date for a completion on `completed_on` under `cycle_text`.
///
/// Returns `None` only when the result falls past the end of the supported
/// calendar.
#[must_use]
pub fn next_due_date(completed_on: NaiveDate, cycle_text: &str) -> Option<NaiveDate> {
    let years = u64::from(years_from_cycle_text(cycle_text));
    completed_on.checked_add_days(Days::new(years * DAYS_PER_CYCLE_YEAR))
}
