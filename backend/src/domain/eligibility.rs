//! Eligibility domain logic.
//!
//! A donor may give blood again once the cooldown interval has passed since
//! their most recent donation. Everything here is a pure function of the
//! donation history, the interval and today's date. Results are never stored
//! on a donor: the interval is a setting and may change between two reads.

use chrono::NaiveDate;
use shared::EligibilityFilter;

use super::date_utils::{add_days, days_between};

/// Days before the next eligible date during which a donor counts as "soon"
pub const ELIGIBLE_SOON_WINDOW_DAYS: i64 = 14;

/// Classification of a donor relative to today
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EligibilityStatus {
    NoHistory,
    EligibleNow,
    EligibleSoon { days_left: i64 },
    NotEligibleYet { days_left: i64 },
}

/// Most recent donation, if any
pub fn latest_donation(donations: &[NaiveDate]) -> Option<NaiveDate> {
    donations.iter().max().copied()
}

/// Next date the donor may donate: latest donation plus the interval.
///
/// `None` only without history; a result past the calendar's end saturates
/// to [`NaiveDate::MAX`].
pub fn next_eligible_date(donations: &[NaiveDate], interval_days: u32) -> Option<NaiveDate> {
    latest_donation(donations).map(|latest| add_days(latest, i64::from(interval_days)).unwrap_or(NaiveDate::MAX))
}

/// Days from `today` until `next_eligible` (zero or negative once eligible)
pub fn days_left(next_eligible: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    next_eligible.map(|next| days_between(today, next))
}

/// Classify a next-eligible date relative to today.
///
/// Both bounds are inclusive: 0 days left is eligible now, 14 days left is
/// still "soon".
pub fn classify(next_eligible: Option<NaiveDate>, today: NaiveDate) -> EligibilityStatus {
    match days_left(next_eligible, today) {
        None => EligibilityStatus::NoHistory,
        Some(days) if days <= 0 => EligibilityStatus::EligibleNow,
        Some(days) if days <= ELIGIBLE_SOON_WINDOW_DAYS => EligibilityStatus::EligibleSoon { days_left: days },
        Some(days) => EligibilityStatus::NotEligibleYet { days_left: days },
    }
}

/// Whether a donor with `days_left` falls into the filter's window.
///
/// Donors without history have no `days_left` and match no window.
pub fn matches_filter(filter: EligibilityFilter, days_left: Option<i64>) -> bool {
    let Some(days) = days_left else {
        return false;
    };

    match filter {
        EligibilityFilter::EligibleToday => days <= 0,
        EligibilityFilter::Next7Days => days > 0 && days <= 7,
        EligibilityFilter::Next30Days => days > 0 && days <= 30,
        EligibilityFilter::NotEligible => days > 30,
    }
}
