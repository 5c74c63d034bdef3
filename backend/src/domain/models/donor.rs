//! Domain model for a blood donor.

use chrono::NaiveDate;
use shared::BloodGroup;
use uuid::Uuid;

use crate::domain::eligibility::{self, EligibilityStatus};

/// Longest accepted display name
pub const MAX_NAME_LENGTH: usize = 100;

/// Domain model representing a donor and their donation history.
///
/// `donations` is treated as a set of donation events. Storage order is
/// insertion order; anything that needs "most recent" takes the maximum.
#[derive(Debug, Clone, PartialEq)]
pub struct Donor {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub blood_group: BloodGroup,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub donations: Vec<NaiveDate>,
}

impl Donor {
    /// Generate a fresh opaque donor id
    pub fn generate_id() -> String {
        format!("donor::{}", Uuid::new_v4().simple())
    }

    pub fn last_donation(&self) -> Option<NaiveDate> {
        eligibility::latest_donation(&self.donations)
    }

    /// Add a donation date unless it is already recorded
    pub fn merge_donation(&mut self, date: NaiveDate) -> bool {
        if self.donations.contains(&date) {
            return false;
        }
        self.donations.push(date);
        true
    }

    /// Drop every occurrence of `date`, returning how many were removed
    pub fn remove_donation(&mut self, date: NaiveDate) -> usize {
        let before = self.donations.len();
        self.donations.retain(|d| *d != date);
        before - self.donations.len()
    }

    /// Case-insensitive substring match on the name
    pub fn name_contains(&self, needle_lowercase: &str) -> bool {
        self.name.to_lowercase().contains(needle_lowercase)
    }
}

/// A donor together with the eligibility derived for a given day and interval
#[derive(Debug, Clone, PartialEq)]
pub struct DonorView {
    pub donor: Donor,
    pub last_donation: Option<NaiveDate>,
    pub next_eligible_date: Option<NaiveDate>,
    pub eligibility: EligibilityStatus,
}

impl DonorView {
    pub fn build(donor: Donor, interval_days: u32, today: NaiveDate) -> Self {
        let next_eligible_date = eligibility::next_eligible_date(&donor.donations, interval_days);
        Self {
            last_donation: donor.last_donation(),
            next_eligible_date,
            eligibility: eligibility::classify(next_eligible_date, today),
            donor,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DonorValidationError {
    #[error("Donor name cannot be empty")]
    EmptyName,
    #[error("Donor name cannot exceed 100 characters")]
    NameTooLong,
}

/// Trim and validate a display name
pub fn validate_name(name: &str) -> Result<String, DonorValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DonorValidationError::EmptyName);
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(DonorValidationError::NameTooLong);
    }
    Ok(trimmed.to_string())
}

/// Optional free-text field: trimmed, blank means absent
pub fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn donor(donations: Vec<NaiveDate>) -> Donor {
        Donor {
            id: "donor::1".to_string(),
            name: "Karim Uddin".to_string(),
            age: 34,
            blood_group: BloodGroup::BPositive,
            phone: None,
            notes: None,
            donations,
        }
    }

    #[test]
    fn test_generate_id_is_unique() {
        let a = Donor::generate_id();
        let b = Donor::generate_id();
        assert!(a.starts_with("donor::"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_merge_donation_skips_known_dates() {
        let mut d = donor(vec![ymd(2025, 1, 1)]);
        assert!(!d.merge_donation(ymd(2025, 1, 1)));
        assert!(d.merge_donation(ymd(2025, 6, 1)));
        assert_eq!(d.donations, vec![ymd(2025, 1, 1), ymd(2025, 6, 1)]);
    }

    #[test]
    fn test_remove_donation_removes_all_occurrences() {
        let mut d = donor(vec![ymd(2025, 1, 1), ymd(2025, 2, 1), ymd(2025, 1, 1)]);
        assert_eq!(d.remove_donation(ymd(2025, 1, 1)), 2);
        assert_eq!(d.donations, vec![ymd(2025, 2, 1)]);
        assert_eq!(d.remove_donation(ymd(2030, 1, 1)), 0);
    }

    #[test]
    fn test_view_derives_eligibility() {
        let view = DonorView::build(donor(vec![ymd(2024, 12, 1), ymd(2025, 1, 1)]), 90, ymd(2025, 3, 25));
        assert_eq!(view.last_donation, Some(ymd(2025, 1, 1)));
        assert_eq!(view.next_eligible_date, Some(ymd(2025, 4, 1)));
        assert_eq!(view.eligibility, EligibilityStatus::EligibleSoon { days_left: 7 });
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  Nadia  ").unwrap(), "Nadia");
        assert_eq!(validate_name("   "), Err(DonorValidationError::EmptyName));
        assert_eq!(validate_name(&"x".repeat(101)), Err(DonorValidationError::NameTooLong));
    }

    #[test]
    fn test_clean_optional() {
        assert_eq!(clean_optional(Some(" 0171 ".to_string())), Some("0171".to_string()));
        assert_eq!(clean_optional(Some("  ".to_string())), None);
        assert_eq!(clean_optional(None), None);
    }
}
