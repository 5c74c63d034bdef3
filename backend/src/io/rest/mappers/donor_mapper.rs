//! backend/src/io/rest/mappers/donor_mapper.rs

use shared::{
    CreateDonorRequest, DonorListRequest, DonorProfile, DonorSummary,
    EligibilityStatus as SharedEligibilityStatus, UpdateDonorRequest,
};

use crate::domain::commands::donors::{CreateDonorCommand, DonorQuery, UpdateDonorCommand};
use crate::domain::date_utils;
use crate::domain::eligibility::EligibilityStatus;
use crate::domain::models::donor::{Donor, DonorView};

/// Mapper to convert between shared donor DTOs and domain donor models.
pub struct DonorMapper;

impl DonorMapper {
    /// Converts a domain donor to its stored / exported shape.
    pub fn to_dto(domain: Donor) -> DonorProfile {
        DonorProfile {
            id: domain.id,
            name: domain.name,
            age: domain.age,
            blood_group: domain.blood_group,
            phone: domain.phone,
            notes: domain.notes,
            donations: domain.donations.into_iter().map(date_utils::to_iso).collect(),
        }
    }

    pub fn to_create_command(request: CreateDonorRequest) -> CreateDonorCommand {
        CreateDonorCommand {
            id: request.id,
            name: request.name,
            age: request.age,
            blood_group: request.blood_group,
            phone: request.phone,
            notes: request.notes,
            recent_donation: request.recent_donation,
        }
    }

    pub fn to_update_command(request: UpdateDonorRequest) -> UpdateDonorCommand {
        UpdateDonorCommand {
            name: request.name,
            age: request.age,
            blood_group: request.blood_group,
            phone: request.phone,
            notes: request.notes,
            recent_donation: request.recent_donation,
        }
    }

    pub fn to_query(request: DonorListRequest) -> DonorQuery {
        DonorQuery {
            search: request.search.filter(|s| !s.trim().is_empty()),
            blood_group: request.blood_group,
            eligibility: request.eligibility,
        }
    }

    pub fn to_summary_dto(view: DonorView) -> DonorSummary {
        DonorSummary {
            last_donation: view.last_donation.map(date_utils::to_iso),
            next_eligible_date: view.next_eligible_date.map(date_utils::to_iso),
            eligibility: Self::to_status_dto(view.eligibility),
            profile: Self::to_dto(view.donor),
        }
    }

    pub fn to_status_dto(status: EligibilityStatus) -> SharedEligibilityStatus {
        match status {
            EligibilityStatus::NoHistory => SharedEligibilityStatus::NoHistory,
            EligibilityStatus::EligibleNow => SharedEligibilityStatus::EligibleNow,
            EligibilityStatus::EligibleSoon { days_left } => SharedEligibilityStatus::EligibleSoon { days_left },
            EligibilityStatus::NotEligibleYet { days_left } => SharedEligibilityStatus::NotEligibleYet { days_left },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::BloodGroup;

    #[test]
    fn test_summary_renders_iso_dates() {
        let donor = Donor {
            id: "x".to_string(),
            name: "Tania".to_string(),
            age: 27,
            blood_group: BloodGroup::ANegative,
            phone: Some("0123".to_string()),
            notes: None,
            donations: vec![NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()],
        };
        let view = DonorView::build(donor, 90, NaiveDate::from_ymd_opt(2025, 3, 25).unwrap());

        let summary = DonorMapper::to_summary_dto(view);
        assert_eq!(summary.last_donation.as_deref(), Some("2025-01-01"));
        assert_eq!(summary.next_eligible_date.as_deref(), Some("2025-04-01"));
        assert_eq!(summary.eligibility, SharedEligibilityStatus::EligibleSoon { days_left: 7 });
        assert_eq!(summary.profile.donations, vec!["2025-01-01".to_string()]);
    }

    #[test]
    fn test_blank_search_is_no_filter() {
        let query = DonorMapper::to_query(DonorListRequest {
            search: Some("   ".to_string()),
            ..Default::default()
        });
        assert_eq!(query.search, None);
    }
}
