//! Domain-level command and query types.
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the public DTOs defined in
//! the `shared` crate to these internal types.

pub mod donors {
    use shared::{BloodGroup, EligibilityFilter};

    use crate::domain::models::donor::DonorView;

    /// Input for creating a new donor.
    #[derive(Debug, Clone)]
    pub struct CreateDonorCommand {
        pub id: Option<String>,
        pub name: String,
        pub age: u32,
        pub blood_group: BloodGroup,
        pub phone: Option<String>,
        pub notes: Option<String>,
        pub recent_donation: Option<String>,
    }

    /// Partial update of an existing donor.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateDonorCommand {
        pub name: Option<String>,
        pub age: Option<u32>,
        pub blood_group: Option<BloodGroup>,
        pub phone: Option<String>,
        pub notes: Option<String>,
        pub recent_donation: Option<String>,
    }

    /// Filters for the donor list.
    #[derive(Debug, Clone, Default)]
    pub struct DonorQuery {
        pub search: Option<String>,
        pub blood_group: Option<BloodGroup>,
        pub eligibility: Option<EligibilityFilter>,
    }

    /// Dashboard counters.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DashboardStats {
        pub total_profiles: usize,
        pub eligible_today: usize,
        pub upcoming_7_days: usize,
    }

    /// Result of removing a donation date.
    #[derive(Debug, Clone)]
    pub struct DeleteDonationResult {
        pub donor: DonorView,
        pub removed_count: usize,
    }
}

pub mod settings {
    use shared::Theme;

    /// Input for saving settings; absent fields keep their value.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateSettingsCommand {
        pub donation_interval_days: Option<u32>,
        pub theme: Option<Theme>,
        pub locale: Option<String>,
    }
}

pub mod transfer {
    use shared::ExportFormat;

    /// Outcome of merging an import document.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct ImportResult {
        pub imported_count: usize,
        pub reassigned_ids: usize,
        pub skipped_entries: usize,
        pub settings_updated: bool,
        /// Why the imported settings were not applied; the donors are kept
        pub settings_error: Option<String>,
    }

    /// A rendered export ready to be saved.
    #[derive(Debug, Clone)]
    pub struct ExportArtifact {
        pub format: ExportFormat,
        pub content: String,
        pub filename: String,
        pub profile_count: usize,
    }
}
