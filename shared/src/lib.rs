use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// ABO/Rh blood group of a donor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodGroup {
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    ABPositive,
    #[serde(rename = "AB-")]
    ABNegative,
}

impl BloodGroup {
    pub const ALL: [BloodGroup; 8] = [
        BloodGroup::OPositive,
        BloodGroup::ONegative,
        BloodGroup::APositive,
        BloodGroup::ANegative,
        BloodGroup::BPositive,
        BloodGroup::BNegative,
        BloodGroup::ABPositive,
        BloodGroup::ABNegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodGroup::OPositive => "O+",
            BloodGroup::ONegative => "O-",
            BloodGroup::APositive => "A+",
            BloodGroup::ANegative => "A-",
            BloodGroup::BPositive => "B+",
            BloodGroup::BNegative => "B-",
            BloodGroup::ABPositive => "AB+",
            BloodGroup::ABNegative => "AB-",
        }
    }
}

impl Default for BloodGroup {
    fn default() -> Self {
        BloodGroup::OPositive
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        BloodGroup::ALL
            .iter()
            .copied()
            .find(|group| group.as_str() == wanted)
            .ok_or_else(|| format!("Unknown blood group: {}", s))
    }
}

/// Donor profile as persisted and exported.
///
/// Field names are camelCase so stored blobs and backups stay readable by
/// any tool that knows the `{ id, name, age, bloodGroup, ... }` layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorProfile {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub blood_group: BloodGroup,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Donation dates as ISO `YYYY-MM-DD` strings
    #[serde(default)]
    pub donations: Vec<String>,
}

/// UI colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}

/// Application settings as persisted and exported.
///
/// Missing fields fall back to their defaults when deserializing, so a stored
/// object that only carries `theme` still yields a complete settings value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Cooldown after a donation before the donor is eligible again
    pub donation_interval_days: u32,
    pub theme: Theme,
    pub locale: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            donation_interval_days: 90,
            theme: Theme::Light,
            locale: "bn".to_string(),
        }
    }
}

/// Eligibility of a donor relative to today
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EligibilityStatus {
    /// No donation on record, so there is no baseline
    NoHistory,
    EligibleNow,
    /// Eligible within the next 14 days
    EligibleSoon { days_left: i64 },
    NotEligibleYet { days_left: i64 },
}

/// Eligibility window used to filter the donor list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EligibilityFilter {
    #[serde(rename = "eligibleToday")]
    EligibleToday,
    #[serde(rename = "next7")]
    Next7Days,
    #[serde(rename = "next30")]
    Next30Days,
    #[serde(rename = "notEligible")]
    NotEligible,
}

/// Donor with its derived eligibility, as shown in list and detail views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorSummary {
    pub profile: DonorProfile,
    /// Most recent donation (ISO date)
    pub last_donation: Option<String>,
    /// Date the donor may donate again (ISO date)
    pub next_eligible_date: Option<String>,
    pub eligibility: EligibilityStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DonorListRequest {
    /// Case-insensitive substring of the donor name
    pub search: Option<String>,
    pub blood_group: Option<BloodGroup>,
    pub eligibility: Option<EligibilityFilter>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorListResponse {
    pub donors: Vec<DonorSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateDonorRequest {
    /// Optional caller-chosen id; a fresh one is assigned if absent or taken
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub age: u32,
    pub blood_group: BloodGroup,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Seeds the donation history with one date
    #[serde(default)]
    pub recent_donation: Option<String>,
}

/// Partial update; absent fields are left untouched.
///
/// `recent_donation` is added to the donation history, it never replaces it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateDonorRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub blood_group: Option<BloodGroup>,
    /// An empty string clears the phone number
    #[serde(default)]
    pub phone: Option<String>,
    /// An empty string clears the notes
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub recent_donation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorResponse {
    pub donor: DonorSummary,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteDonorResponse {
    pub deleted_id: String,
    pub success_message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordDonationRequest {
    /// Donation date; today when omitted
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteDonationResponse {
    pub donor: DonorSummary,
    pub removed_count: usize,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickDonateRequest {
    pub search: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub total_profiles: usize,
    pub eligible_today: usize,
    /// Donors becoming eligible within the next 7 days
    pub upcoming_7_days: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub settings: Settings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateSettingsRequest {
    #[serde(default)]
    pub donation_interval_days: Option<u32>,
    #[serde(default)]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
}

/// Full backup document: `{ settings, data }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub settings: Settings,
    pub data: Vec<DonorProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDataRequest {
    pub format: ExportFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDataResponse {
    pub content: String,
    pub filename: String,
    pub profile_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportToPathRequest {
    /// Target directory; the documents directory when absent or blank
    #[serde(default)]
    pub custom_path: Option<String>,
    /// Single format, or both JSON and CSV when absent
    #[serde(default)]
    pub format: Option<ExportFormat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportToPathResponse {
    pub success: bool,
    pub message: String,
    pub file_paths: Vec<String>,
    pub profile_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportDataRequest {
    /// Raw JSON backup document
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportDataResponse {
    pub imported_count: usize,
    /// Incoming profiles that received a fresh id
    pub reassigned_ids: usize,
    pub settings_updated: bool,
    /// Set when the donors were imported but the settings could not be saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings_error: Option<String>,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blood_group_serializes_as_symbol() {
        let json = serde_json::to_string(&BloodGroup::ABNegative).unwrap();
        assert_eq!(json, "\"AB-\"");

        let parsed: BloodGroup = serde_json::from_str("\"O+\"").unwrap();
        assert_eq!(parsed, BloodGroup::OPositive);
    }

    #[test]
    fn test_blood_group_from_str_is_case_insensitive() {
        assert_eq!("ab+".parse::<BloodGroup>().unwrap(), BloodGroup::ABPositive);
        assert_eq!(" B- ".parse::<BloodGroup>().unwrap(), BloodGroup::BNegative);
        assert!("C+".parse::<BloodGroup>().is_err());
    }

    #[test]
    fn test_donor_profile_uses_camel_case_keys() {
        let profile = DonorProfile {
            id: "d1".to_string(),
            name: "Rahim".to_string(),
            age: 30,
            blood_group: BloodGroup::APositive,
            phone: None,
            notes: Some("night shift".to_string()),
            donations: vec!["2025-01-01".to_string()],
        };

        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["bloodGroup"], "A+");
        assert_eq!(value["donations"][0], "2025-01-01");
        assert!(value.get("phone").is_none());
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"theme":"dark"}"#).unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.donation_interval_days, 90);
        assert_eq!(settings.locale, "bn");
    }

    #[test]
    fn test_eligibility_status_is_tagged() {
        let value = serde_json::to_value(EligibilityStatus::EligibleSoon { days_left: 7 }).unwrap();
        assert_eq!(value["status"], "eligible_soon");
        assert_eq!(value["days_left"], 7);
    }

    #[test]
    fn test_eligibility_filter_names() {
        let filter: EligibilityFilter = serde_json::from_str("\"next30\"").unwrap();
        assert_eq!(filter, EligibilityFilter::Next30Days);
    }
}
