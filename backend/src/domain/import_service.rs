//! Import domain logic.
//!
//! A backup document is untrusted, loosely typed JSON. Each entry of its
//! `data` array is coerced into a valid [`Donor`]: missing fields get
//! defaults and unreadable donation dates are dropped. Import only ever
//! appends. An incoming id that is missing, already in the registry or
//! repeated inside the same document is replaced with a fresh one, so no
//! existing donor is overwritten.

use std::collections::HashSet;

use serde_json::{Map, Value};
use shared::BloodGroup;
use tracing::{error, info, warn};

use super::commands::transfer::ImportResult;
use super::date_utils;
use super::donor_service::DonorService;
use super::errors::{RegistryError, RegistryResult};
use super::models::donor::{clean_optional, Donor, MAX_NAME_LENGTH};
use super::registry::DonorRegistry;
use super::settings_service::SettingsService;

/// Name given to imported profiles that have none
pub const PLACEHOLDER_NAME: &str = "Unknown";

/// Parsed import document, before coercion into donors
#[derive(Debug, Clone)]
pub struct ImportDocument {
    pub data: Vec<Value>,
    pub settings: Option<Map<String, Value>>,
}

/// Donor read from an import document, with the id it asked for
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingDonor {
    pub requested_id: Option<String>,
    pub donor: Donor,
}

/// Parse the raw document. Anything but an object with a `data` array is
/// rejected as a whole.
pub fn parse_import_document(content: &str) -> RegistryResult<ImportDocument> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| RegistryError::InvalidImport(format!("not valid JSON: {}", e)))?;

    let Value::Object(mut object) = value else {
        return Err(RegistryError::InvalidImport("expected a JSON object".to_string()));
    };

    let data = match object.remove("data") {
        Some(Value::Array(data)) => data,
        _ => return Err(RegistryError::InvalidImport("missing \"data\" array".to_string())),
    };

    let settings = match object.remove("settings") {
        Some(Value::Object(settings)) => Some(settings),
        Some(Value::Null) | None => None,
        Some(other) => {
            warn!("Ignoring non-object settings in import: {}", other);
            None
        }
    };

    Ok(ImportDocument { data, settings })
}

/// Coerce one `data` entry into a donor. Non-object entries yield `None`.
pub fn coerce_profile(value: &Value) -> Option<IncomingDonor> {
    let object = value.as_object()?;

    let requested_id = match object.get("id") {
        Some(Value::String(id)) if !id.trim().is_empty() => Some(id.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let name = object
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.chars().take(MAX_NAME_LENGTH).collect())
        .unwrap_or_else(|| PLACEHOLDER_NAME.to_string());

    let blood_group = object
        .get("bloodGroup")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<BloodGroup>().ok())
        .unwrap_or_default();

    let donations = object
        .get("donations")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(date_utils::normalize_value).collect::<Vec<_>>())
        .unwrap_or_default();

    Some(IncomingDonor {
        requested_id,
        donor: Donor {
            id: String::new(),
            name,
            age: coerce_age(object.get("age")),
            blood_group,
            phone: coerce_text(object.get("phone")),
            notes: coerce_text(object.get("notes")),
            donations,
        },
    })
}

/// Append incoming donors to the registry, assigning fresh ids on any
/// collision. Returns how many ids were reassigned.
pub fn import_merge(registry: &mut DonorRegistry, incoming: Vec<IncomingDonor>) -> usize {
    let mut taken: HashSet<String> = registry.donors().iter().map(|d| d.id.clone()).collect();
    let mut reassigned = 0;
    let mut accepted = Vec::with_capacity(incoming.len());

    for IncomingDonor { requested_id, mut donor } in incoming {
        donor.id = match requested_id {
            Some(id) if !taken.contains(&id) => id,
            _ => {
                reassigned += 1;
                loop {
                    let id = Donor::generate_id();
                    if !taken.contains(&id) {
                        break id;
                    }
                }
            }
        };
        taken.insert(donor.id.clone());
        accepted.push(donor);
    }

    registry.append(accepted);
    reassigned
}

/// Import service that orchestrates parsing, merging and persistence
#[derive(Clone, Default)]
pub struct ImportService {}

impl ImportService {
    pub fn new() -> Self {
        Self {}
    }

    /// Import a backup document into the registry and settings.
    ///
    /// A malformed document changes nothing. Once the donors are saved they
    /// stay imported: a failure to save the settings is reported in
    /// [`ImportResult::settings_error`] instead of failing the import.
    pub async fn import_document(
        &self,
        content: &str,
        donor_service: &DonorService,
        settings_service: &SettingsService,
    ) -> RegistryResult<ImportResult> {
        let document = parse_import_document(content).map_err(|e| {
            warn!("Import rejected: {}", e);
            e
        })?;

        let total_entries = document.data.len();
        let incoming: Vec<IncomingDonor> = document.data.iter().filter_map(coerce_profile).collect();
        let skipped_entries = total_entries - incoming.len();
        if skipped_entries > 0 {
            warn!("Skipping {} import entries that are not objects", skipped_entries);
        }

        let imported_count = incoming.len();
        let reassigned_ids = donor_service
            .mutate(|registry| Ok(import_merge(registry, incoming)))
            .await?;

        let (settings_updated, settings_error) = match &document.settings {
            Some(settings) => match settings_service.merge_imported(settings).await {
                Ok(changed) => (changed, None),
                Err(e) => {
                    error!("Imported {} donors but failed to apply settings: {}", imported_count, e);
                    (false, Some(e.to_string()))
                }
            },
            None => (false, None),
        };

        info!(
            "Imported {} donors ({} with fresh ids), settings updated: {}",
            imported_count, reassigned_ids, settings_updated
        );

        Ok(ImportResult {
            imported_count,
            reassigned_ids,
            skipped_entries,
            settings_updated,
            settings_error,
        })
    }
}

/// Ages may arrive as numbers or numeric strings; anything else is 0
fn coerce_age(value: Option<&Value>) -> u32 {
    let age = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match age {
        Some(age) if age.is_finite() && age > 0.0 => age.min(f64::from(u32::MAX)) as u32,
        _ => 0,
    }
}

/// Phone numbers in old backups are sometimes plain numbers
fn coerce_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => clean_optional(Some(s.clone())),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::domain::commands::donors::CreateDonorCommand;
    use crate::domain::export_service::ExportService;
    use crate::domain::models::settings::Settings;
    use crate::storage::{DbConnection, DonorRepository, SettingsRepository};
    use chrono::NaiveDate;
    use serde_json::json;
    use shared::Theme;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn existing_registry() -> DonorRegistry {
        let mut registry = DonorRegistry::default();
        registry
            .add(CreateDonorCommand {
                id: Some("keep-me".to_string()),
                name: "Existing".to_string(),
                age: 40,
                blood_group: BloodGroup::BPositive,
                phone: None,
                notes: None,
                recent_donation: Some("2025-01-01".to_string()),
            })
            .unwrap();
        registry
    }

    #[test]
    fn test_parse_rejects_bad_documents() {
        for content in ["not json", "[]", r#"{"data": {}}"#, r#"{"settings": {}}"#, "42"] {
            assert!(
                matches!(parse_import_document(content), Err(RegistryError::InvalidImport(_))),
                "{} should be rejected",
                content
            );
        }
    }

    #[test]
    fn test_parse_accepts_data_and_settings() {
        let document = parse_import_document(r#"{"data": [{}], "settings": {"theme": "dark"}}"#).unwrap();
        assert_eq!(document.data.len(), 1);
        assert_eq!(document.settings.unwrap()["theme"], "dark");
    }

    #[test]
    fn test_coerce_defaults_missing_fields() {
        let incoming = coerce_profile(&json!({})).unwrap();

        assert_eq!(incoming.requested_id, None);
        assert_eq!(incoming.donor.name, PLACEHOLDER_NAME);
        assert_eq!(incoming.donor.age, 0);
        assert_eq!(incoming.donor.blood_group, BloodGroup::OPositive);
        assert_eq!(incoming.donor.phone, None);
        assert!(incoming.donor.donations.is_empty());
    }

    #[test]
    fn test_coerce_loose_values() {
        let incoming = coerce_profile(&json!({
            "id": 17,
            "name": "  Lipi  ",
            "age": "33",
            "bloodGroup": "ab-",
            "phone": 1711000000u64,
            "notes": "   ",
            "donations": ["2025-01-05", "bogus", null, "2024-12-01T10:00:00"]
        }))
        .unwrap();

        assert_eq!(incoming.requested_id.as_deref(), Some("17"));
        assert_eq!(incoming.donor.name, "Lipi");
        assert_eq!(incoming.donor.age, 33);
        assert_eq!(incoming.donor.blood_group, BloodGroup::ABNegative);
        assert_eq!(incoming.donor.phone.as_deref(), Some("1711000000"));
        assert_eq!(incoming.donor.notes, None);
        assert_eq!(incoming.donor.donations, vec![ymd(2025, 1, 5), ymd(2024, 12, 1)]);
    }

    #[test]
    fn test_coerce_bad_age_and_group() {
        let incoming = coerce_profile(&json!({ "age": -4, "bloodGroup": "Z+" })).unwrap();
        assert_eq!(incoming.donor.age, 0);
        assert_eq!(incoming.donor.blood_group, BloodGroup::OPositive);

        let incoming = coerce_profile(&json!({ "age": 29.8 })).unwrap();
        assert_eq!(incoming.donor.age, 29);
    }

    #[test]
    fn test_coerce_skips_non_objects() {
        assert!(coerce_profile(&json!("Rahim")).is_none());
        assert!(coerce_profile(&json!(null)).is_none());
    }

    #[test]
    fn test_merge_is_additive_and_avoids_collisions() {
        let mut registry = existing_registry();
        let before = registry.donors()[0].clone();

        let incoming = vec![
            coerce_profile(&json!({ "id": "keep-me", "name": "Impostor" })).unwrap(),
            coerce_profile(&json!({ "id": "new-1", "name": "Fresh" })).unwrap(),
            coerce_profile(&json!({ "id": "new-1", "name": "Twin" })).unwrap(),
            coerce_profile(&json!({ "name": "No Id" })).unwrap(),
        ];

        let reassigned = import_merge(&mut registry, incoming);

        assert_eq!(reassigned, 3);
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.donors()[0], before);
        assert_eq!(registry.get("keep-me").unwrap().name, "Existing");
        assert_eq!(registry.get("new-1").unwrap().name, "Fresh");

        let ids: HashSet<&str> = registry.donors().iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_merge_into_empty_registry_keeps_ids() {
        let mut registry = DonorRegistry::default();
        let incoming = vec![
            coerce_profile(&json!({ "id": "a", "name": "A" })).unwrap(),
            coerce_profile(&json!({ "id": "b", "name": "B" })).unwrap(),
        ];

        assert_eq!(import_merge(&mut registry, incoming), 0);
        assert!(registry.contains("a"));
        assert!(registry.contains("b"));
    }

    async fn fresh_services() -> (DonorService, SettingsService) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let settings = SettingsService::load(SettingsRepository::new(Arc::new(db.clone()))).await;
        let donors = DonorService::load(DonorRepository::new(Arc::new(db)), settings.clone()).await;
        (donors, settings)
    }

    #[tokio::test]
    async fn test_json_export_imports_unchanged_into_empty_store() {
        let originals: Vec<Donor> = BloodGroup::ALL
            .iter()
            .enumerate()
            .map(|(i, group)| Donor {
                id: format!("donor::{}", i),
                name: format!("Donor \"{}\" {}", group, i),
                age: 20 + i as u32,
                blood_group: *group,
                phone: if i % 2 == 0 { Some(format!("0171100000{}", i)) } else { None },
                notes: if i % 3 == 0 { Some(format!("Prefers mornings, call ahead; #{}", i)) } else { None },
                donations: (0..i as u32).map(|m| ymd(2024, m % 12 + 1, 10 + i as u32)).collect(),
            })
            .collect();
        let settings = Settings {
            donation_interval_days: 120,
            theme: Theme::Dark,
            locale: "en".to_string(),
        };
        let content = ExportService::new().render_json(&settings, &originals).unwrap();

        let (donor_service, settings_service) = fresh_services().await;
        let result = ImportService::new()
            .import_document(&content, &donor_service, &settings_service)
            .await
            .unwrap();

        assert_eq!(result.imported_count, originals.len());
        assert_eq!(result.reassigned_ids, 0);
        assert!(result.settings_updated);
        assert_eq!(donor_service.snapshot().await, originals);
        assert_eq!(settings_service.current(), settings);
    }

    /// Store that refuses to save settings
    struct SettingsWriteFails(DbConnection);

    #[async_trait::async_trait]
    impl crate::storage::KeyValueStorage for SettingsWriteFails {
        async fn get_value(&self, key: &str) -> anyhow::Result<Option<String>> {
            self.0.get_value(key).await
        }

        async fn put_value(&self, key: &str, value: &str) -> anyhow::Result<()> {
            if key == crate::storage::repositories::settings_repository::SETTINGS_KEY {
                anyhow::bail!("settings are read-only");
            }
            self.0.put_value(key, value).await
        }
    }

    #[tokio::test]
    async fn test_settings_failure_keeps_imported_donors() {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let storage: Arc<dyn crate::storage::KeyValueStorage> = Arc::new(SettingsWriteFails(db));
        let settings_service = SettingsService::load(SettingsRepository::new(storage.clone())).await;
        let donor_service = DonorService::load(DonorRepository::new(storage), settings_service.clone()).await;

        let content = r#"{"data": [{"id": "a", "name": "Alpha"}], "settings": {"theme": "dark"}}"#;
        let result = ImportService::new()
            .import_document(content, &donor_service, &settings_service)
            .await
            .unwrap();

        assert_eq!(result.imported_count, 1);
        assert!(!result.settings_updated);
        assert!(result.settings_error.unwrap().contains("settings are read-only"));
        assert_eq!(donor_service.snapshot().await[0].id, "a");
        assert_eq!(settings_service.current(), Settings::default());
    }
}
