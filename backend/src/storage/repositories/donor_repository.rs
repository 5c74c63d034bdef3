//! # Donor Repository
//!
//! Stores the whole donor list as one JSON array under [`DONORS_KEY`].
//!
//! ```json
//! [
//!   { "id": "donor::…", "name": "Rahim", "age": 30, "bloodGroup": "O+",
//!     "phone": "017…", "notes": "…", "donations": ["2025-01-01"] }
//! ]
//! ```
//!
//! Loading never fails: a missing key, unreadable JSON or a storage error all
//! yield an empty list and a log line. Entries are coerced one by one the same
//! way imported profiles are, so a single damaged record cannot take the rest
//! of the list down with it. Stored ids are kept; missing or repeated ones are
//! replaced.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value;
use shared::DonorProfile;
use tracing::{debug, error, info, warn};

use crate::domain::import_service::{coerce_profile, import_merge, IncomingDonor};
use crate::domain::models::donor::Donor;
use crate::domain::registry::DonorRegistry;
use crate::io::rest::mappers::donor_mapper::DonorMapper;
use crate::storage::traits::KeyValueStorage;

/// Key holding the donor array
pub const DONORS_KEY: &str = "blood_donor_app_v1";

#[derive(Clone)]
pub struct DonorRepository {
    storage: Arc<dyn KeyValueStorage>,
}

impl DonorRepository {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Load all donors, falling back to an empty list
    pub async fn load_donors(&self) -> Vec<Donor> {
        let raw = match self.storage.get_value(DONORS_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored donors under {}, starting empty", DONORS_KEY);
                return Vec::new();
            }
            Err(e) => {
                error!("Failed to read stored donors, starting empty: {:#}", e);
                return Vec::new();
            }
        };

        let entries = match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Stored donor list is malformed, starting empty: {}", e);
                return Vec::new();
            }
        };

        let incoming: Vec<IncomingDonor> = entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let coerced = coerce_profile(entry);
                if coerced.is_none() {
                    warn!("Dropping stored donor entry {} that is not an object: {}", index, entry);
                }
                coerced
            })
            .collect();

        let mut registry = DonorRegistry::default();
        let reassigned = import_merge(&mut registry, incoming);
        if reassigned > 0 {
            warn!("Assigned fresh ids to {} stored donors with missing or repeated ids", reassigned);
        }

        info!("Loaded {} donors", registry.len());
        registry.donors().to_vec()
    }

    /// Replace the stored donor list
    pub async fn save_donors(&self, donors: &[Donor]) -> Result<()> {
        let profiles: Vec<DonorProfile> = donors.iter().cloned().map(DonorMapper::to_dto).collect();
        let json = serde_json::to_string(&profiles).context("Failed to serialize donors")?;

        self.storage.put_value(DONORS_KEY, &json).await?;
        debug!("Saved {} donors", profiles.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DbConnection;
    use chrono::NaiveDate;
    use shared::BloodGroup;

    async fn setup_test() -> (DbConnection, DonorRepository) {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        let repo = DonorRepository::new(Arc::new(db.clone()));
        (db, repo)
    }

    fn donor(id: &str) -> Donor {
        Donor {
            id: id.to_string(),
            name: format!("Donor {}", id),
            age: 25,
            blood_group: BloodGroup::OPositive,
            phone: None,
            notes: Some("test".to_string()),
            donations: vec![NaiveDate::from_ymd_opt(2025, 2, 14).unwrap()],
        }
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let (_db, repo) = setup_test().await;

        let donors = vec![donor("a"), donor("b")];
        repo.save_donors(&donors).await.unwrap();

        assert_eq!(repo.load_donors().await, donors);
    }

    #[tokio::test]
    async fn test_missing_key_loads_empty() {
        let (_db, repo) = setup_test().await;
        assert!(repo.load_donors().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_loads_empty() {
        let (db, repo) = setup_test().await;

        db.put_value(DONORS_KEY, "{not json").await.unwrap();
        assert!(repo.load_donors().await.is_empty());

        db.put_value(DONORS_KEY, r#"{"data": []}"#).await.unwrap();
        assert!(repo.load_donors().await.is_empty());
    }

    #[tokio::test]
    async fn test_damaged_entry_does_not_drop_the_others() {
        let (db, repo) = setup_test().await;

        let raw = r#"[
            {"id": "a", "name": "Alpha", "age": 30, "bloodGroup": "A+", "donations": ["2025-01-01"]},
            {"id": "b", "name": "Beta", "age": null, "bloodGroup": "Q?", "donations": ["2025-02-01", "garbage"]},
            42,
            {"id": "a", "name": "Alpha Twin", "age": 31, "bloodGroup": "B+", "donations": []}
        ]"#;
        db.put_value(DONORS_KEY, raw).await.unwrap();

        let donors = repo.load_donors().await;
        assert_eq!(donors.len(), 3);

        assert_eq!(donors[0].id, "a");
        assert_eq!(donors[0].name, "Alpha");
        assert_eq!(donors[0].blood_group, BloodGroup::APositive);
        assert_eq!(donors[0].donations, vec![NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()]);

        assert_eq!(donors[1].id, "b");
        assert_eq!(donors[1].age, 0);
        assert_eq!(donors[1].blood_group, BloodGroup::OPositive);
        assert_eq!(donors[1].donations, vec![NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()]);

        assert_eq!(donors[2].name, "Alpha Twin");
        assert_ne!(donors[2].id, "a");

        // Saving after the load keeps every recovered donor
        repo.save_donors(&donors).await.unwrap();
        assert_eq!(repo.load_donors().await, donors);
    }

    #[tokio::test]
    async fn test_stored_layout_is_camel_case() {
        let (db, repo) = setup_test().await;

        repo.save_donors(&[donor("a")]).await.unwrap();

        let raw = db.get_value(DONORS_KEY).await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["bloodGroup"], "O+");
        assert_eq!(value[0]["donations"][0], "2025-02-14");
    }
}
