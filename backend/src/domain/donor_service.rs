//! Donor domain logic.
//!
//! `DonorService` owns the in-memory registry and keeps the stored copy in
//! sync with it. Each mutation runs against a clone of the registry, the
//! clone is saved, and only a successful save makes the change visible. A
//! failed save leaves the previous state in place and surfaces as
//! [`RegistryError::Storage`].

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::commands::donors::{
    CreateDonorCommand, DashboardStats, DeleteDonationResult, DonorQuery, UpdateDonorCommand,
};
use super::errors::{RegistryError, RegistryResult};
use super::models::donor::{Donor, DonorView};
use super::registry::{parse_date, DonorRegistry};
use super::settings_service::SettingsService;
use crate::storage::DonorRepository;

#[derive(Clone)]
pub struct DonorService {
    registry: Arc<Mutex<DonorRegistry>>,
    repository: DonorRepository,
    settings_service: SettingsService,
}

impl DonorService {
    /// Load the stored donors (empty when absent or unreadable)
    pub async fn load(repository: DonorRepository, settings_service: SettingsService) -> Self {
        let donors = repository.load_donors().await;
        info!("Donor registry ready with {} donors", donors.len());

        Self {
            registry: Arc::new(Mutex::new(DonorRegistry::new(donors))),
            repository,
            settings_service,
        }
    }

    /// Create a new donor
    pub async fn create_donor(&self, command: CreateDonorCommand, today: NaiveDate) -> RegistryResult<DonorView> {
        info!("Creating donor: name={}, blood_group={}", command.name, command.blood_group);

        let donor = self.mutate(|registry| registry.add(command)).await?;

        info!("Created donor: {} with ID: {}", donor.name, donor.id);
        Ok(self.view(donor, today))
    }

    /// Get a donor by ID
    pub async fn get_donor(&self, donor_id: &str, today: NaiveDate) -> RegistryResult<DonorView> {
        let registry = self.registry.lock().await;
        let donor = registry
            .get(donor_id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(donor_id.to_string()))?;
        drop(registry);

        Ok(self.view(donor, today))
    }

    /// Update an existing donor; a recent donation is added to the history
    pub async fn update_donor(
        &self,
        donor_id: &str,
        command: UpdateDonorCommand,
        today: NaiveDate,
    ) -> RegistryResult<DonorView> {
        info!("Updating donor: {}", donor_id);

        let donor = self.mutate(|registry| registry.update(donor_id, command)).await?;

        info!("Updated donor: {} with ID: {}", donor.name, donor.id);
        Ok(self.view(donor, today))
    }

    /// Delete a donor
    pub async fn delete_donor(&self, donor_id: &str) -> RegistryResult<Donor> {
        info!("Deleting donor: {}", donor_id);

        let donor = self.mutate(|registry| registry.remove(donor_id)).await?;

        info!("Deleted donor: {} with ID: {}", donor.name, donor.id);
        Ok(donor)
    }

    /// Record a donation; `date` defaults to today.
    ///
    /// Unreadable dates are rejected before anything changes.
    pub async fn record_donation(
        &self,
        donor_id: &str,
        date: Option<&str>,
        today: NaiveDate,
    ) -> RegistryResult<DonorView> {
        let date = match date.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => parse_date(raw).map_err(|e| {
                warn!("Rejected donation date {:?} for donor {}", raw, donor_id);
                e
            })?,
            None => today,
        };
        info!("Recording donation on {} for donor {}", date, donor_id);

        let donor = self.mutate(|registry| registry.record_donation(donor_id, date)).await?;
        Ok(self.view(donor, today))
    }

    /// Remove every donation recorded on `date`
    pub async fn delete_donation(
        &self,
        donor_id: &str,
        date: &str,
        today: NaiveDate,
    ) -> RegistryResult<DeleteDonationResult> {
        let date = parse_date(date)?;
        info!("Deleting donation on {} for donor {}", date, donor_id);

        let (donor, removed_count) = self
            .mutate(|registry| registry.remove_donation(donor_id, date))
            .await?;

        if removed_count == 0 {
            warn!("Donor {} has no donation on {}", donor_id, date);
        }

        Ok(DeleteDonationResult {
            donor: self.view(donor, today),
            removed_count,
        })
    }

    /// Record a donation dated today for the single donor whose name
    /// contains `search`.
    pub async fn quick_donate(&self, search: &str, today: NaiveDate) -> RegistryResult<DonorView> {
        let search = search.trim();
        if search.is_empty() {
            return Err(RegistryError::EmptySearch);
        }

        let donor = self
            .mutate(|registry| {
                let matches = registry.find_by_name(search);
                let donor_id = match matches.as_slice() {
                    [] => return Err(RegistryError::NoMatch(search.to_string())),
                    [donor] => donor.id.clone(),
                    _ => {
                        return Err(RegistryError::AmbiguousMatch {
                            search: search.to_string(),
                            count: matches.len(),
                        })
                    }
                };
                registry.record_donation(&donor_id, today)
            })
            .await?;

        info!("Quick donation recorded for {} on {}", donor.name, today);
        Ok(self.view(donor, today))
    }

    /// Donors matching the query, sorted by name, with derived eligibility
    pub async fn list_donors(&self, query: DonorQuery, today: NaiveDate) -> Vec<DonorView> {
        info!("Listing donors with query: {:?}", query);

        let interval = self.settings_service.donation_interval_days();
        let registry = self.registry.lock().await;
        let views: Vec<DonorView> = registry
            .query(&query, interval, today)
            .into_iter()
            .map(|donor| DonorView::build(donor.clone(), interval, today))
            .collect();

        info!("Found {} donors", views.len());
        views
    }

    /// Dashboard counters for `today`
    pub async fn dashboard(&self, today: NaiveDate) -> DashboardStats {
        let interval = self.settings_service.donation_interval_days();
        self.registry.lock().await.dashboard(interval, today)
    }

    /// Copy of every donor in registry order
    pub async fn snapshot(&self) -> Vec<Donor> {
        self.registry.lock().await.donors().to_vec()
    }

    /// Apply `change` to a copy of the registry, persist it, then publish it
    pub(crate) async fn mutate<T, F>(&self, change: F) -> RegistryResult<T>
    where
        F: FnOnce(&mut DonorRegistry) -> RegistryResult<T>,
    {
        let mut registry = self.registry.lock().await;
        let mut next = registry.clone();

        let result = change(&mut next)?;

        self.repository.save_donors(next.donors()).await?;
        *registry = next;

        Ok(result)
    }

    fn view(&self, donor: Donor, today: NaiveDate) -> DonorView {
        DonorView::build(donor, self.settings_service.donation_interval_days(), today)
    }
}
