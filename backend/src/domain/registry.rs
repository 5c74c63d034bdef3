//! In-memory donor registry.
//!
//! Holds the ordered list of donors and implements every read and write on
//! it. The registry knows nothing about persistence; [`DonorService`] applies
//! changes to a copy, saves it and only then swaps it in.
//!
//! [`DonorService`]: super::donor_service::DonorService

use std::cmp::Ordering;

use chrono::NaiveDate;

use super::commands::donors::{CreateDonorCommand, DashboardStats, DonorQuery, UpdateDonorCommand};
use super::date_utils;
use super::eligibility;
use super::errors::{RegistryError, RegistryResult};
use super::models::donor::{clean_optional, validate_name, Donor};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DonorRegistry {
    donors: Vec<Donor>,
}

impl DonorRegistry {
    pub fn new(donors: Vec<Donor>) -> Self {
        Self { donors }
    }

    pub fn donors(&self) -> &[Donor] {
        &self.donors
    }

    pub fn len(&self) -> usize {
        self.donors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.donors.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.donors.iter().any(|d| d.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Donor> {
        self.donors.iter().find(|d| d.id == id)
    }

    fn get_mut(&mut self, id: &str) -> RegistryResult<&mut Donor> {
        self.donors
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    /// Id that is not yet used by any donor
    pub fn fresh_id(&self) -> String {
        loop {
            let id = Donor::generate_id();
            if !self.contains(&id) {
                return id;
            }
        }
    }

    /// Validate and append a new donor, returning it.
    ///
    /// The requested id is kept only when it is non-blank and unused.
    pub fn add(&mut self, command: CreateDonorCommand) -> RegistryResult<Donor> {
        let name = validate_name(&command.name)?;

        let mut donations = Vec::new();
        if let Some(raw) = command.recent_donation.as_deref().filter(|s| !s.trim().is_empty()) {
            donations.push(parse_date(raw)?);
        }

        let id = match command.id.map(|id| id.trim().to_string()) {
            Some(id) if !id.is_empty() && !self.contains(&id) => id,
            _ => self.fresh_id(),
        };

        let donor = Donor {
            id,
            name,
            age: command.age,
            blood_group: command.blood_group,
            phone: clean_optional(command.phone),
            notes: clean_optional(command.notes),
            donations,
        };

        self.donors.push(donor.clone());
        Ok(donor)
    }

    /// Overwrite the provided fields of a donor.
    ///
    /// A recent-donation date is merged into the history, never replacing it.
    /// All input is validated before the donor is touched.
    pub fn update(&mut self, id: &str, command: UpdateDonorCommand) -> RegistryResult<Donor> {
        let name = command.name.as_deref().map(validate_name).transpose()?;
        let recent = command
            .recent_donation
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(parse_date)
            .transpose()?;

        let donor = self.get_mut(id)?;

        if let Some(name) = name {
            donor.name = name;
        }
        if let Some(age) = command.age {
            donor.age = age;
        }
        if let Some(blood_group) = command.blood_group {
            donor.blood_group = blood_group;
        }
        if command.phone.is_some() {
            donor.phone = clean_optional(command.phone);
        }
        if command.notes.is_some() {
            donor.notes = clean_optional(command.notes);
        }
        if let Some(date) = recent {
            donor.merge_donation(date);
        }

        Ok(donor.clone())
    }

    /// Remove a donor, returning the removed record
    pub fn remove(&mut self, id: &str) -> RegistryResult<Donor> {
        let index = self
            .donors
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;
        Ok(self.donors.remove(index))
    }

    /// Append a donation date to a donor's history
    pub fn record_donation(&mut self, id: &str, date: NaiveDate) -> RegistryResult<Donor> {
        let donor = self.get_mut(id)?;
        donor.donations.push(date);
        Ok(donor.clone())
    }

    /// Remove every occurrence of `date` from a donor's history
    pub fn remove_donation(&mut self, id: &str, date: NaiveDate) -> RegistryResult<(Donor, usize)> {
        let donor = self.get_mut(id)?;
        let removed = donor.remove_donation(date);
        Ok((donor.clone(), removed))
    }

    /// Append already-validated donors, as produced by an import
    pub fn append(&mut self, donors: Vec<Donor>) {
        self.donors.extend(donors);
    }

    /// Donors matching the query, sorted by name
    pub fn query(&self, query: &DonorQuery, interval_days: u32, today: NaiveDate) -> Vec<&Donor> {
        let needle = query
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let mut matches: Vec<&Donor> = self
            .donors
            .iter()
            .filter(|donor| needle.as_deref().map_or(true, |n| donor.name_contains(n)))
            .filter(|donor| query.blood_group.map_or(true, |group| donor.blood_group == group))
            .filter(|donor| {
                query.eligibility.map_or(true, |filter| {
                    let next = eligibility::next_eligible_date(&donor.donations, interval_days);
                    eligibility::matches_filter(filter, eligibility::days_left(next, today))
                })
            })
            .collect();

        matches.sort_by(|a, b| compare_names(a, b));
        matches
    }

    /// Donors whose name contains `search` (case-insensitive), in storage order
    pub fn find_by_name(&self, search: &str) -> Vec<&Donor> {
        let needle = search.trim().to_lowercase();
        self.donors.iter().filter(|d| d.name_contains(&needle)).collect()
    }

    /// Dashboard counters, recomputed from the full list on every call
    pub fn dashboard(&self, interval_days: u32, today: NaiveDate) -> DashboardStats {
        let mut stats = DashboardStats {
            total_profiles: self.donors.len(),
            ..DashboardStats::default()
        };

        for donor in &self.donors {
            let next = eligibility::next_eligible_date(&donor.donations, interval_days);
            match eligibility::days_left(next, today) {
                Some(days) if days <= 0 => stats.eligible_today += 1,
                Some(days) if days <= 7 => stats.upcoming_7_days += 1,
                _ => {}
            }
        }

        stats
    }
}

/// Parse user-supplied date input, rejecting anything unreadable
pub fn parse_date(raw: &str) -> RegistryResult<NaiveDate> {
    date_utils::normalize(raw).ok_or_else(|| RegistryError::InvalidDate(raw.trim().to_string()))
}

/// Case-insensitive name order; ties fall back to the raw name, then the id
fn compare_names(a: &Donor, b: &Donor) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}
