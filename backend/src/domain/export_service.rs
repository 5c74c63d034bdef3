//! Export service domain logic for the donor tracker.
//!
//! Renders the registry as a JSON backup (`{ settings, data }`) or as a flat
//! CSV sheet, and optionally writes the result into a directory on disk. The
//! REST layer only hands the rendered content to the UI.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use shared::{ExportDocument, ExportFormat};
use tracing::{error, info};

use super::commands::transfer::ExportArtifact;
use super::date_utils;
use super::donor_service::DonorService;
use super::errors::{RegistryError, RegistryResult};
use super::models::donor::Donor;
use super::models::settings::Settings;
use super::settings_service::SettingsService;
use crate::io::rest::mappers::donor_mapper::DonorMapper;
use crate::io::rest::mappers::settings_mapper::SettingsMapper;

pub const CSV_HEADER: &str = "id,name,age,bloodGroup,phone,notes,donations";

/// Export service that handles all export-related business logic
#[derive(Clone, Default)]
pub struct ExportService {}

impl ExportService {
    pub fn new() -> Self {
        Self {}
    }

    /// Pretty-printed `{ settings, data }` backup document
    pub fn render_json(&self, settings: &Settings, donors: &[Donor]) -> RegistryResult<String> {
        let document = ExportDocument {
            settings: SettingsMapper::to_dto(settings.clone()),
            data: donors.iter().cloned().map(DonorMapper::to_dto).collect(),
        };

        let json = serde_json::to_string_pretty(&document).context("Failed to serialize export document")?;
        Ok(json)
    }

    /// One row per donor; donation dates joined with `;`
    pub fn render_csv(&self, donors: &[Donor]) -> String {
        let mut lines = Vec::with_capacity(donors.len() + 1);
        lines.push(CSV_HEADER.to_string());

        for donor in donors {
            let donations = donor
                .donations
                .iter()
                .map(|d| date_utils::to_iso(*d))
                .collect::<Vec<_>>()
                .join(";");

            lines.push(format!(
                "{},{},{},{},{},{},{}",
                quote(&donor.id),
                quote(&donor.name),
                donor.age,
                donor.blood_group,
                quote(donor.phone.as_deref().unwrap_or("")),
                quote(donor.notes.as_deref().unwrap_or("")),
                quote(&donations),
            ));
        }

        lines.join("\n")
    }

    /// Suggested download name for an export made on `today`
    pub fn filename(&self, format: ExportFormat, today: NaiveDate) -> String {
        let day = date_utils::to_iso(today);
        match format {
            ExportFormat::Json => format!("donors_backup_{}.json", day),
            ExportFormat::Csv => format!("donors_{}.csv", day),
        }
    }

    /// Render the current registry in `format`
    pub async fn export_data(
        &self,
        format: ExportFormat,
        donor_service: &DonorService,
        settings_service: &SettingsService,
        today: NaiveDate,
    ) -> RegistryResult<ExportArtifact> {
        info!("Exporting donors as {:?}", format);

        let donors = donor_service.snapshot().await;
        let content = match format {
            ExportFormat::Json => self.render_json(&settings_service.current(), &donors)?,
            ExportFormat::Csv => self.render_csv(&donors),
        };

        let artifact = ExportArtifact {
            format,
            filename: self.filename(format, today),
            profile_count: donors.len(),
            content,
        };

        info!(
            "Exported {} donors ({} bytes) as {}",
            artifact.profile_count,
            artifact.content.len(),
            artifact.filename
        );
        Ok(artifact)
    }

    /// Write the export into `custom_path` (or the documents directory).
    ///
    /// Without a format both the JSON backup and the CSV sheet are written.
    pub async fn export_to_path(
        &self,
        custom_path: Option<&str>,
        format: Option<ExportFormat>,
        donor_service: &DonorService,
        settings_service: &SettingsService,
        today: NaiveDate,
    ) -> RegistryResult<(Vec<PathBuf>, usize)> {
        info!("Exporting to path - custom_path: {:?}", custom_path);

        let export_dir = match custom_path.filter(|p| !p.trim().is_empty()) {
            Some(path) => PathBuf::from(sanitize_path(path)),
            None => default_export_dir().ok_or_else(|| {
                error!("Could not determine default export directory");
                RegistryError::Storage(anyhow::anyhow!("Could not determine default export directory"))
            })?,
        };

        fs::create_dir_all(&export_dir)
            .with_context(|| format!("Failed to create export directory {}", export_dir.display()))?;

        let formats = match format {
            Some(format) => vec![format],
            None => vec![ExportFormat::Json, ExportFormat::Csv],
        };

        let mut written = Vec::new();
        let mut profile_count = 0;
        for format in formats {
            let artifact = self.export_data(format, donor_service, settings_service, today).await?;
            let path = export_dir.join(&artifact.filename);

            fs::write(&path, &artifact.content)
                .with_context(|| format!("Failed to write export file {}", path.display()))?;

            info!("Wrote {} bytes to {}", artifact.content.len(), path.display());
            profile_count = artifact.profile_count;
            written.push(path);
        }

        Ok((written, profile_count))
    }
}

/// Quote a CSV field, doubling embedded quotes
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Documents directory, else the home directory
fn default_export_dir() -> Option<PathBuf> {
    dirs::document_dir().or_else(dirs::home_dir)
}

/// Basic path sanitization to handle common user input issues
pub fn sanitize_path(path: &str) -> String {
    let mut cleaned = path.trim().to_string();

    // Remove surrounding quotes (single or double)
    if cleaned.len() >= 2
        && ((cleaned.starts_with('"') && cleaned.ends_with('"'))
            || (cleaned.starts_with('\'') && cleaned.ends_with('\'')))
    {
        cleaned = cleaned[1..cleaned.len() - 1].trim().to_string();
    }

    // Escaped spaces pasted from a shell
    cleaned = cleaned.replace("\\ ", " ");

    while cleaned.len() > 1 && (cleaned.ends_with('/') || cleaned.ends_with('\\')) {
        cleaned.pop();
    }

    if cleaned.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            if cleaned == "~" {
                cleaned = home.to_string_lossy().to_string();
            } else if cleaned.starts_with("~/") || cleaned.starts_with("~\\") {
                cleaned = home.join(&cleaned[2..]).to_string_lossy().to_string();
            }
        }
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{BloodGroup, Theme};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_donors() -> Vec<Donor> {
        vec![
            Donor {
                id: "donor::1".to_string(),
                name: "Shafiq \"Shaf\" Islam".to_string(),
                age: 45,
                blood_group: BloodGroup::ABNegative,
                phone: Some("01711000000".to_string()),
                notes: Some("Lives far, call first, then text".to_string()),
                donations: vec![ymd(2024, 11, 2), ymd(2025, 2, 10)],
            },
            Donor {
                id: "donor::2".to_string(),
                name: "Mou".to_string(),
                age: 22,
                blood_group: BloodGroup::OPositive,
                phone: None,
                notes: None,
                donations: vec![],
            },
        ]
    }

    #[test]
    fn test_render_csv_layout() {
        let csv = ExportService::new().render_csv(&sample_donors());
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(
            lines[1],
            r#""donor::1","Shafiq ""Shaf"" Islam",45,AB-,"01711000000","Lives far, call first, then text","2024-11-02;2025-02-10""#
        );
        assert_eq!(lines[2], r#""donor::2","Mou",22,O+,"","","""#);
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_render_csv_is_readable_by_csv_parsers() {
        let content = ExportService::new().render_csv(&sample_donors());

        let mut reader = csv::Reader::from_reader(content.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "Shafiq \"Shaf\" Islam");
        assert_eq!(&rows[0][5], "Lives far, call first, then text");
        assert_eq!(&rows[0][6], "2024-11-02;2025-02-10");
        assert_eq!(&rows[1][4], "");
    }

    #[test]
    fn test_render_json_document() {
        let settings = Settings {
            donation_interval_days: 120,
            theme: Theme::Dark,
            locale: "en".to_string(),
        };
        let json = ExportService::new().render_json(&settings, &sample_donors()).unwrap();

        assert!(json.contains('\n'), "export should be pretty-printed");

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["settings"]["donationIntervalDays"], 120);
        assert_eq!(value["settings"]["theme"], "dark");
        assert_eq!(value["data"].as_array().unwrap().len(), 2);
        assert_eq!(value["data"][0]["bloodGroup"], "AB-");
        assert_eq!(value["data"][0]["donations"][1], "2025-02-10");
    }

    #[test]
    fn test_filenames() {
        let service = ExportService::new();
        let today = ymd(2025, 8, 12);
        assert_eq!(service.filename(ExportFormat::Json, today), "donors_backup_2025-08-12.json");
        assert_eq!(service.filename(ExportFormat::Csv, today), "donors_2025-08-12.csv");
    }

    #[test]
    fn test_sanitize_path() {
        assert_eq!(sanitize_path("  \"/tmp/exports/\"  "), "/tmp/exports");
        assert_eq!(sanitize_path("'/tmp/my\\ exports'"), "/tmp/my exports");
        assert_eq!(sanitize_path("/"), "/");

        if let Some(home) = dirs::home_dir() {
            assert_eq!(sanitize_path("~/backups"), home.join("backups").to_string_lossy());
        }
    }
}
