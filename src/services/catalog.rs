// ABOUTME: Reference data import for measurement units, ingredients, and tags
// ABOUTME: Normalizes JSON fixture rows and skips invalid or duplicate entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Catalog fixtures
//!
//! A fixture directory holds `measurement_units.json`, `ingredients.json`
//! and `tags.json`. A missing file is skipped. A row that fails
//! normalization or collides with an existing row is logged and skipped.

use std::path::Path;

use foodgram_core::{
    constants::limits::NAME_MAX_LENGTH,
    errors::{AppError, AppResult},
    text::{capitalize, is_valid_slug, lowercase, normalize_color, slugify},
};
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{info, warn};

use crate::database::{Database, NewTag};

/// `measurement_units.json` row
#[derive(Debug, Clone, Deserialize)]
pub struct MeasurementUnitRecord {
    /// Unit name
    pub name: String,
}

/// `ingredients.json` row
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientRecord {
    /// Ingredient name
    pub name: String,
    /// Unit name; created when missing
    pub measurement_unit: String,
}

/// `tags.json` row
#[derive(Debug, Clone, Deserialize)]
pub struct TagRecord {
    /// Display name
    pub name: String,
    /// `#RRGGBB`
    pub color: String,
    /// Derived from the name when absent
    #[serde(default)]
    pub slug: Option<String>,
}

/// Rows loaded and skipped from one fixture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Rows stored
    pub loaded: usize,
    /// Rows rejected as invalid or duplicate
    pub skipped: usize,
}

/// Per-file results of [`load_directory`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixtureReport {
    /// `measurement_units.json`
    pub measurement_units: ImportReport,
    /// `ingredients.json`
    pub ingredients: ImportReport,
    /// `tags.json`
    pub tags: ImportReport,
}

/// Normalize a catalog name, `None` when blank or too long
fn catalog_name(raw: &str, normalize: fn(&str) -> String) -> Option<String> {
    let name = normalize(raw);
    (!name.is_empty() && name.chars().count() <= NAME_MAX_LENGTH).then_some(name)
}

/// Validate and normalize a tag row
///
/// # Errors
///
/// Returns a field error naming the first invalid field
pub fn normalize_tag(record: &TagRecord) -> AppResult<NewTag> {
    let name = catalog_name(&record.name, capitalize)
        .ok_or_else(|| AppError::field("name", "Enter a name of 1 to 200 characters."))?;
    let color = normalize_color(&record.color)
        .ok_or_else(|| AppError::field("color", "Enter a color as #RRGGBB."))?;
    let slug = match record.slug.as_deref().map(str::trim) {
        Some(slug) if !slug.is_empty() => slug.to_owned(),
        _ => slugify(&name),
    };
    if !is_valid_slug(&slug) {
        return Err(AppError::field("slug", "Enter a valid slug."));
    }
    Ok(NewTag { name, color, slug })
}

/// Store measurement units
///
/// # Errors
///
/// Returns an error if the database operation fails
pub async fn import_measurement_units(
    database: &Database,
    records: &[MeasurementUnitRecord],
) -> AppResult<ImportReport> {
    let mut report = ImportReport::default();
    for record in records {
        let Some(name) = catalog_name(&record.name, lowercase) else {
            warn!(name = %record.name, "Skipping invalid measurement unit");
            report.skipped += 1;
            continue;
        };
        database.ingredients().ensure_measurement_unit(&name).await?;
        report.loaded += 1;
    }
    Ok(report)
}

/// Store ingredients paired with their units
///
/// # Errors
///
/// Returns an error if the database operation fails
pub async fn import_ingredients(
    database: &Database,
    records: &[IngredientRecord],
) -> AppResult<ImportReport> {
    let store = database.ingredients();
    let mut report = ImportReport::default();
    for record in records {
        let (Some(name), Some(unit)) = (
            catalog_name(&record.name, capitalize),
            catalog_name(&record.measurement_unit, lowercase),
        ) else {
            warn!(name = %record.name, unit = %record.measurement_unit, "Skipping invalid ingredient");
            report.skipped += 1;
            continue;
        };

        let unit_id = store.ensure_measurement_unit(&unit).await?;
        let ingredient_id = store.ensure_ingredient(&name).await?;
        let (_, inserted) = store.ensure_ingredient_unit(ingredient_id, unit_id).await?;
        if inserted {
            report.loaded += 1;
        } else {
            warn!(name = %name, unit = %unit, "Skipping duplicate ingredient");
            report.skipped += 1;
        }
    }
    Ok(report)
}

/// Store tags
///
/// # Errors
///
/// Returns an error if the database operation fails
pub async fn import_tags(database: &Database, records: &[TagRecord]) -> AppResult<ImportReport> {
    let mut report = ImportReport::default();
    for record in records {
        let stored = match normalize_tag(record) {
            Ok(tag) => database.tags().create(&tag).await,
            Err(e) => Err(e),
        };
        match stored {
            Ok(_) => report.loaded += 1,
            Err(e) if e.field_errors.is_empty() => return Err(e),
            Err(e) => {
                warn!(name = %record.name, reason = %e.field_errors.summary(), "Skipping tag");
                report.skipped += 1;
            }
        }
    }
    Ok(report)
}

/// Load every fixture found in `dir`; units go first so ingredients can reference them
///
/// # Errors
///
/// Returns an error if a file cannot be read or parsed, or a database error
pub async fn load_directory(database: &Database, dir: &Path) -> AppResult<FixtureReport> {
    let mut report = FixtureReport::default();

    if let Some(units) = read_fixture::<MeasurementUnitRecord>(dir, "measurement_units.json").await? {
        report.measurement_units = import_measurement_units(database, &units).await?;
        log_report("measurement_units", report.measurement_units);
    }
    if let Some(ingredients) = read_fixture::<IngredientRecord>(dir, "ingredients.json").await? {
        report.ingredients = import_ingredients(database, &ingredients).await?;
        log_report("ingredients", report.ingredients);
    }
    if let Some(tags) = read_fixture::<TagRecord>(dir, "tags.json").await? {
        report.tags = import_tags(database, &tags).await?;
        log_report("tags", report.tags);
    }
    Ok(report)
}

fn log_report(fixture: &str, report: ImportReport) {
    info!(
        fixture,
        loaded = report.loaded,
        skipped = report.skipped,
        "Fixture loaded"
    );
}

async fn read_fixture<T: DeserializeOwned>(dir: &Path, file: &str) -> AppResult<Option<Vec<T>>> {
    let path = dir.join(file);
    let contents = match tokio::fs::read(&path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "Fixture not found, skipping");
            return Ok(None);
        }
        Err(e) => {
            return Err(AppError::storage(format!(
                "Failed to read {}: {e}",
                path.display()
            )))
        }
    };
    serde_json::from_slice(&contents)
        .map(Some)
        .map_err(|e| AppError::invalid_input(format!("Malformed {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_normalization() {
        let tag = normalize_tag(&TagRecord {
            name: "  завтрак ".to_owned(),
            color: "#e26c2d".to_owned(),
            slug: None,
        })
        .unwrap();
        assert_eq!(tag.name, "Завтрак");
        assert_eq!(tag.color, "#E26C2D");
        assert_eq!(tag.slug, "zavtrak");
    }

    #[test]
    fn test_tag_rejects_bad_color_and_slug() {
        let bad_color = TagRecord {
            name: "Lunch".to_owned(),
            color: "red".to_owned(),
            slug: None,
        };
        assert!(normalize_tag(&bad_color).unwrap_err().field_errors.contains("color"));

        let bad_slug = TagRecord {
            name: "Lunch".to_owned(),
            color: "#00FF00".to_owned(),
            slug: Some("no spaces".to_owned()),
        };
        assert!(normalize_tag(&bad_slug).unwrap_err().field_errors.contains("slug"));
    }

    #[test]
    fn test_catalog_name_limits() {
        assert_eq!(catalog_name("  G ", lowercase).as_deref(), Some("g"));
        assert!(catalog_name("   ", lowercase).is_none());
        assert!(catalog_name(&"x".repeat(NAME_MAX_LENGTH + 1), capitalize).is_none());
    }
}
