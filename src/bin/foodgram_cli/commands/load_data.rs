// ABOUTME: load-data command for foodgram-cli
// ABOUTME: Imports measurement units, ingredients, and tags from JSON fixtures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::path::Path;

use foodgram_server::{
    database::Database,
    services::catalog::{self, ImportReport},
};
use tracing::info;

use crate::Result;

/// Load every fixture in `dir` and print a summary
pub async fn run(database: &Database, dir: &Path) -> Result<()> {
    info!("Loading fixtures from {}", dir.display());
    let report = catalog::load_directory(database, dir).await?;

    println!("\nCatalog fixtures loaded from {}", dir.display());
    println!("{}", "=".repeat(50));
    print_line("Measurement units", report.measurement_units);
    print_line("Ingredients", report.ingredients);
    print_line("Tags", report.tags);
    Ok(())
}

fn print_line(label: &str, report: ImportReport) {
    println!(
        "   {label:<18} {:>6} loaded {:>6} skipped",
        report.loaded, report.skipped
    );
}
