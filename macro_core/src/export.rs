//! Export of saved days.
//!
//! The CSV header uses the canonical import field names, so an exported file
//! can be fed straight back through the importer.
//!
//! Fields containing a comma are quoted and survive re-import. The importer
//! treats every `"` as a quote toggle, so a literal quote inside a date is
//! written as the `""` escape here but comes back with the quotes removed.

use crate::{Error, Result, SavedDay};
use std::fs::OpenOptions;
use std::io;
use std::path::Path;

/// Column order of exported CSV
pub const CSV_HEADER: [&str; 9] = [
    "date",
    "totalCalories",
    "totalProtein",
    "totalCarbs",
    "totalFat",
    "deficit",
    "weight",
    "mealsCount",
    "workoutsCount",
];

fn write_rows<W: io::Write>(writer: &mut csv::Writer<W>, days: &[SavedDay]) -> Result<()> {
    writer.write_record(CSV_HEADER)?;
    for day in days {
        writer.write_record(&[
            day.date.clone(),
            day.total_calories.to_string(),
            day.total_protein.to_string(),
            day.total_carbs.to_string(),
            day.total_fat.to_string(),
            day.deficit.to_string(),
            day.weight.to_string(),
            day.meals_count.to_string(),
            day.workouts_count.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Render saved days as CSV text with a header row
pub fn saved_days_to_csv(days: &[SavedDay]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    write_rows(&mut writer, days)?;

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| Error::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Render saved days as a pretty JSON array
pub fn saved_days_to_json(days: &[SavedDay]) -> Result<String> {
    Ok(serde_json::to_string_pretty(days)?)
}

/// Write saved days to a CSV file, replacing any existing content
///
/// The file is synced to disk before returning.
pub fn write_csv_file(path: &Path, days: &[SavedDay]) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    write_rows(&mut writer, days)?;

    let file = writer
        .into_inner()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Exported {} saved days to {:?}", days.len(), path);
    Ok(days.len())
}
