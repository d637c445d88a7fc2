//! Import of saved days from pasted text.
//!
//! Text is tried as JSON first (an array of objects or a single object) and
//! falls back to CSV with a header row. Field names are matched against a
//! fixed alias table, numbers are coerced with a zero default, and the
//! result is merged into the saved-days collection by date.

use crate::{Error, Result, SavedDay};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// One record before normalization, keyed by the source's field names
type RawRecord = Map<String, Value>;

/// Detected input format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportFormat {
    Json,
    Csv,
}

impl fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportFormat::Json => write!(f, "JSON"),
            ImportFormat::Csv => write!(f, "CSV"),
        }
    }
}

/// Normalized records ready to merge
#[derive(Clone, Debug, PartialEq)]
pub struct ImportBatch {
    pub format: ImportFormat,
    pub days: Vec<SavedDay>,
}

// ============================================================================
// Alias table
// ============================================================================

/// Saved-day fields that can be imported
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Field {
    Date,
    TotalCalories,
    TotalProtein,
    TotalCarbs,
    TotalFat,
    Deficit,
    Weight,
    MealsCount,
    WorkoutsCount,
}

impl Field {
    /// Accepted source names, checked in order
    fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Date => &["date", "Date"],
            Field::TotalCalories => &["totalCalories", "Calories", "calories"],
            Field::TotalProtein => &["totalProtein", "Protein", "protein"],
            Field::TotalCarbs => &["totalCarbs", "Carbs", "carbs"],
            Field::TotalFat => &["totalFat", "Fat", "fat"],
            Field::Deficit => &["deficit", "Deficit", "calorieDeficit"],
            Field::Weight => &["weight", "Weight"],
            Field::MealsCount => &["mealsCount", "meals", "Meals"],
            Field::WorkoutsCount => &["workoutsCount", "workouts", "Workouts"],
        }
    }
}

/// First alias carrying a non-empty value
fn lookup(record: &RawRecord, field: Field) -> Option<&Value> {
    field.aliases().iter().find_map(|alias| match record.get(*alias) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(value) => Some(value),
    })
}

fn coerce_number(value: Option<&Value>) -> f64 {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        _ => 0.0,
    };
    if number.is_finite() {
        number
    } else {
        0.0
    }
}

fn coerce_count(value: Option<&Value>) -> u32 {
    let number = coerce_number(value);
    if number > 0.0 {
        number.round() as u32
    } else {
        0
    }
}

fn coerce_date(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn normalize(record: &RawRecord) -> SavedDay {
    SavedDay {
        date: coerce_date(lookup(record, Field::Date)),
        total_calories: coerce_number(lookup(record, Field::TotalCalories)),
        total_protein: coerce_number(lookup(record, Field::TotalProtein)),
        total_carbs: coerce_number(lookup(record, Field::TotalCarbs)),
        total_fat: coerce_number(lookup(record, Field::TotalFat)),
        deficit: coerce_number(lookup(record, Field::Deficit)),
        weight: coerce_number(lookup(record, Field::Weight)),
        meals_count: coerce_count(lookup(record, Field::MealsCount)),
        workouts_count: coerce_count(lookup(record, Field::WorkoutsCount)),
    }
}

// ============================================================================
// Format detection and parsing
// ============================================================================

fn json_records(value: Value) -> Vec<RawRecord> {
    let as_record = |v: Value| match v {
        Value::Object(map) => map,
        _ => RawRecord::new(),
    };
    match value {
        Value::Array(items) => items.into_iter().map(as_record).collect(),
        other => vec![as_record(other)],
    }
}

/// Strip a single pair of quotes wrapping the whole line
fn strip_wrapping_quotes(line: &str) -> &str {
    if line.len() >= 2 && line.starts_with('"') && line.ends_with('"') {
        let inner = &line[1..line.len() - 1];
        if !inner.contains('"') {
            return inner;
        }
    }
    line
}

/// Split one CSV line on commas outside quotes.
///
/// A quote toggles quoted mode and is not kept. Tokens are trimmed.
fn split_csv_line(line: &str) -> Vec<String> {
    let line = strip_wrapping_quotes(line.trim());
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => tokens.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    tokens.push(current);

    tokens.into_iter().map(|t| t.trim().to_string()).collect()
}

fn csv_records(text: &str) -> Vec<RawRecord> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let header = match lines.next() {
        Some(line) => split_csv_line(line),
        None => return Vec::new(),
    };

    lines
        .map(|line| {
            let mut tokens = split_csv_line(line).into_iter();
            header
                .iter()
                .map(|name| (name.clone(), Value::String(tokens.next().unwrap_or_default())))
                .collect::<RawRecord>()
        })
        .collect()
}

/// Parse pasted text into normalized saved days.
///
/// Fails when nothing usable was found or the first record has no date.
/// Later records are not validated; missing numbers become zero.
pub fn parse_import_text(text: &str) -> Result<ImportBatch> {
    let (format, records) = match serde_json::from_str::<Value>(text) {
        Ok(value) => (ImportFormat::Json, json_records(value)),
        Err(e) => {
            tracing::debug!("Import text is not JSON ({}), trying CSV", e);
            (ImportFormat::Csv, csv_records(text))
        }
    };

    let days: Vec<SavedDay> = records.iter().map(normalize).collect();

    match days.first() {
        None => {
            return Err(Error::Import(format!(
                "no records found in {} input",
                format
            )))
        }
        Some(first) if first.date.is_empty() => {
            return Err(Error::Import(
                "first record has no date; expected a 'date' or 'Date' field".into(),
            ))
        }
        Some(_) => {}
    }

    let undated = days.iter().filter(|d| d.date.is_empty()).count();
    if undated > 0 {
        tracing::warn!("{} imported records have no date", undated);
    }

    tracing::debug!("Parsed {} records from {}", days.len(), format);
    Ok(ImportBatch { format, days })
}

// ============================================================================
// Merge
// ============================================================================

/// Parse a saved-day date for calendar ordering
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

/// Newest first; dates that don't parse sort after all dated entries
fn newest_first(a: &SavedDay, b: &SavedDay) -> Ordering {
    match (parse_calendar_date(&a.date), parse_calendar_date(&b.date)) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Merge incoming days over existing ones by date.
///
/// Incoming data wins on a date collision. The result is sorted by
/// calendar date, newest first.
pub fn merge_saved_days(existing: &[SavedDay], incoming: Vec<SavedDay>) -> Vec<SavedDay> {
    let mut merged: Vec<SavedDay> = Vec::with_capacity(existing.len() + incoming.len());
    let mut index_by_date: HashMap<String, usize> = HashMap::new();

    for day in existing.iter().cloned().chain(incoming) {
        match index_by_date.get(&day.date) {
            Some(&i) => merged[i] = day,
            None => {
                index_by_date.insert(day.date.clone(), merged.len());
                merged.push(day);
            }
        }
    }

    merged.sort_by(newest_first);
    merged
}
