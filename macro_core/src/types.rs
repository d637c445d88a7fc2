//! Core domain types for the macro tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - The user profile
//! - Food and workout log entries
//! - The derived daily entry and saved-day snapshots
//! - The whole application state that gets persisted

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// User Profile
// ============================================================================

/// Biological sex as recorded on the profile
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

/// The tracked user.
///
/// Age, sex, height and activity multiplier are carried but do not feed the
/// burn calculation, which uses a fixed BMR.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub age: u32,
    pub sex: Sex,
    pub height_cm: f64,
    pub weight_lb: f64,
    pub activity_multiplier: f64,
    pub protein_target_g_per_lb: f64,
}

// ============================================================================
// Log Entries
// ============================================================================

/// A logged meal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FoodLog {
    pub id: Uuid,
    /// Date that was current when the meal was logged
    pub daily_entry_id: NaiveDate,
    pub description: String,
    pub calories_kcal: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// Meal fields supplied by the user; id and date are assigned by the store
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewFoodLog {
    pub description: String,
    pub calories_kcal: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// A logged exercise session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutLog {
    pub id: Uuid,
    /// Date that was current when the workout was logged
    pub daily_entry_id: NaiveDate,
    #[serde(rename = "type")]
    pub workout_type: String,
    pub duration_minutes: f64,
    pub estimated_burn_kcal: f64,
}

/// Workout fields supplied by the user; id and date are assigned by the store
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewWorkoutLog {
    pub workout_type: String,
    pub duration_minutes: f64,
    pub estimated_burn_kcal: f64,
}

/// Which logs count towards the selected date's totals
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogScope {
    /// Every log in the store counts, whatever date it was logged under
    #[default]
    Global,
    /// Only logs created while the selected date was current count
    PerDate,
}

// ============================================================================
// Daily Entry and Saved Days
// ============================================================================

/// Derived totals for the selected date. Never stored in history.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DailyEntry {
    pub id: String,
    pub date: NaiveDate,
    pub weight_kg: f64,
    pub bmr_kcal: f64,
    pub activity_kcal: f64,
    pub total_burn_kcal: i64,
    pub total_intake_kcal: i64,
    pub total_protein_g: i64,
    pub total_carbs_g: i64,
    pub total_fat_g: i64,
    /// Burn minus intake; positive is a deficit, negative a surplus
    pub deficit_kcal: i64,
    pub journal_text: Option<String>,
    pub recommendation_text: Option<String>,
}

/// Snapshot of one date's totals, keyed by `date`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedDay {
    /// Kept verbatim; imported dates are not reformatted
    pub date: String,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub deficit: f64,
    /// Pounds
    pub weight: f64,
    pub meals_count: u32,
    pub workouts_count: u32,
}

// ============================================================================
// Application State
// ============================================================================

/// Everything the tracker persists between runs
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub user: User,
    pub current_date: NaiveDate,
    pub daily_entry: Option<DailyEntry>,
    #[serde(default)]
    pub food_logs: Vec<FoodLog>,
    #[serde(default)]
    pub workout_logs: Vec<WorkoutLog>,
    #[serde(default)]
    pub saved_days: Vec<SavedDay>,
}

impl AppState {
    /// Fresh state for a user with no logs and no history
    pub fn new(user: User, current_date: NaiveDate) -> Self {
        Self {
            user,
            current_date,
            daily_entry: None,
            food_logs: Vec::new(),
            workout_logs: Vec::new(),
            saved_days: Vec::new(),
        }
    }
}
