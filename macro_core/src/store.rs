//! Application state store.
//!
//! [`Tracker`] owns the [`AppState`], applies every mutation, recomputes the
//! daily totals synchronously and hands the new state to its [`StateSink`]
//! after each change.

use crate::import::{merge_saved_days, parse_import_text, ImportFormat};
use crate::storage::StateSink;
use crate::totals::{compute_daily_entry, logs_in_scope, nutrition_progress};
use crate::{
    AppState, DailyEntry, Error, FoodLog, NewFoodLog, NewWorkoutLog, NutritionProgress,
    Result, SavedDay, TotalsPolicy, WorkoutLog,
};
use chrono::{Duration, NaiveDate};
use uuid::Uuid;

/// Direction of a single weight step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeightAdjustment {
    Increase,
    Decrease,
}

/// Outcome of a successful import
#[derive(Clone, Debug, PartialEq)]
pub struct ImportSummary {
    pub format: ImportFormat,
    /// Records read from the input
    pub imported: usize,
    /// Saved days after the merge
    pub total: usize,
}

/// Non-finite numbers serialize as JSON `null` and would make the snapshot unreadable
fn ensure_finite(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::State(format!("{} must be a finite number, got {}", field, value)))
    }
}

/// The explicitly constructed application state object
pub struct Tracker<S: StateSink> {
    state: AppState,
    policy: TotalsPolicy,
    sink: S,
}

impl<S: StateSink> Tracker<S> {
    pub fn new(state: AppState, policy: TotalsPolicy, sink: S) -> Self {
        Self {
            state,
            policy,
            sink,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn commit(&mut self) -> Result<()> {
        self.sink.persist(&self.state)
    }

    /// Rebuild the daily entry from scratch, keeping the prior notes
    fn recalculate(&mut self) {
        let journal_text = self
            .state
            .daily_entry
            .as_ref()
            .and_then(|entry| entry.journal_text.clone());

        let entry = compute_daily_entry(
            self.state.current_date,
            self.state.user.weight_lb,
            &self.state.food_logs,
            &self.state.workout_logs,
            &self.policy,
            journal_text,
        );
        tracing::debug!(
            "Totals for {}: intake {} kcal, burn {} kcal, deficit {} kcal",
            entry.id,
            entry.total_intake_kcal,
            entry.total_burn_kcal,
            entry.deficit_kcal
        );
        self.state.daily_entry = Some(entry);
    }

    // ========================================================================
    // Totals and date
    // ========================================================================

    /// Recompute the daily entry for the current date
    pub fn calculate_totals(&mut self) -> Result<&DailyEntry> {
        self.recalculate();
        self.commit()?;
        self.state
            .daily_entry
            .as_ref()
            .ok_or_else(|| Error::State("daily entry missing after recalculation".into()))
    }

    /// Select a date and recompute its totals
    pub fn set_current_date(&mut self, date: NaiveDate) -> Result<()> {
        tracing::info!("Current date set to {}", date);
        self.state.current_date = date;
        self.recalculate();
        self.commit()
    }

    /// Move the selected date by a number of days
    pub fn shift_date(&mut self, days: i64) -> Result<NaiveDate> {
        let date = self.state.current_date + Duration::days(days);
        self.set_current_date(date)?;
        Ok(date)
    }

    // ========================================================================
    // Logs
    // ========================================================================

    /// Log a meal under the current date
    pub fn add_food_log(&mut self, new: NewFoodLog) -> Result<FoodLog> {
        ensure_finite("calories", new.calories_kcal)?;
        ensure_finite("protein", new.protein_g)?;
        ensure_finite("carbs", new.carbs_g)?;
        ensure_finite("fat", new.fat_g)?;
        let log = FoodLog {
            id: Uuid::new_v4(),
            daily_entry_id: self.state.current_date,
            description: new.description,
            calories_kcal: new.calories_kcal,
            protein_g: new.protein_g,
            carbs_g: new.carbs_g,
            fat_g: new.fat_g,
        };
        self.state.food_logs.push(log.clone());
        tracing::info!("Logged meal {} ({} kcal)", log.id, log.calories_kcal);
        self.recalculate();
        self.commit()?;
        Ok(log)
    }

    /// Log a workout under the current date
    pub fn add_workout_log(&mut self, new: NewWorkoutLog) -> Result<WorkoutLog> {
        ensure_finite("duration", new.duration_minutes)?;
        ensure_finite("burn", new.estimated_burn_kcal)?;
        let log = WorkoutLog {
            id: Uuid::new_v4(),
            daily_entry_id: self.state.current_date,
            workout_type: new.workout_type,
            duration_minutes: new.duration_minutes,
            estimated_burn_kcal: new.estimated_burn_kcal,
        };
        self.state.workout_logs.push(log.clone());
        tracing::info!(
            "Logged workout {} ({} kcal)",
            log.id,
            log.estimated_burn_kcal
        );
        self.recalculate();
        self.commit()?;
        Ok(log)
    }

    /// Remove a meal; returns false if no meal had that id
    pub fn delete_food_log(&mut self, id: Uuid) -> Result<bool> {
        let before = self.state.food_logs.len();
        self.state.food_logs.retain(|log| log.id != id);
        let removed = self.state.food_logs.len() != before;
        if !removed {
            tracing::debug!("No meal with id {}", id);
        }
        self.recalculate();
        self.commit()?;
        Ok(removed)
    }

    /// Remove a workout; returns false if no workout had that id
    pub fn delete_workout_log(&mut self, id: Uuid) -> Result<bool> {
        let before = self.state.workout_logs.len();
        self.state.workout_logs.retain(|log| log.id != id);
        let removed = self.state.workout_logs.len() != before;
        if !removed {
            tracing::debug!("No workout with id {}", id);
        }
        self.recalculate();
        self.commit()?;
        Ok(removed)
    }

    /// Meals counted for the current date under the configured scope
    pub fn visible_food_logs(&self) -> Vec<&FoodLog> {
        logs_in_scope(&self.state.food_logs, self.state.current_date, self.policy.scope).collect()
    }

    /// Workouts counted for the current date under the configured scope
    pub fn visible_workout_logs(&self) -> Vec<&WorkoutLog> {
        logs_in_scope(
            &self.state.workout_logs,
            self.state.current_date,
            self.policy.scope,
        )
        .collect()
    }

    // ========================================================================
    // Weight and notes
    // ========================================================================

    /// Set body weight in pounds, floored at zero
    pub fn update_weight(&mut self, weight_lb: f64) -> Result<()> {
        ensure_finite("weight", weight_lb)?;
        self.state.user.weight_lb = weight_lb.max(0.0);
        tracing::info!("Weight set to {} lb", self.state.user.weight_lb);
        self.recalculate();
        self.commit()
    }

    /// Step weight up or down by the configured increment
    pub fn adjust_weight(&mut self, adjustment: WeightAdjustment) -> Result<f64> {
        let step = self.policy.weight_step_lb;
        let current = self.state.user.weight_lb;
        let next = match adjustment {
            WeightAdjustment::Increase => current + step,
            WeightAdjustment::Decrease => current - step,
        };
        self.update_weight(next)?;
        Ok(self.state.user.weight_lb)
    }

    /// Set the journal notes; no-op before totals exist
    pub fn update_notes(&mut self, notes: &str) -> Result<bool> {
        match self.state.daily_entry.as_mut() {
            Some(entry) => {
                entry.journal_text = Some(notes.to_string());
                self.commit()?;
                Ok(true)
            }
            None => {
                tracing::debug!("No daily entry yet, notes ignored");
                Ok(false)
            }
        }
    }

    pub fn progress(&self) -> NutritionProgress {
        nutrition_progress(
            &self.state.user,
            self.state.daily_entry.as_ref(),
            &self.policy,
        )
    }

    // ========================================================================
    // Saved days
    // ========================================================================

    /// Snapshot the current totals as the saved day for the current date.
    ///
    /// Replaces any existing snapshot for that date and puts the new one
    /// first. Returns `None` without touching state if no totals exist.
    pub fn save_current_day(&mut self) -> Result<Option<SavedDay>> {
        let Some(entry) = self.state.daily_entry.as_ref() else {
            tracing::debug!("No daily entry to save");
            return Ok(None);
        };

        let date = self.state.current_date.format("%Y-%m-%d").to_string();
        let saved = SavedDay {
            date: date.clone(),
            total_calories: entry.total_intake_kcal as f64,
            total_protein: entry.total_protein_g as f64,
            total_carbs: entry.total_carbs_g as f64,
            total_fat: entry.total_fat_g as f64,
            deficit: entry.deficit_kcal as f64,
            weight: self.state.user.weight_lb,
            meals_count: self.visible_food_logs().len() as u32,
            workouts_count: self.visible_workout_logs().len() as u32,
        };

        self.state.saved_days.retain(|d| d.date != date);
        self.state.saved_days.insert(0, saved.clone());
        tracing::info!("Saved day {}", date);
        self.commit()?;
        Ok(Some(saved))
    }

    /// Merge saved days by date, imported data winning, newest first
    pub fn import_saved_days(&mut self, days: Vec<SavedDay>) -> Result<usize> {
        let incoming = days.len();
        self.state.saved_days = merge_saved_days(&self.state.saved_days, days);
        tracing::info!(
            "Imported {} days, {} saved days total",
            incoming,
            self.state.saved_days.len()
        );
        self.commit()?;
        Ok(self.state.saved_days.len())
    }

    /// Parse pasted text and merge it. State is untouched on failure.
    pub fn import_text(&mut self, text: &str) -> Result<ImportSummary> {
        let batch = match parse_import_text(text) {
            Ok(batch) => batch,
            Err(e) => {
                tracing::error!("Import failed: {}", e);
                return Err(e);
            }
        };
        let imported = batch.days.len();
        let total = self.import_saved_days(batch.days)?;
        Ok(ImportSummary {
            format: batch.format,
            imported,
            total,
        })
    }

    /// Remove the saved day for a date; returns false if there was none
    pub fn delete_saved_day(&mut self, date: &str) -> Result<bool> {
        let before = self.state.saved_days.len();
        self.state.saved_days.retain(|d| d.date != date);
        let removed = self.state.saved_days.len() != before;
        self.commit()?;
        Ok(removed)
    }

    /// Replace saved days with the built-in demo history
    pub fn load_demo_data(&mut self) -> Result<()> {
        self.state.saved_days = crate::demo::demo_saved_days().to_vec();
        tracing::info!("Loaded {} demo days", self.state.saved_days.len());
        self.commit()
    }
}
