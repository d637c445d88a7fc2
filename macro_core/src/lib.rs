#![forbid(unsafe_code)]

//! Core domain model and business logic for the macro tracker.
//!
//! This crate provides:
//! - Domain types (user, food and workout logs, daily entry, saved days)
//! - Daily totals and target progress
//! - The state store with save-on-change persistence
//! - Import of saved days from JSON or CSV text, and export back out
//! - Weight trend over saved history

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod totals;
pub mod import;
pub mod export;
pub mod upload;
pub mod demo;
pub mod storage;
pub mod store;
pub mod summary;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use totals::{compute_daily_entry, nutrition_progress, EnergyBalance, NutritionProgress, TotalsPolicy};
pub use import::{merge_saved_days, parse_import_text, ImportBatch, ImportFormat};
pub use export::{saved_days_to_csv, saved_days_to_json};
pub use storage::{JsonStateFile, MemorySink, StateSink};
pub use store::{ImportSummary, Tracker, WeightAdjustment};
pub use summary::{weight_trend, WeightTrend};
