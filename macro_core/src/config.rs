//! Configuration file support for the macro tracker.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/macro-tracker/config.toml`.

use crate::{Error, LogScope, Result, Sex, User};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "macro-tracker";

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub targets: TargetsConfig,

    #[serde(default)]
    pub logs: LogsConfig,

    #[serde(default)]
    pub profile: ProfileConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Daily targets and the constants feeding the totals
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TargetsConfig {
    #[serde(default = "default_calorie_target")]
    pub calorie_target_kcal: f64,

    #[serde(default = "default_bmr")]
    pub bmr_kcal: f64,

    #[serde(default = "default_weight_step")]
    pub weight_step_lb: f64,
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            calorie_target_kcal: default_calorie_target(),
            bmr_kcal: default_bmr(),
            weight_step_lb: default_weight_step(),
        }
    }
}

/// Log aggregation configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct LogsConfig {
    #[serde(default)]
    pub scope: LogScope,
}

/// Profile used when no persisted state exists yet
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default = "default_user_id")]
    pub id: String,
    #[serde(default = "default_age")]
    pub age: u32,
    #[serde(default = "default_sex")]
    pub sex: Sex,
    #[serde(default = "default_height_cm")]
    pub height_cm: f64,
    #[serde(default = "default_weight_lb")]
    pub weight_lb: f64,
    #[serde(default = "default_activity_multiplier")]
    pub activity_multiplier: f64,
    #[serde(default = "default_protein_target")]
    pub protein_target_g_per_lb: f64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            id: default_user_id(),
            age: default_age(),
            sex: default_sex(),
            height_cm: default_height_cm(),
            weight_lb: default_weight_lb(),
            activity_multiplier: default_activity_multiplier(),
            protein_target_g_per_lb: default_protein_target(),
        }
    }
}

impl ProfileConfig {
    /// Build the user this profile describes
    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            age: self.age,
            sex: self.sex,
            height_cm: self.height_cm,
            weight_lb: self.weight_lb,
            activity_multiplier: self.activity_multiplier,
            protein_target_g_per_lb: self.protein_target_g_per_lb,
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".local/share"));
    base.join(APP_DIR)
}

fn default_calorie_target() -> f64 {
    2400.0
}

fn default_bmr() -> f64 {
    1800.0
}

fn default_weight_step() -> f64 {
    0.5
}

fn default_user_id() -> String {
    "1".into()
}

fn default_age() -> u32 {
    38
}

fn default_sex() -> Sex {
    Sex::Male
}

fn default_height_cm() -> f64 {
    183.0
}

fn default_weight_lb() -> f64 {
    169.0
}

fn default_activity_multiplier() -> f64 {
    1.5
}

fn default_protein_target() -> f64 {
    1.0
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject values the totals cannot work with
    pub fn validate(&self) -> Result<()> {
        let targets = &self.targets;
        if !(targets.weight_step_lb.is_finite() && targets.weight_step_lb > 0.0) {
            return Err(Error::Config(format!(
                "weight_step_lb must be positive, got {}",
                targets.weight_step_lb
            )));
        }
        if !(targets.calorie_target_kcal.is_finite() && targets.calorie_target_kcal > 0.0) {
            return Err(Error::Config(format!(
                "calorie_target_kcal must be positive, got {}",
                targets.calorie_target_kcal
            )));
        }
        if !targets.bmr_kcal.is_finite() || targets.bmr_kcal < 0.0 {
            return Err(Error::Config(format!(
                "bmr_kcal must be non-negative, got {}",
                targets.bmr_kcal
            )));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));
        base.join(APP_DIR).join("config.toml")
    }
}
