//! Application configuration.
//!
//! Read once at startup from YAML. The file is taken from `RAFIQ_CONFIG`
//! when set, otherwise `rafiq.yaml` in the working directory; with neither
//! present the defaults below apply. Every key is optional.
//!
//! ```yaml
//! server:
//!   bind_address: "127.0.0.1:3000"
//!   allowed_origin: "http://localhost:8080"
//! storage:
//!   backend: file          # or "memory"
//!   data_dir: /var/lib/rafiq
//! calendar:
//!   countdown_target: "2026-02-18T00:00:00Z"
//!   window_start: "2026-02-18"
//!   window_end_exclusive: "2026-03-20"
//!   total_days: 30
//! records:
//!   default_list_limit: 50
//! ```

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::backend::domain::{RamadanCalendar, DEFAULT_LIST_LIMIT};

pub const CONFIG_ENV_VAR: &str = "RAFIQ_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "rafiq.yaml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub calendar: CalendarConfig,
    pub records: RecordsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    /// Frontend origin allowed by CORS
    pub allowed_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            allowed_origin: "http://localhost:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    #[default]
    File,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Configured data directory, else the platform data dir, else `./rafiq-data`
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|dir| dir.join("rafiq"))
                .unwrap_or_else(|| PathBuf::from("rafiq-data"))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub countdown_target: DateTime<Utc>,
    pub window_start: NaiveDate,
    pub window_end_exclusive: NaiveDate,
    pub total_days: u32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        let calendar = RamadanCalendar::default();
        Self {
            countdown_target: calendar.countdown_target,
            window_start: calendar.window_start,
            window_end_exclusive: calendar.window_end_exclusive,
            total_days: calendar.total_days,
        }
    }
}

impl CalendarConfig {
    pub fn to_calendar(&self) -> Result<RamadanCalendar> {
        if self.window_end_exclusive <= self.window_start {
            bail!(
                "calendar.window_end_exclusive ({}) must be after calendar.window_start ({})",
                self.window_end_exclusive,
                self.window_start
            );
        }
        let window_days = (self.window_end_exclusive - self.window_start).num_days();
        if window_days != i64::from(self.total_days) {
            bail!(
                "calendar.total_days ({}) must match the {} days from {} to {}",
                self.total_days,
                window_days,
                self.window_start,
                self.window_end_exclusive
            );
        }
        Ok(RamadanCalendar {
            countdown_target: self.countdown_target,
            window_start: self.window_start,
            window_end_exclusive: self.window_end_exclusive,
            total_days: self.total_days,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordsConfig {
    pub default_list_limit: usize,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            default_list_limit: DEFAULT_LIST_LIMIT,
        }
    }
}

impl AppConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse configuration")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Load from `RAFIQ_CONFIG`, then `rafiq.yaml`, then defaults
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            info!("Loading configuration from {} ({})", path, CONFIG_ENV_VAR);
            return Self::from_file(Path::new(&path));
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            info!("Loading configuration from {}", DEFAULT_CONFIG_FILE);
            return Self::from_file(default_path);
        }

        info!("No configuration file found, using defaults");
        Ok(Self::default())
    }
}
