use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite file; `~` is expanded, relative paths resolve
    /// against the working directory
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("data").join("database.db")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DefaultsConfig {
    /// SRID applied to new points when `--srid` is not given
    #[serde(default = "default_srid")]
    pub srid: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            srid: default_srid(),
        }
    }
}

fn default_srid() -> String {
    sitai_core::DEFAULT_SRID.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// strftime pattern used for discovery dates in listings
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Longest description shown before truncating with "..."
    #[serde(default = "default_description_preview")]
    pub description_preview: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            description_preview: default_description_preview(),
        }
    }
}

fn default_date_format() -> String {
    "%d/%m/%Y".to_string()
}

fn default_description_preview() -> usize {
    100
}
