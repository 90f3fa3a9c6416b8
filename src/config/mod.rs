mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    config.database.path = expand_path(&config.database.path);

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./sitai.toml", "~/.config/sitai/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Return a list of non-fatal issues worth telling the operator about.
pub fn config_warnings(config: &Config) -> Vec<String> {
    let mut warnings = Vec::new();

    let srid = config.defaults.srid.trim();
    if !KNOWN_SRIDS.contains(&srid) {
        warnings.push(format!(
            "defaults.srid '{}' is not one of {}",
            srid,
            KNOWN_SRIDS.join(", ")
        ));
    }

    if !config.display.date_format.contains("%Y") && !config.display.date_format.contains("%y")
    {
        warnings.push(format!(
            "display.date_format '{}' does not show the year",
            config.display.date_format
        ));
    }

    if config.database.path.extension().is_none() {
        warnings.push(format!(
            "database.path {:?} has no file extension",
            config.database.path
        ));
    }

    warnings
}

/// Coordinate reference systems offered as suggestions.
pub const KNOWN_SRIDS: &[&str] = &["WGS84", "SIRGAS2000", "SAD69"];

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.database.path.as_os_str().is_empty() {
        anyhow::bail!("database.path cannot be empty");
    }

    if config.defaults.srid.trim().is_empty() {
        anyhow::bail!("defaults.srid cannot be empty");
    }

    if config.display.date_format.trim().is_empty() {
        anyhow::bail!("display.date_format cannot be empty");
    }

    Ok(())
}

fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
}
