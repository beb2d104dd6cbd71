use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CashflowError, Result};

/// Cut-offs used when deriving severities and flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// NSF hits above this count are a red flag; at or below (but non-zero) a warning.
    pub nsf_high_count: usize,
    /// Coefficient of variation (percent) above which deposits are "highly volatile".
    pub high_volatility_cv: f64,
    pub large_deposit_concentration_pct: f64,
    /// Balance change (percent) below which the balance trend is a red flag.
    pub balance_decline_pct: f64,
    pub outlier_std_devs: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            nsf_high_count: 5,
            high_volatility_cv: 30.0,
            large_deposit_concentration_pct: 30.0,
            balance_decline_pct: -20.0,
            outlier_std_devs: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default = "default_format")]
    pub default_format: String,
}

fn default_format() -> String {
    "table".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            default_format: default_format(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("cashflow-analytics")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Load settings from `path`, falling back to defaults when the file is
/// missing or unreadable.
pub fn load_settings_from(path: &Path) -> Settings {
    if !path.exists() {
        return Settings::default();
    }
    let content = std::fs::read_to_string(path).unwrap_or_default();
    match serde_json::from_str(&content) {
        Ok(settings) => settings,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "ignoring unreadable settings file");
            Settings::default()
        }
    }
}

pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| CashflowError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}
