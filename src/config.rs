use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::views::BarOrder;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "COVID_DASHBOARD_CONFIG";

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// User-tunable settings. Every field has a default, so a config file only
/// needs the keys it changes:
///
/// ```json
/// { "race_column": "race", "missing_values": ["", "NA", "Missing"] }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Source column holding the age-group category.
    pub age_column: String,
    /// Source column holding the race/ethnicity category.
    pub race_column: String,
    /// Cell values treated as absent (compared after trimming).
    pub missing_values: Vec<String>,
    /// Bar chart ordering.
    pub bar_order: BarOrder,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            age_column: "age_group".to_string(),
            race_column: "race_ethnicity_combined".to_string(),
            missing_values: vec![String::new()],
            bar_order: BarOrder::CountDescending,
        }
    }
}

impl DashboardConfig {
    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Resolve the config for this session: the file named by
    /// [`CONFIG_ENV_VAR`], else [`DEFAULT_CONFIG_FILE`] if it exists, else
    /// defaults. An explicitly named file that fails to load is an error.
    pub fn discover() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            let path = PathBuf::from(path);
            log::info!("Loading config from {}", path.display());
            return Self::from_file(&path);
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            log::info!("Loading config from {}", local.display());
            return Self::from_file(local);
        }
        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Normalise a raw cell: trim it, and map configured missing tokens to
    /// `None`.
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let value = raw.trim();
        if self.missing_values.iter().any(|m| m.trim() == value) {
            None
        } else {
            Some(value.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let cfg: DashboardConfig =
            serde_json::from_str(r#"{ "race_column": "race" }"#).unwrap();
        assert_eq!(cfg.race_column, "race");
        assert_eq!(cfg.age_column, "age_group");
        assert_eq!(cfg.bar_order, BarOrder::CountDescending);
    }

    #[test]
    fn test_bar_order_from_json() {
        let cfg: DashboardConfig =
            serde_json::from_str(r#"{ "bar_order": "first_seen" }"#).unwrap();
        assert_eq!(cfg.bar_order, BarOrder::FirstSeen);
    }

    #[test]
    fn test_normalize_missing_tokens() {
        let cfg = DashboardConfig {
            missing_values: vec![String::new(), "NA".into()],
            ..Default::default()
        };
        assert_eq!(cfg.normalize("  White "), Some("White".to_string()));
        assert_eq!(cfg.normalize("   "), None);
        assert_eq!(cfg.normalize("NA"), None);
        assert_eq!(cfg.normalize("Missing"), Some("Missing".to_string()));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = DashboardConfig::from_file(Path::new("/nonexistent/dashboard.json"));
        assert!(err.is_err());
    }
}
