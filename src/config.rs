use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_DAY_PATH: &str = "data/day.csv";
pub const DEFAULT_HOUR_PATH: &str = "data/hour.csv";
pub const DEFAULT_MAIN_DATA_PATH: &str = "dashboard/main_data.csv";

/// Locations of the input tables and the merged export.
///
/// Read from the environment (`DAY_CSV_PATH`, `HOUR_CSV_PATH`,
/// `MAIN_DATA_PATH`, usually via `.env`) or from a JSON file:
/// ```json
/// {
///   "day_path": "data/day.csv",
///   "hour_path": "data/hour.csv",
///   "main_data_path": "dashboard/main_data.csv"
/// }
/// ```
/// Keys missing from the file fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub day_path: PathBuf,
    pub hour_path: PathBuf,
    pub main_data_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            day_path: PathBuf::from(DEFAULT_DAY_PATH),
            hour_path: PathBuf::from(DEFAULT_HOUR_PATH),
            main_data_path: PathBuf::from(DEFAULT_MAIN_DATA_PATH),
        }
    }
}

impl AppConfig {
    /// Builds the config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            day_path: lookup("DAY_CSV_PATH").map_or(defaults.day_path, PathBuf::from),
            hour_path: lookup("HOUR_CSV_PATH").map_or(defaults.hour_path, PathBuf::from),
            main_data_path: lookup("MAIN_DATA_PATH").map_or(defaults.main_data_path, PathBuf::from),
        }
    }

    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("cannot read config {path}"))?;
        let config: AppConfig =
            serde_json::from_str(&content).with_context(|| format!("invalid config {path}"))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_lookup_overrides_defaults() {
        let env: HashMap<&str, &str> = [("HOUR_CSV_PATH", "/srv/bike/hour.csv")].into();
        let config = AppConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.day_path, PathBuf::from(DEFAULT_DAY_PATH));
        assert_eq!(config.hour_path, PathBuf::from("/srv/bike/hour.csv"));
    }

    #[test]
    fn test_load_partial_json() {
        let path = std::env::temp_dir().join("bikeshare_analytics_test_config.json");
        std::fs::write(&path, r#"{ "day_path": "custom/day.csv.gz" }"#).unwrap();

        let config = AppConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.day_path, PathBuf::from("custom/day.csv.gz"));
        assert_eq!(config.main_data_path, PathBuf::from(DEFAULT_MAIN_DATA_PATH));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file() {
        assert!(AppConfig::load("/nonexistent/config.json").is_err());
    }
}
