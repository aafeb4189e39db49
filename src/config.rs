//! Runtime settings and saved filter presets.
//!
//! Settings come from the environment (after `.env` is loaded by the binary);
//! command-line flags override them. A preset is a plain JSON object in the
//! loose criteria form:
//! ```json
//! { "highway": "IH0040 L", "begin_rm": [510, 512], "displacement1": [0.5, "all"] }
//! ```

use anyhow::{Context, Result};
use std::time::Duration;

use crate::criteria::FilterCriteria;

pub const DEFAULT_HIGHWAY: &str = "IH0040 L";
pub const DEFAULT_LOG_FILE: &str = "logs/pmis_explorer.log";
pub const DEFAULT_FETCH_TIMEOUT: Duration = crate::fetch::DEFAULT_TIMEOUT;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Path or URL of the PMIS table (`PMIS_DATA_SOURCE`).
    pub data_source: Option<String>,
    /// Highway preselected when a query names none (`PMIS_DEFAULT_HIGHWAY`).
    pub default_highway: String,
    /// Bearer token for remote sources (`PMIS_API_TOKEN`).
    pub api_token: Option<String>,
    pub log_file_path: String,
    /// Timeout for remote downloads (`PMIS_FETCH_TIMEOUT_SECS`).
    pub fetch_timeout: Duration,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            data_source: get("PMIS_DATA_SOURCE"),
            default_highway: get("PMIS_DEFAULT_HIGHWAY")
                .unwrap_or_else(|| DEFAULT_HIGHWAY.to_string()),
            api_token: get("PMIS_API_TOKEN"),
            log_file_path: get("LOG_FILE_PATH").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
            fetch_timeout: get("PMIS_FETCH_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map_or(DEFAULT_FETCH_TIMEOUT, Duration::from_secs),
        }
    }
}

/// Loads a criteria preset from a JSON file at `path`.
pub fn load_criteria(path: &str) -> Result<FilterCriteria> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read criteria preset '{path}'"))?;
    FilterCriteria::from_json_str(&content)
        .with_context(|| format!("invalid criteria preset '{path}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::{env, fs};

    #[test]
    fn test_defaults_when_unset() {
        let settings = Settings::from_lookup(|_| None);
        assert_eq!(settings.data_source, None);
        assert_eq!(settings.default_highway, DEFAULT_HIGHWAY);
        assert_eq!(settings.log_file_path, DEFAULT_LOG_FILE);
        assert_eq!(settings.fetch_timeout, DEFAULT_FETCH_TIMEOUT);
    }

    #[test]
    fn test_values_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("PMIS_DATA_SOURCE", "https://example.org/pmis.csv"),
            ("PMIS_DEFAULT_HIGHWAY", "US0081 L"),
            ("PMIS_API_TOKEN", "  "),
            ("PMIS_FETCH_TIMEOUT_SECS", "30"),
        ]
        .into_iter()
        .collect();
        let settings = Settings::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(
            settings.data_source.as_deref(),
            Some("https://example.org/pmis.csv")
        );
        assert_eq!(settings.default_highway, "US0081 L");
        assert_eq!(settings.api_token, None);
        assert_eq!(settings.fetch_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_load_criteria_preset() {
        let path = format!("{}/pmis_explorer_test_preset.json", env::temp_dir().display());
        fs::write(&path, r#"{ "highway": "IH0040 L", "displacement2": [0.7, "all"] }"#).unwrap();

        let criteria = load_criteria(&path).unwrap();
        assert_eq!(criteria.highways, Some(vec!["IH0040 L".to_string()]));
        assert_eq!(criteria.max_length_bound(), Some(0.7));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_criteria_missing_file() {
        let err = load_criteria("/nonexistent/preset.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/preset.json"));
    }
}
