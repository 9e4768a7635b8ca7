//! Client configuration
//!
//! Loaded from `config.yaml` in the data directory. Every field has a default,
//! so a missing file or a partial file is fine.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::*;

/// Base URL of each external service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Identity service (`/auth`)
    pub auth: String,
    /// Vehicle registry (`/vehicle`)
    pub vehicle_registry: String,
    /// Service history (`/service`)
    pub service_history: String,
    /// Vehicle policy store (`/vehicle`)
    pub vehicle_policies: String,
    /// Vehicle policy cancellation (`/delete-car-insurance`)
    pub vehicle_cancel: String,
    /// Trip details (`/detail`)
    pub trips: String,
    /// Travel policy creation (`/travel`)
    pub travel_policies: String,
    /// Travel policy listing (`/travel-policies`)
    pub travel_list: String,
    /// Travel policy cancellation (`/cancel-insurance-api`)
    pub travel_cancel: String,
    /// Full URL of the USD exchange-rate table
    pub currency_rates: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Endpoints {
            auth: DEFAULT_AUTH_URL.to_string(),
            vehicle_registry: DEFAULT_VEHICLE_REGISTRY_URL.to_string(),
            service_history: DEFAULT_SERVICE_HISTORY_URL.to_string(),
            vehicle_policies: DEFAULT_VEHICLE_POLICY_URL.to_string(),
            vehicle_cancel: DEFAULT_VEHICLE_CANCEL_URL.to_string(),
            trips: DEFAULT_TRIP_URL.to_string(),
            travel_policies: DEFAULT_TRAVEL_POLICY_URL.to_string(),
            travel_list: DEFAULT_TRAVEL_LIST_URL.to_string(),
            travel_cancel: DEFAULT_TRAVEL_CANCEL_URL.to_string(),
            currency_rates: DEFAULT_RATES_URL.to_string(),
        }
    }
}

/// Join a base URL and a path segment without doubling slashes
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoints: Endpoints,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Delay before leaving a purchase form after success
    pub redirect_delay_secs: u64,

    /// Where exported policy documents are written (defaults to `<data_dir>/exports`)
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoints: Endpoints::default(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            redirect_delay_secs: DEFAULT_REDIRECT_DELAY_SECS,
            export_dir: None,
        }
    }
}

impl Config {
    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_secs(self.redirect_delay_secs)
    }

    pub fn export_dir(&self, data_dir: &Path) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| data_dir.join("exports"))
    }
}

/// Default data directory (`~/.safeinsure`, or `./.safeinsure` without a home)
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("nope.yaml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.redirect_delay(), Duration::from_secs(3));
    }

    #[test]
    fn test_partial_file_overrides_only_named_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "redirect_delay_secs: 0\nendpoints:\n  auth: http://localhost:9000\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.redirect_delay_secs, 0);
        assert_eq!(config.endpoints.auth, "http://localhost:9000");
        assert_eq!(config.endpoints.trips, DEFAULT_TRIP_URL);
        assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "endpoints: [1, 2").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://x/prod/", "/auth"), "http://x/prod/auth");
        assert_eq!(join_url("http://x/prod", "auth"), "http://x/prod/auth");
    }

    #[test]
    fn test_export_dir_defaults_under_data_dir() {
        let config = Config::default();
        assert_eq!(
            config.export_dir(Path::new("/tmp/si")),
            PathBuf::from("/tmp/si/exports")
        );
    }
}
