//! Dashboard configuration with documented defaults
//!
//! Every field has a default, so an empty TOML file (or no file at all)
//! yields a working dashboard pointed at the local bot server.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{DashboardError, Result};

/// Address of the bot server's run endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/run-bot";

/// Configuration for the dashboard front ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// URL the run request is POSTed to
    ///
    /// The bot server exposes exactly one endpoint. It takes no body and
    /// answers with the outcome JSON once the call has ended.
    pub endpoint: String,

    /// Where interactive mode writes its log
    ///
    /// The terminal is taken over by the panel, so logs cannot go to stderr.
    /// Headless mode ignores this and logs to stderr.
    pub log_file: PathBuf,

    /// `tracing` filter directive used when `RUST_LOG` is not set
    pub log_level: String,

    /// How long the draw loop waits for input before redrawing (milliseconds)
    ///
    /// Also bounds how late a finished run shows up on screen.
    pub tick_rate_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            log_file: PathBuf::from("cloudsave-dashboard.log"),
            log_level: "cloudsave_dashboard=info".to_string(),
            tick_rate_ms: 100,
        }
    }
}

impl DashboardConfig {
    /// Load config from a TOML file, filling missing fields with defaults
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            DashboardError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config: DashboardConfig = toml::from_str(&contents)
            .map_err(|e| DashboardError::Config(format!("Failed to parse config TOML: {}", e)))?;

        tracing::debug!(?path, endpoint = %config.endpoint, "Loaded dashboard config");
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.endpoint).map_err(|e| {
            DashboardError::Config(format!("endpoint {:?} is not a valid URL: {}", self.endpoint, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(DashboardError::Config(format!(
                "endpoint scheme must be http or https, got {:?}",
                url.scheme()
            )));
        }

        if self.tick_rate_ms == 0 {
            return Err(DashboardError::Config("tick_rate_ms must be positive".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_points_at_local_bot_server() {
        let config = DashboardConfig::default();
        assert_eq!(config.endpoint, "http://localhost:8000/run-bot");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "endpoint = \"http://10.0.0.5:9000/run-bot\"").unwrap();

        let config = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(config.endpoint, "http://10.0.0.5:9000/run-bot");
        assert_eq!(config.tick_rate_ms, 100);
        assert_eq!(config.log_file, PathBuf::from("cloudsave-dashboard.log"));
    }

    #[test]
    fn test_load_empty_file_is_default() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = DashboardConfig::load(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(DashboardError::Config(_))));
    }

    #[test]
    fn test_load_malformed_toml_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "endpoint = ").unwrap();
        assert!(DashboardConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_endpoints() {
        let mut config = DashboardConfig::default();
        config.endpoint = "not a url".into();
        assert!(config.validate().is_err());

        config.endpoint = "ftp://localhost/run-bot".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_tick_rate() {
        let config = DashboardConfig {
            tick_rate_ms: 0,
            ..DashboardConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
