//! Audit configuration loading
//!
//! Loads a TOML file describing the feature service, where snapshots live,
//! how severe a run must be to be critical, and the ordered list of layers.
//! A `.env` file and the `GEOAUDIT_WEBHOOK_URL` variable may supply the
//! webhook URL so it stays out of the configuration file.

use geoaudit_core::errors::{ExError, ExErrorKind};
use geoaudit_core::policy::{LayerCatalog, LayerPolicy, SummaryLabels};
use geoaudit_core::summary::SeverityThresholds;
use geoaudit_core_types::Sensitive;
use geoaudit_store::{layer_file_name, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding `webhook_url`
pub const ENV_WEBHOOK_URL: &str = "GEOAUDIT_WEBHOOK_URL";

/// Root configuration for one audit run
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// WFS endpoint, e.g. `https://host/geoserver/semob/ows`
    pub base_url: String,

    /// Directory holding one baseline file per layer
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,

    /// Report title used in the notification header
    #[serde(default = "default_title")]
    pub title: String,

    /// Incoming webhook for report delivery
    #[serde(default)]
    pub webhook_url: Option<Sensitive<String>>,

    #[serde(default)]
    pub severity: SeverityThresholds,

    #[serde(default)]
    pub labels: SummaryLabels,

    #[serde(default)]
    pub http: HttpConfig,

    /// Layers in processing order
    #[serde(default)]
    pub layers: Vec<LayerConfig>,
}

/// One configured layer
#[derive(Debug, Clone, Deserialize)]
pub struct LayerConfig {
    pub name: String,
    #[serde(flatten)]
    pub policy: LayerPolicy,
}

/// HTTP timeouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub fetch_timeout_secs: u64,
    pub notify_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 120,
            notify_timeout_secs: 30,
        }
    }
}

impl HttpConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn notify_timeout(&self) -> Duration {
        Duration::from_secs(self.notify_timeout_secs)
    }
}

fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("geoserver_snapshots")
}

fn default_title() -> String {
    "GeoServer Audit".to_string()
}

fn config_error(message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::InvalidConfig)
        .with_op("load_config")
        .with_message(message)
}

impl AuditConfig {
    /// Load configuration for a run.
    ///
    /// Reads `.env` if present, parses `path`, then applies
    /// [`ENV_WEBHOOK_URL`].
    ///
    /// # Errors
    ///
    /// Same as [`AuditConfig::load_from_path`].
    pub fn load(path: &Path) -> Result<Self> {
        if let Ok(env_path) = dotenvy::dotenv() {
            tracing::debug!(path = %env_path.display(), "loaded .env");
        }
        let config = Self::load_from_path(path)?;
        Ok(config.with_webhook_override(std::env::var(ENV_WEBHOOK_URL).ok()))
    }

    /// Load configuration from a specific path, without environment overrides
    ///
    /// # Errors
    ///
    /// `ERR_IO` when the file cannot be read, otherwise as [`AuditConfig::parse`].
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("load_config")
                .with_message(format!("failed to read config at {}: {}", path.display(), e))
        })?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// `ERR_INVALID_CONFIG` for malformed TOML, a non-http(s) `base_url`, zero
    /// timeouts or severity thresholds, an invalid layer catalog, or two
    /// persisted layers sharing one snapshot file.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: AuditConfig = toml::from_str(contents)
            .map_err(|e| config_error(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the webhook URL when `url` is a non-blank value
    pub fn with_webhook_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.webhook_url = Some(Sensitive::new(url));
        }
        self
    }

    /// The validated, ordered layer catalog
    ///
    /// # Errors
    ///
    /// `ERR_INVALID_CONFIG` for an empty catalog, a blank or duplicate name.
    pub fn catalog(&self) -> Result<LayerCatalog> {
        LayerCatalog::new(
            self.layers
                .iter()
                .map(|l| (l.name.clone(), l.policy.clone())),
        )
        .map_err(ExError::from)
    }

    fn validate(&self) -> Result<()> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(config_error("base_url cannot be empty"));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(config_error(format!(
                "base_url must be an http(s) URL, got '{}'",
                base
            )));
        }
        if self.http.fetch_timeout_secs == 0 || self.http.notify_timeout_secs == 0 {
            return Err(config_error("http timeouts must be positive"));
        }
        let thresholds = &self.severity;
        if thresholds.schedule_churn == 0
            || thresholds.fleet_churn == 0
            || thresholds.spatial_changes == 0
        {
            return Err(config_error("severity thresholds must be positive"));
        }
        self.catalog()?;
        self.check_snapshot_files()
    }

    /// Two persisted layers must not map to the same snapshot file.
    fn check_snapshot_files(&self) -> Result<()> {
        let mut owners: HashMap<String, &str> = HashMap::new();
        for layer in self.layers.iter().filter(|l| !l.policy.skip) {
            let file = layer_file_name(&layer.name);
            if let Some(other) = owners.insert(file.clone(), &layer.name) {
                return Err(config_error(format!(
                    "layers '{}' and '{}' would share snapshot file {}",
                    other, layer.name, file
                ))
                .with_layer(layer.name.clone()));
            }
        }
        Ok(())
    }
}
