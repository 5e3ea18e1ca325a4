//! Fetch collaborator: where new feature collections come from.

use geoaudit_core::errors::{ExError, ExErrorKind};
use geoaudit_store::Result;
use serde_json::Value;
use std::time::Duration;

/// Supplies the current feature collection of a layer as raw JSON.
///
/// The document is stored verbatim as the next baseline, so implementations
/// must not reshape it.
pub trait FeatureSource: Send + Sync {
    /// Fetch the current collection for `layer`.
    ///
    /// # Errors
    ///
    /// `ExternalService` or `Timeout` when the remote service fails,
    /// `Serialization` when the body is not JSON.
    #[allow(clippy::result_large_err)]
    fn fetch(&self, layer: &str) -> Result<Value>;
}

/// WFS 2.0.0 `GetFeature` client returning GeoJSON.
pub struct WfsSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl WfsSource {
    /// # Errors
    ///
    /// `ERR_INTERNAL` when the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("geoaudit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ExError::new(ExErrorKind::Internal)
                    .with_op("build_http_client")
                    .with_message(format!("http client: {}", e))
            })?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Query parameters of a `GetFeature` request for `layer`.
    pub fn query_params(layer: &str) -> [(&'static str, &str); 5] {
        [
            ("service", "WFS"),
            ("version", "2.0.0"),
            ("request", "GetFeature"),
            ("typeNames", layer),
            ("outputFormat", "application/json"),
        ]
    }
}

fn request_error(layer: &str, err: reqwest::Error) -> ExError {
    let kind = if err.is_timeout() {
        ExErrorKind::Timeout
    } else {
        ExErrorKind::ExternalService
    };
    ExError::new(kind)
        .with_op("fetch_layer")
        .with_layer(layer)
        .with_message(format!("request failed: {}", err))
}

impl FeatureSource for WfsSource {
    fn fetch(&self, layer: &str) -> Result<Value> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&Self::query_params(layer))
            .send()
            .map_err(|e| request_error(layer, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ExError::new(ExErrorKind::ExternalService)
                .with_op("fetch_layer")
                .with_layer(layer)
                .with_message(format!("HTTP {}", status)));
        }

        resp.json::<Value>().map_err(|e| {
            if e.is_timeout() {
                request_error(layer, e)
            } else {
                ExError::new(ExErrorKind::Serialization)
                    .with_op("fetch_layer")
                    .with_layer(layer)
                    .with_message(format!("response is not JSON: {}", e))
            }
        })
    }
}
