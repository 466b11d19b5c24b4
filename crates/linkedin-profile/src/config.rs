//! Strategy configuration.
//!
//! # Example (TOML)
//!
//! ```toml
//! client_id = "86abc123"
//! client_secret = "s3cr3t"
//! scopes = ["r_liteprofile", "r_emailaddress"]
//! request_timeout = "10s"
//! geo_resolution = "lookup"
//!
//! [custom_headers]
//! x-li-format = "json"
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::plan::GeoResolution;
use crate::scope::{DEFAULT_API_BASE_URL, SCOPE_LITE_PROFILE};

/// Default authorization endpoint.
pub const DEFAULT_AUTHORIZATION_URL: &str = "https://www.linkedin.com/oauth/v2/authorization";

/// Default token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://www.linkedin.com/oauth/v2/accessToken";

/// Query parameter name LinkedIn expects the access token under.
pub const LINKEDIN_ACCESS_TOKEN_NAME: &str = "oauth2_access_token";

/// Configuration for the LinkedIn strategy and its HTTP fetcher.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LinkedInConfig {
    /// OAuth client id.
    pub client_id: String,

    /// OAuth client secret. Only the external token exchange needs it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    /// Requested scopes (default: `["r_liteprofile"]`).
    pub scopes: Vec<String>,

    /// Authorization endpoint used to build the redirect URL.
    pub authorization_url: String,

    /// Token endpoint, for the external OAuth client.
    pub token_url: String,

    /// Base URL of the profile API.
    pub api_base_url: String,

    /// Query parameter the access token is sent under.
    pub access_token_name: String,

    /// Headers sent with every API request.
    pub custom_headers: BTreeMap<String, String>,

    /// Per-request timeout. A timeout surfaces as a transport error.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// How the member's location is resolved.
    pub geo_resolution: GeoResolution,
}

impl Default for LinkedInConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: None,
            scopes: vec![SCOPE_LITE_PROFILE.to_string()],
            authorization_url: DEFAULT_AUTHORIZATION_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            access_token_name: LINKEDIN_ACCESS_TOKEN_NAME.to_string(),
            custom_headers: default_custom_headers(),
            request_timeout: Duration::from_secs(30),
            geo_resolution: GeoResolution::default(),
        }
    }
}

fn default_custom_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("x-li-format".to_string(), "json".to_string()),
        ("X-Restli-Protocol-Version".to_string(), "2.0.0".to_string()),
    ])
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An invalid configuration value was provided.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// A required configuration value is missing.
    #[error("Missing required configuration: {0}")]
    Missing(String),
}

impl LinkedInConfig {
    /// Creates a configuration with the given client id and defaults
    /// elsewhere.
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            ..Self::default()
        }
    }

    /// Sets the requested scopes.
    #[must_use]
    pub fn with_scopes(mut self, scopes: Vec<impl Into<String>>) -> Self {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the geo resolution mode.
    #[must_use]
    pub fn with_geo_resolution(mut self, resolution: GeoResolution) -> Self {
        self.geo_resolution = resolution;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - no scopes are configured
    /// - the access token name is empty
    /// - the request timeout is zero
    /// - an endpoint URL is not an absolute http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scopes.is_empty() {
            return Err(ConfigError::InvalidValue(
                "scopes must contain at least one scope".to_string(),
            ));
        }

        if self.access_token_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "access_token_name must not be empty".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue(
                "request_timeout must be greater than zero".to_string(),
            ));
        }

        parse_http_url("api_base_url", &self.api_base_url)?;
        parse_http_url("authorization_url", &self.authorization_url)?;
        parse_http_url("token_url", &self.token_url)?;

        Ok(())
    }

    /// Parsed API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if `api_base_url` is not an absolute http(s) URL.
    pub fn api_base(&self) -> Result<Url, ConfigError> {
        parse_http_url("api_base_url", &self.api_base_url)
    }

    /// Parsed authorization endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if `authorization_url` is not an absolute http(s) URL.
    pub fn authorization_endpoint(&self) -> Result<Url, ConfigError> {
        parse_http_url("authorization_url", &self.authorization_url)
    }
}

fn parse_http_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidValue(format!("{field}: {value} - {e}")))?;

    match url.scheme() {
        "https" | "http" => Ok(url),
        other => Err(ConfigError::InvalidValue(format!(
            "{field}: unsupported scheme {other}"
        ))),
    }
}
