//! Authenticated HTTP fetching.
//!
//! The profile flow only needs a GET carrying the access token under a
//! provider specific query parameter. [`AuthenticatedFetcher`] is that
//! capability; [`HttpFetcher`] implements it with reqwest.

use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::config::{ConfigError, LinkedInConfig};
use crate::error::FetchError;

/// Default query parameter carrying the access token.
pub const DEFAULT_ACCESS_TOKEN_NAME: &str = "access_token";

/// GET with an access token.
///
/// Implementations must allow concurrent calls to [`get`](Self::get).
#[async_trait]
pub trait AuthenticatedFetcher: Send + Sync {
    /// Sets the query parameter name the access token is sent under.
    fn set_access_token_name(&self, name: &str);

    /// Fetches `url` and returns the response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or the response
    /// status is not a success.
    async fn get(&self, url: &str, access_token: &str) -> Result<String, FetchError>;
}

/// reqwest backed fetcher.
///
/// Sends the configured custom headers with every request and appends
/// `<token name>=<token>` to the query string.
pub struct HttpFetcher {
    http_client: reqwest::Client,
    access_token_name: ArcSwap<String>,
}

impl HttpFetcher {
    /// Creates a fetcher from the request timeout and custom headers in
    /// `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if a custom header is not a valid HTTP header or the
    /// HTTP client cannot be built.
    pub fn new(config: &LinkedInConfig) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.custom_headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                ConfigError::InvalidValue(format!("custom_headers: invalid header name {name:?}"))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|_| {
                ConfigError::InvalidValue(format!("custom_headers: invalid value for {name}"))
            })?;
            headers.insert(header_name, header_value);
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::InvalidValue(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            access_token_name: ArcSwap::from_pointee(DEFAULT_ACCESS_TOKEN_NAME.to_string()),
        })
    }

    /// The query parameter name currently used for the access token.
    #[must_use]
    pub fn access_token_name(&self) -> String {
        self.access_token_name.load_full().to_string()
    }
}

#[async_trait]
impl AuthenticatedFetcher for HttpFetcher {
    fn set_access_token_name(&self, name: &str) {
        self.access_token_name.store(Arc::new(name.to_string()));
    }

    async fn get(&self, url: &str, access_token: &str) -> Result<String, FetchError> {
        let token_name = self.access_token_name.load_full();

        let response = self
            .http_client
            .get(url)
            .query(&[(token_name.as_str(), access_token)])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(url, error = %e, "Request failed");
                FetchError::Network(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "Request returned error status");
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}
