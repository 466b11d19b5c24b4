//! LinkedIn profile strategy.
//!
//! [`LinkedInStrategy`] turns an access token into a merged [`Profile`]:
//!
//! 1. **Primary fetch** - `GET /v2/me` with the projection selected by scope.
//!    Any failure here ends the fetch; nothing is enriched.
//! 2. **Plan** - decide which of email and geo lookup to issue.
//! 3. **Fan out** - issue the planned requests concurrently.
//! 4. **Fan in** - fold each result into the profile as it arrives. The
//!    fetch settles once: when every planned request has succeeded, or on
//!    the first failure. Requests still in flight at that point are dropped
//!    and their results never observed.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use linkedin_profile::{HttpFetcher, LinkedInConfig, LinkedInStrategy};
//!
//! let config = LinkedInConfig::new("client-id")
//!     .with_scopes(vec!["r_liteprofile", "r_emailaddress"]);
//! let fetcher = Arc::new(HttpFetcher::new(&config)?);
//! let strategy = LinkedInStrategy::new(fetcher, config)?;
//!
//! let profile = strategy.fetch_profile(&access_token).await?;
//! println!("{} <{:?}>", profile.display_name, profile.primary_email());
//! ```

use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use tokio::task::JoinHandle;
use tracing::instrument;
use url::Url;

use crate::ProfileResult;
use crate::config::{ConfigError, LinkedInConfig};
use crate::dispatch::{CompletionState, Dispatcher, EnrichmentKey, Transition};
use crate::error::{ProfileError, Stage};
use crate::fetcher::AuthenticatedFetcher;
use crate::merge::{Enrichment, embedded_geo, parse_email, parse_geo, parse_primary};
use crate::plan::{EnrichmentPlan, GeoResolution};
use crate::profile::{PROVIDER, Profile};
use crate::scope::{Endpoints, ProjectionTier};

/// Extra authorization request parameters.
///
/// LinkedIn rejects authorization requests without `state`, so it is passed
/// through whenever the caller has one.
#[must_use]
pub fn authorization_params(state: Option<&str>) -> Vec<(&'static str, String)> {
    state
        .map(|s| vec![("state", s.to_string())])
        .unwrap_or_default()
}

/// Fetches and merges LinkedIn member profiles.
///
/// Every fetch sets the fetcher's access token parameter name from the
/// configuration. A fetcher must not be shared between strategies whose
/// `access_token_name` differs, since concurrent fetches would overwrite
/// each other's setting.
pub struct LinkedInStrategy<F: ?Sized> {
    fetcher: Arc<F>,
    config: LinkedInConfig,
    endpoints: Endpoints,
    authorization_endpoint: Url,
    tier: ProjectionTier,
}

impl<F: AuthenticatedFetcher + ?Sized> LinkedInStrategy<F> {
    /// Creates a strategy over `fetcher`.
    ///
    /// `fetcher` may be shared with other strategies only if they use the
    /// same `access_token_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn new(fetcher: Arc<F>, config: LinkedInConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let endpoints = Endpoints::new(&config.api_base()?);
        let authorization_endpoint = config.authorization_endpoint()?;
        let tier = ProjectionTier::from_scopes(&config.scopes);

        Ok(Self {
            fetcher,
            config,
            endpoints,
            authorization_endpoint,
            tier,
        })
    }

    /// Strategy name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        PROVIDER
    }

    /// The configuration this strategy was built with.
    #[must_use]
    pub fn config(&self) -> &LinkedInConfig {
        &self.config
    }

    /// Projection tier selected from the configured scopes.
    #[must_use]
    pub fn tier(&self) -> ProjectionTier {
        self.tier
    }

    /// Primary profile URL for the configured scopes and geo resolution.
    #[must_use]
    pub fn profile_url(&self) -> String {
        self.endpoints
            .profile_url(self.tier, self.config.geo_resolution)
    }

    /// Email address URL.
    #[must_use]
    pub fn email_url(&self) -> String {
        self.endpoints.email_url()
    }

    /// Builds the authorization redirect URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if no client id is configured.
    pub fn authorization_url(
        &self,
        redirect_uri: &str,
        state: Option<&str>,
    ) -> Result<Url, ConfigError> {
        if self.config.client_id.is_empty() {
            return Err(ConfigError::Missing("client_id".to_string()));
        }

        let mut url = self.authorization_endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", &self.config.client_id)
                .append_pair("redirect_uri", redirect_uri)
                .append_pair("scope", &self.config.scopes.join(" "));
            for (key, value) in authorization_params(state) {
                query.append_pair(key, &value);
            }
        }

        Ok(url)
    }

    /// Fetches the member profile for `access_token`.
    ///
    /// # Errors
    ///
    /// Returns the first failure among the primary request and the planned
    /// enrichment requests.
    #[instrument(skip_all, fields(provider = PROVIDER, tier = ?self.tier))]
    pub async fn fetch_profile(&self, access_token: &str) -> ProfileResult<Profile> {
        self.fetcher
            .set_access_token_name(&self.config.access_token_name);

        let body = self
            .fetcher
            .get(&self.profile_url(), access_token)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Primary profile request failed");
                ProfileError::transport(Stage::Profile, e)
            })?;

        let mut profile = parse_primary(&body)?;
        tracing::debug!(id = %profile.id, photos = profile.photos.len(), "Parsed primary profile");

        if self.config.geo_resolution == GeoResolution::Embedded
            && let Some(geo) = embedded_geo(&profile.json)
        {
            profile.merge(Enrichment::Geo(geo));
        }

        let plan = EnrichmentPlan::build(
            &profile,
            &self.config.scopes,
            &self.endpoints,
            self.config.geo_resolution,
        );

        self.enrich(profile, &plan, access_token).await
    }

    /// Issues the planned requests concurrently and folds results in as
    /// they complete.
    async fn enrich(
        &self,
        mut profile: Profile,
        plan: &EnrichmentPlan,
        access_token: &str,
    ) -> ProfileResult<Profile> {
        let mut completion = CompletionState::new(plan.keys());
        if completion.check_empty() == Transition::Complete {
            return Ok(profile);
        }

        let mut in_flight: FuturesUnordered<_> = plan
            .requests()
            .map(|(key, url)| self.fetch_enrichment(key, url, access_token))
            .collect();
        tracing::debug!(requests = in_flight.len(), "Enrichment requests issued");

        while let Some(outcome) = in_flight.next().await {
            match outcome {
                Ok(enrichment) => {
                    let key = enrichment.key();
                    profile.merge(enrichment);
                    if completion.record_success(key) == Transition::Complete {
                        tracing::debug!("All enrichment requests completed");
                        return Ok(profile);
                    }
                }
                Err((key, err)) => {
                    if completion.record_failure(key) == Transition::Failed {
                        tracing::warn!(enrichment = %key, error = %err, "Enrichment request failed");
                        return Err(err);
                    }
                }
            }
        }

        // Each planned key has exactly one request, so the stream cannot
        // drain before the state machine dispatches.
        Ok(profile)
    }

    /// Fetches and parses one enrichment. Failures carry their key so the
    /// fan-in can attribute them.
    async fn fetch_enrichment(
        &self,
        key: EnrichmentKey,
        url: &str,
        access_token: &str,
    ) -> Result<Enrichment, (EnrichmentKey, ProfileError)> {
        let body = self
            .fetcher
            .get(url, access_token)
            .await
            .map_err(|e| (key, ProfileError::transport(key.stage(), e)))?;

        let parsed = match key {
            EnrichmentKey::Email => parse_email(&body).map(Enrichment::Email),
            EnrichmentKey::Geo => parse_geo(&body).map(Enrichment::Geo),
        };
        parsed.map_err(|e| (key, e))
    }
}

impl<F: AuthenticatedFetcher + ?Sized + 'static> LinkedInStrategy<F> {
    /// Callback form of [`fetch_profile`](Self::fetch_profile).
    ///
    /// Runs the fetch on the tokio runtime and hands the result to `done`
    /// exactly once. The returned handle resolves to whether `done` ran.
    pub fn fetch_profile_with<C>(
        self: &Arc<Self>,
        access_token: impl Into<String>,
        done: C,
    ) -> JoinHandle<bool>
    where
        C: FnOnce(ProfileResult<Profile>) + Send + 'static,
    {
        let strategy = Arc::clone(self);
        let access_token = access_token.into();
        let dispatcher = Dispatcher::new(done);

        tokio::spawn(async move {
            let result = strategy.fetch_profile(&access_token).await;
            dispatcher.settle(result)
        })
    }
}
