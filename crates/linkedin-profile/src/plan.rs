//! Enrichment planning.
//!
//! Decides, from an already parsed primary profile and the requested scopes,
//! which enrichment requests to issue. Planning performs no I/O.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dispatch::EnrichmentKey;
use crate::profile::Profile;
use crate::scope::{Endpoints, wants_email};

/// Number of colon delimited segments in a geo URN (`urn:li:geo:<id>`).
pub const GEO_URN_SEGMENTS: usize = 4;

/// How a member's location is resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoResolution {
    /// Look up the region referenced by `geoLocation.geo` with a separate
    /// request to `/v2/geo/<id>`.
    #[default]
    Lookup,
    /// Read the decorated `geoLocation["geo~"]` object from the primary
    /// response. Kept for deployments whose projection still decorates the
    /// geo reference; no extra request is made.
    Embedded,
}

/// Enrichment requests to issue for one profile fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentPlan {
    email_url: Option<String>,
    geo_url: Option<String>,
}

impl EnrichmentPlan {
    /// Builds the plan for a parsed primary profile.
    ///
    /// Email is planned iff the scopes include the email entitlement. Geo is
    /// planned iff resolution is [`GeoResolution::Lookup`] and the primary
    /// response carries a well formed region reference; anything else skips
    /// geo silently.
    #[must_use]
    pub fn build<S: AsRef<str>>(
        profile: &Profile,
        scopes: &[S],
        endpoints: &Endpoints,
        resolution: GeoResolution,
    ) -> Self {
        let email_url = wants_email(scopes).then(|| endpoints.email_url());

        let geo_url = match resolution {
            GeoResolution::Lookup => region_id(&profile.json).map(|id| endpoints.geo_url(id)),
            GeoResolution::Embedded => None,
        };

        Self { email_url, geo_url }
    }

    /// The email request URL, if planned.
    #[must_use]
    pub fn email_url(&self) -> Option<&str> {
        self.email_url.as_deref()
    }

    /// The geo lookup URL, if planned.
    #[must_use]
    pub fn geo_url(&self) -> Option<&str> {
        self.geo_url.as_deref()
    }

    /// Planned requests with their completion keys.
    pub fn requests(&self) -> impl Iterator<Item = (EnrichmentKey, &str)> {
        let geo = self.geo_url().map(|url| (EnrichmentKey::Geo, url));
        let email = self.email_url().map(|url| (EnrichmentKey::Email, url));
        geo.into_iter().chain(email)
    }

    /// Completion keys of the planned requests.
    pub fn keys(&self) -> impl Iterator<Item = EnrichmentKey> + '_ {
        self.requests().map(|(key, _)| key)
    }

    /// Returns `true` if nothing needs to be fetched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.email_url.is_none() && self.geo_url.is_none()
    }
}

/// Extracts the region id from `geoLocation.geo`.
///
/// Returns `None` when the field is absent, not a string, does not have
/// [`GEO_URN_SEGMENTS`] segments, or has an empty id segment.
#[must_use]
pub fn region_id(primary: &Value) -> Option<&str> {
    let Some(urn) = primary
        .get("geoLocation")
        .and_then(|g| g.get("geo"))
        .and_then(Value::as_str)
    else {
        tracing::debug!("No geo reference in profile, skipping geo lookup");
        return None;
    };

    let segments: Vec<&str> = urn.split(':').collect();
    if segments.len() != GEO_URN_SEGMENTS || segments[GEO_URN_SEGMENTS - 1].is_empty() {
        tracing::debug!(urn, "Malformed geo reference, skipping geo lookup");
        return None;
    }

    Some(segments[GEO_URN_SEGMENTS - 1])
}
