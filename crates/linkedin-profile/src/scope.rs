//! Scope handling and endpoint construction.
//!
//! The requested scopes decide which projection the primary profile request
//! asks for and whether the email address endpoint is queried at all.
//!
//! | Scopes contain      | Projection |
//! |---------------------|------------|
//! | `r_fullprofile`     | full       |
//! | `r_basicprofile`    | basic      |
//! | anything else       | lite       |

use url::Url;

use crate::plan::GeoResolution;

/// Lite profile entitlement (id, name, profile picture).
pub const SCOPE_LITE_PROFILE: &str = "r_liteprofile";

/// Basic profile entitlement.
pub const SCOPE_BASIC_PROFILE: &str = "r_basicprofile";

/// Full profile entitlement. Most of its fields require partner access.
pub const SCOPE_FULL_PROFILE: &str = "r_fullprofile";

/// Email address entitlement.
pub const SCOPE_EMAIL_ADDRESS: &str = "r_emailaddress";

/// Default API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.linkedin.com";

const LITE_PROJECTION: &str = "id,\
firstName,\
lastName,\
profilePicture(displayImage~:playableStreams)";

const BASIC_PROJECTION: &str = "id,\
firstName,\
lastName,\
maidenName,\
headline,\
profilePicture(displayImage~:playableStreams),\
vanityName";

const FULL_PROJECTION_HEAD: &str = "id,\
address,\
backgroundPicture(displayImage~digitalmediaAsset:playableStreams),\
birthDate,\
certifications,\
courses,\
educations,\
firstName";

const FULL_PROJECTION_TAIL: &str = "headline,\
honors,\
industryId,\
industryName,\
lastName,\
lastModified,\
maidenName,\
organizations,\
patents,\
phoneNumbers,\
phoneticFirstName,\
phoneticLastName,\
positions,\
profilePicture(displayImage~:playableStreams),\
projects,\
publications,\
skills,\
summary,\
testScores,\
vanityName,\
volunteeringExperiences,\
volunteeringInterests,\
websites";

/// Bare geo reference, resolved later with `/v2/geo/<id>`.
const GEO_REFERENCE_FIELD: &str = "geoLocation";

/// Geo reference decorated with the resolved region object (`geo~`).
const GEO_DECORATED_FIELD: &str = "geoLocation(geo~)";

const EMAIL_PATH: &str = "/v2/emailAddress?q=members&projection=(elements*(handle~))";

/// The set of profile fields requested from the primary endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionTier {
    /// Id, name and profile picture only.
    Lite,
    /// Lite fields plus headline, maiden name and vanity name.
    Basic,
    /// Demographic, professional history, contact and media fields.
    Full,
}

impl ProjectionTier {
    /// Selects the projection for a scope set. The first matching rule wins:
    /// full, then basic, then lite.
    #[must_use]
    pub fn from_scopes<S: AsRef<str>>(scopes: &[S]) -> Self {
        if has_scope(scopes, SCOPE_FULL_PROFILE) {
            Self::Full
        } else if has_scope(scopes, SCOPE_BASIC_PROFILE) {
            Self::Basic
        } else {
            Self::Lite
        }
    }

    /// The comma separated field list for this tier.
    ///
    /// Only the full tier carries the member's location. It asks for the
    /// bare reference under [`GeoResolution::Lookup`] and for the decorated
    /// `geo~` object under [`GeoResolution::Embedded`].
    #[must_use]
    pub fn fields(&self, geo: GeoResolution) -> String {
        match self {
            Self::Lite => LITE_PROJECTION.to_string(),
            Self::Basic => BASIC_PROJECTION.to_string(),
            Self::Full => {
                let geo_field = match geo {
                    GeoResolution::Lookup => GEO_REFERENCE_FIELD,
                    GeoResolution::Embedded => GEO_DECORATED_FIELD,
                };
                format!("{FULL_PROJECTION_HEAD},{geo_field},{FULL_PROJECTION_TAIL}")
            }
        }
    }
}

/// Returns `true` if `scope` is one of `scopes`.
#[must_use]
pub fn has_scope<S: AsRef<str>>(scopes: &[S], scope: &str) -> bool {
    scopes.iter().any(|s| s.as_ref() == scope)
}

/// Returns `true` if the email address endpoint should be queried.
#[must_use]
pub fn wants_email<S: AsRef<str>>(scopes: &[S]) -> bool {
    has_scope(scopes, SCOPE_EMAIL_ADDRESS)
}

/// Profile API endpoints rooted at one base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    /// Creates endpoints for the given API base URL.
    #[must_use]
    pub fn new(base: &Url) -> Self {
        Self {
            base: base.as_str().trim_end_matches('/').to_string(),
        }
    }

    /// Primary profile URL: `/v2/me?projection=(<fields>)`.
    #[must_use]
    pub fn profile_url(&self, tier: ProjectionTier, geo: GeoResolution) -> String {
        format!("{}/v2/me?projection=({})", self.base, tier.fields(geo))
    }

    /// Email address URL.
    #[must_use]
    pub fn email_url(&self) -> String {
        format!("{}{}", self.base, EMAIL_PATH)
    }

    /// Geo lookup URL: `/v2/geo/<region-id>`.
    #[must_use]
    pub fn geo_url(&self, region_id: &str) -> String {
        format!("{}/v2/geo/{}", self.base, region_id)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_defaults_to_lite() {
        assert_eq!(ProjectionTier::from_scopes::<&str>(&[]), ProjectionTier::Lite);
        assert_eq!(
            ProjectionTier::from_scopes(&[SCOPE_LITE_PROFILE, SCOPE_EMAIL_ADDRESS]),
            ProjectionTier::Lite
        );
    }

    #[test]
    fn test_tier_first_match_wins() {
        assert_eq!(
            ProjectionTier::from_scopes(&[SCOPE_LITE_PROFILE, SCOPE_BASIC_PROFILE]),
            ProjectionTier::Basic
        );
        assert_eq!(
            ProjectionTier::from_scopes(&[SCOPE_BASIC_PROFILE, SCOPE_FULL_PROFILE]),
            ProjectionTier::Full
        );
        assert_eq!(
            ProjectionTier::from_scopes(&["r_fullprofile".to_string()]),
            ProjectionTier::Full
        );
    }

    #[test]
    fn test_wants_email() {
        assert!(wants_email(&[SCOPE_LITE_PROFILE, SCOPE_EMAIL_ADDRESS]));
        assert!(!wants_email(&[SCOPE_LITE_PROFILE]));
    }

    #[test]
    fn test_default_urls() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.profile_url(ProjectionTier::Lite, GeoResolution::Lookup),
            "https://api.linkedin.com/v2/me?projection=(id,firstName,lastName,profilePicture(displayImage~:playableStreams))"
        );
        assert_eq!(
            endpoints.profile_url(ProjectionTier::Basic, GeoResolution::Lookup),
            "https://api.linkedin.com/v2/me?projection=(id,firstName,lastName,maidenName,headline,profilePicture(displayImage~:playableStreams),vanityName)"
        );
        assert_eq!(
            endpoints.email_url(),
            "https://api.linkedin.com/v2/emailAddress?q=members&projection=(elements*(handle~))"
        );
        assert_eq!(
            endpoints.geo_url("103644278"),
            "https://api.linkedin.com/v2/geo/103644278"
        );
    }

    #[test]
    fn test_full_projection_fields() {
        let fields = ProjectionTier::Full.fields(GeoResolution::Lookup);
        assert!(fields.starts_with("id,address,"));
        assert!(fields.contains(",firstName,geoLocation,headline,"));
        assert!(!fields.contains("geo~"));
        assert!(fields.ends_with(",websites"));
        assert_eq!(fields.matches("profilePicture").count(), 1);
    }

    #[test]
    fn test_full_projection_decorates_geo_when_embedded() {
        let fields = ProjectionTier::Full.fields(GeoResolution::Embedded);
        assert!(fields.contains(",firstName,geoLocation(geo~),headline,"));
        assert_eq!(fields.matches("geoLocation").count(), 1);

        let url = Endpoints::default().profile_url(ProjectionTier::Full, GeoResolution::Embedded);
        assert!(url.contains("geoLocation(geo~)"));
    }

    #[test]
    fn test_lite_and_basic_ignore_geo_resolution() {
        for tier in [ProjectionTier::Lite, ProjectionTier::Basic] {
            assert_eq!(
                tier.fields(GeoResolution::Lookup),
                tier.fields(GeoResolution::Embedded)
            );
            assert!(!tier.fields(GeoResolution::Embedded).contains("geoLocation"));
        }
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let base = Url::parse("http://127.0.0.1:8080/").unwrap();
        let endpoints = Endpoints::new(&base);
        assert_eq!(endpoints.geo_url("1"), "http://127.0.0.1:8080/v2/geo/1");
    }
}
