//! Response parsing and profile merging.
//!
//! The primary response is parsed into a fresh [`Profile`]. Enrichment
//! responses are parsed into an [`Enrichment`] first and folded in with
//! [`Profile::merge`]. Email and geo enrichments write disjoint fields, so
//! the merged profile does not depend on the order they are applied in.

use serde_json::Value;

use crate::dispatch::EnrichmentKey;
use crate::error::{ParseFailure, ProfileError, Stage};
use crate::profile::{Email, Photo, Profile, ProfileName};

const STILL_IMAGE_KEY: &str = "com.linkedin.digitalmedia.mediaartifact.StillImage";

/// Parsed email address response.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailData {
    /// Addresses found under `elements[].handle~.emailAddress`.
    pub emails: Vec<Email>,
    /// Response body.
    pub raw: String,
    /// Parsed response.
    pub json: Value,
}

/// Parsed geo location.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoData {
    /// Localized place name.
    pub name: String,
    /// Response body; `None` when the location was embedded in the primary
    /// response instead of looked up.
    pub raw: Option<String>,
    /// The geo object the name was read from.
    pub json: Value,
}

/// The result of one enrichment request.
#[derive(Debug, Clone, PartialEq)]
pub enum Enrichment {
    Email(EmailData),
    Geo(GeoData),
}

impl Enrichment {
    /// The completion key this enrichment reports under.
    #[must_use]
    pub fn key(&self) -> EnrichmentKey {
        match self {
            Self::Email(_) => EnrichmentKey::Email,
            Self::Geo(_) => EnrichmentKey::Geo,
        }
    }
}

impl Profile {
    /// Folds an enrichment into the profile.
    pub fn merge(&mut self, enrichment: Enrichment) {
        match enrichment {
            Enrichment::Email(data) => {
                self.emails = Some(data.emails);
                self.email_raw = Some(data.raw);
                self.email_json = Some(data.json);
            }
            Enrichment::Geo(data) => {
                self.geo_location = Some(data.name);
                self.geo_raw = data.raw;
                self.geo_json = Some(data.json);
            }
        }
    }
}

/// Parses the primary profile response.
///
/// # Errors
///
/// Returns a `Parse` error for the profile stage if the body is not JSON,
/// if `id` is missing, or if either name cannot be resolved in its
/// preferred locale.
pub fn parse_primary(body: &str) -> Result<Profile, ProfileError> {
    let json: Value =
        serde_json::from_str(body).map_err(|e| ProfileError::parse(Stage::Profile, e))?;

    let id = json
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| ProfileError::parse(Stage::Profile, ParseFailure::missing("id")))?
        .to_string();

    let name = ProfileName {
        given_name: localized_name(&json, "firstName")
            .map_err(|e| ProfileError::parse(Stage::Profile, e))?,
        family_name: localized_name(&json, "lastName")
            .map_err(|e| ProfileError::parse(Stage::Profile, e))?,
    };

    let photos = extract_photos(json.get("profilePicture"));

    Ok(Profile::new(id, name, photos, body, json))
}

/// Resolves a locale-tagged name record.
///
/// The record carries `preferredLocale: {language, country}` and a
/// `localized` map keyed by `language_COUNTRY`. A missing key is malformed
/// upstream data, not something to default.
fn localized_name(json: &Value, field: &str) -> Result<String, ParseFailure> {
    let record = json
        .get(field)
        .filter(|v| !v.is_null())
        .ok_or_else(|| ParseFailure::missing(field))?;

    let locale = record
        .get("preferredLocale")
        .ok_or_else(|| ParseFailure::missing(format!("{field}.preferredLocale")))?;
    let language = locale
        .get("language")
        .and_then(Value::as_str)
        .ok_or_else(|| ParseFailure::missing(format!("{field}.preferredLocale.language")))?;
    let country = locale
        .get("country")
        .and_then(Value::as_str)
        .ok_or_else(|| ParseFailure::missing(format!("{field}.preferredLocale.country")))?;

    let key = format!("{language}_{country}");
    record
        .get("localized")
        .and_then(|localized| localized.get(&key))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ParseFailure::missing(format!("{field}.localized.{key}")))
}

/// Extracts public profile pictures.
///
/// Photos are best effort: an absent picture yields an empty list, and so
/// does any structural deviation in a public media element, including a
/// missing still image display size.
#[must_use]
pub fn extract_photos(picture: Option<&Value>) -> Vec<Photo> {
    let Some(picture) = picture.filter(|p| !p.is_null()) else {
        return Vec::new();
    };

    match collect_public_photos(picture) {
        Some(photos) => photos,
        None => {
            tracing::debug!("Profile picture has an unexpected shape, ignoring photos");
            Vec::new()
        }
    }
}

fn collect_public_photos(picture: &Value) -> Option<Vec<Photo>> {
    let elements = picture.get("displayImage~")?.get("elements")?.as_array()?;

    let mut photos = Vec::new();
    for element in elements {
        if element.get("authorizationMethod").and_then(Value::as_str) != Some("PUBLIC") {
            continue;
        }

        let identifiers = element.get("identifiers")?.as_array()?;
        let Some(first) = identifiers.first() else {
            continue;
        };
        let url = first.get("identifier")?.as_str()?;

        let display_size = element
            .get("data")?
            .get(STILL_IMAGE_KEY)?
            .get("displaySize")?
            .clone();

        photos.push(Photo {
            value: url.to_string(),
            display_size,
        });
    }

    Some(photos)
}

/// Parses the email address response.
///
/// Elements without a `handle~.emailAddress` path are skipped. A response
/// without `elements` yields an empty address list.
///
/// # Errors
///
/// Returns a `Parse` error for the email stage if the body is not JSON or
/// `elements` is not an array.
pub fn parse_email(body: &str) -> Result<EmailData, ProfileError> {
    let json: Value =
        serde_json::from_str(body).map_err(|e| ProfileError::parse(Stage::Email, e))?;

    let emails = match json.get("elements") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(elements)) => elements
            .iter()
            .filter_map(|el| el.get("handle~")?.get("emailAddress")?.as_str())
            .map(|address| Email {
                value: address.to_string(),
            })
            .collect(),
        Some(_) => {
            return Err(ProfileError::parse(
                Stage::Email,
                ParseFailure::shape("elements"),
            ));
        }
    };

    Ok(EmailData {
        emails,
        raw: body.to_string(),
        json,
    })
}

/// Parses a geo lookup response.
///
/// # Errors
///
/// Returns a `Parse` error for the geo stage if the body is not JSON or has
/// no `defaultLocalizedName.value`.
pub fn parse_geo(body: &str) -> Result<GeoData, ProfileError> {
    let json: Value =
        serde_json::from_str(body).map_err(|e| ProfileError::parse(Stage::Geo, e))?;

    let name = localized_place_name(&json)
        .ok_or_else(|| {
            ProfileError::parse(
                Stage::Geo,
                ParseFailure::missing("defaultLocalizedName.value"),
            )
        })?
        .to_string();

    Ok(GeoData {
        name,
        raw: Some(body.to_string()),
        json,
    })
}

/// Reads a location embedded in the primary response as
/// `geoLocation["geo~"]`, the shape returned when the projection decorates
/// the geo reference.
#[must_use]
pub fn embedded_geo(primary: &Value) -> Option<GeoData> {
    let geo = primary.get("geoLocation")?.get("geo~")?;
    let name = localized_place_name(geo)?.to_string();

    Some(GeoData {
        name,
        raw: None,
        json: geo.clone(),
    })
}

fn localized_place_name(geo: &Value) -> Option<&str> {
    geo.get("defaultLocalizedName")?.get("value")?.as_str()
}
