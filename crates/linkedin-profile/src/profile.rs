//! The canonical profile record.
//!
//! Field names on the wire follow the passport-style profile shape consumers
//! already expect (`displayName`, `givenName`, `_raw`, ...).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Provider identifier carried by every profile.
pub const PROVIDER: &str = "linkedin";

/// A member's structured name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileName {
    /// First name in the member's preferred locale.
    pub given_name: String,
    /// Last name in the member's preferred locale.
    pub family_name: String,
}

/// A public profile picture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    /// Image URL.
    pub value: String,

    /// Display size reported for the image (`width`, `height`, `uom`).
    #[serde(rename = "displaysize")]
    pub display_size: Value,
}

/// An email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    /// The address.
    pub value: String,
}

/// A merged member profile.
///
/// `geo_location` and `emails` are set only when their enrichment request
/// ran and succeeded. The `raw`/`json` captures are for auditing and are
/// never consulted for control flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Always [`PROVIDER`].
    pub provider: String,

    /// Opaque member id.
    pub id: String,

    /// Structured name.
    pub name: ProfileName,

    /// `given_name + " " + family_name`.
    #[serde(rename = "displayName")]
    pub display_name: String,

    /// Public profile pictures, in provider order.
    pub photos: Vec<Photo>,

    /// Human readable place name.
    #[serde(
        rename = "geoLocation",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub geo_location: Option<String>,

    /// Email addresses, in provider order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<Email>>,

    /// Primary response body.
    #[serde(rename = "_raw")]
    pub raw: String,

    /// Parsed primary response.
    #[serde(rename = "_json")]
    pub json: Value,

    #[serde(rename = "_geoRaw", default, skip_serializing_if = "Option::is_none")]
    pub geo_raw: Option<String>,

    #[serde(rename = "_geoJson", default, skip_serializing_if = "Option::is_none")]
    pub geo_json: Option<Value>,

    #[serde(rename = "_emailRaw", default, skip_serializing_if = "Option::is_none")]
    pub email_raw: Option<String>,

    #[serde(rename = "_emailJson", default, skip_serializing_if = "Option::is_none")]
    pub email_json: Option<Value>,
}

impl Profile {
    /// Creates a profile from the primary response fields.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: ProfileName,
        photos: Vec<Photo>,
        raw: impl Into<String>,
        json: Value,
    ) -> Self {
        let display_name = format!("{} {}", name.given_name, name.family_name);
        Self {
            provider: PROVIDER.to_string(),
            id: id.into(),
            name,
            display_name,
            photos,
            geo_location: None,
            emails: None,
            raw: raw.into(),
            json,
            geo_raw: None,
            geo_json: None,
            email_raw: None,
            email_json: None,
        }
    }

    /// First email address, if the email enrichment produced any.
    #[must_use]
    pub fn primary_email(&self) -> Option<&str> {
        self.emails
            .as_deref()
            .and_then(<[Email]>::first)
            .map(|e| e.value.as_str())
    }
}
