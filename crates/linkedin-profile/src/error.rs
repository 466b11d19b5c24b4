//! Error types for profile retrieval.
//!
//! Every terminal failure of a profile fetch is a [`ProfileError`]. Its
//! display text is a stable prefix naming the stage that failed; the
//! underlying transport or parse failure is kept as the error source.

use std::fmt;

/// The request stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// The mandatory primary profile request.
    Profile,
    /// The email address enrichment request.
    Email,
    /// The geo location lookup request.
    Geo,
}

impl Stage {
    /// Short name used in parse error messages (`profile`, `email`, `geo`).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Email => "email",
            Self::Geo => "geo",
        }
    }

    fn fetch_target(&self) -> &'static str {
        match self {
            Self::Profile => "user profile",
            Self::Email => "user email",
            Self::Geo => "geo location",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures reported by an [`AuthenticatedFetcher`](crate::fetcher::AuthenticatedFetcher).
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request could not be sent or the response body could not be read.
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status code.
    #[error("HTTP error: status {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The response body, kept for diagnostics.
        body: String,
    },
}

impl FetchError {
    /// Returns the HTTP status if the provider answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network(_) => None,
        }
    }
}

/// Why a response body could not be turned into profile data.
#[derive(Debug, thiserror::Error)]
pub enum ParseFailure {
    /// The body is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A field the profile cannot be built without is absent.
    #[error("missing field: {0}")]
    MissingField(String),

    /// A field is present but has the wrong shape.
    #[error("unexpected shape for field: {0}")]
    UnexpectedShape(String),
}

impl ParseFailure {
    /// Creates a `MissingField` failure.
    #[must_use]
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    /// Creates an `UnexpectedShape` failure.
    #[must_use]
    pub fn shape(field: impl Into<String>) -> Self {
        Self::UnexpectedShape(field.into())
    }
}

/// Terminal errors of a profile fetch.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// A request failed at the transport level.
    #[error("failed to fetch {}", .stage.fetch_target())]
    Transport {
        /// The stage whose request failed.
        stage: Stage,
        /// The fetcher's error.
        #[source]
        source: FetchError,
    },

    /// A response body was malformed.
    #[error("failed to parse {stage} response")]
    Parse {
        /// The stage whose response could not be parsed.
        stage: Stage,
        /// The parse failure.
        #[source]
        source: ParseFailure,
    },
}

impl ProfileError {
    /// Creates a `Transport` error.
    #[must_use]
    pub fn transport(stage: Stage, source: FetchError) -> Self {
        Self::Transport { stage, source }
    }

    /// Creates a `Parse` error.
    #[must_use]
    pub fn parse(stage: Stage, source: impl Into<ParseFailure>) -> Self {
        Self::Parse {
            stage,
            source: source.into(),
        }
    }

    /// Returns the stage this error originated from.
    #[must_use]
    pub fn stage(&self) -> Stage {
        match self {
            Self::Transport { stage, .. } | Self::Parse { stage, .. } => *stage,
        }
    }

    /// Returns `true` if the underlying HTTP call failed.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns `true` if a response could not be parsed.
    #[must_use]
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
