//! # linkedin-profile
//!
//! LinkedIn member profile retrieval for OAuth 2.0 sign-in flows.
//!
//! Given an access token, this crate fetches the member's primary profile,
//! then concurrently enriches it with the email address and the resolved
//! location when those are available, and returns one normalized
//! [`Profile`].
//!
//! ## Modules
//!
//! - [`config`] - Strategy configuration
//! - [`fetcher`] - Authenticated HTTP GET capability and its reqwest implementation
//! - [`scope`] - Scope constants, projection tiers and endpoint URLs
//! - [`profile`] - The normalized profile record
//! - [`merge`] - Response parsing and merging enrichments into a profile
//! - [`plan`] - Deciding which enrichment requests to issue
//! - [`dispatch`] - Completion tracking and exactly-once result delivery
//! - [`strategy`] - The end-to-end profile fetch
//! - [`error`] - Error types

pub mod config;
pub mod dispatch;
pub mod error;
pub mod fetcher;
pub mod merge;
pub mod plan;
pub mod profile;
pub mod scope;
pub mod strategy;

pub use config::{ConfigError, LINKEDIN_ACCESS_TOKEN_NAME, LinkedInConfig};
pub use dispatch::{CompletionState, DispatchState, Dispatcher, EnrichmentKey, Transition};
pub use error::{FetchError, ParseFailure, ProfileError, Stage};
pub use fetcher::{AuthenticatedFetcher, HttpFetcher};
pub use merge::{EmailData, Enrichment, GeoData};
pub use plan::{EnrichmentPlan, GeoResolution};
pub use profile::{Email, Photo, Profile, ProfileName};
pub use scope::{
    Endpoints, ProjectionTier, SCOPE_BASIC_PROFILE, SCOPE_EMAIL_ADDRESS, SCOPE_FULL_PROFILE,
    SCOPE_LITE_PROFILE,
};
pub use strategy::{LinkedInStrategy, authorization_params};

/// Type alias for profile fetch results.
pub type ProfileResult<T> = Result<T, ProfileError>;
