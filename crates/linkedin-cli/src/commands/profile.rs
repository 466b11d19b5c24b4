use std::sync::Arc;

use anyhow::{Context, Result};
use linkedin_profile::{HttpFetcher, LinkedInConfig, LinkedInStrategy, ProfileError};

use crate::cli::{OutputFormat, ProfileArgs};
use crate::output;

pub async fn fetch(config: LinkedInConfig, args: &ProfileArgs) -> Result<()> {
    let fetcher = Arc::new(HttpFetcher::new(&config).context("Invalid HTTP settings")?);
    let strategy = LinkedInStrategy::new(fetcher, config).context("Invalid configuration")?;

    let profile = match strategy.fetch_profile(&args.token).await {
        Ok(profile) => profile,
        Err(e) => {
            if token_rejected(&e) {
                output::print_warning("LinkedIn rejected the access token; it may have expired");
            }
            return Err(anyhow::Error::new(e).context("Failed to fetch LinkedIn profile"));
        }
    };

    match args.format {
        OutputFormat::Json => output::print_json(&profile)?,
        OutputFormat::Summary => output::print_profile_summary(&profile),
    }

    Ok(())
}

/// Returns `true` if a request was answered with 401 Unauthorized.
fn token_rejected(err: &ProfileError) -> bool {
    match err {
        ProfileError::Transport { source, .. } => source.status() == Some(401),
        ProfileError::Parse { .. } => false,
    }
}
