use std::sync::Arc;

use anyhow::{Context, Result};
use linkedin_profile::{HttpFetcher, LinkedInConfig, LinkedInStrategy};

use crate::cli::AuthorizeUrlArgs;
use crate::output;

pub fn print_url(mut config: LinkedInConfig, args: &AuthorizeUrlArgs) -> Result<()> {
    if let Some(client_id) = &args.client_id {
        config.client_id = client_id.clone();
    }

    let fetcher = Arc::new(HttpFetcher::new(&config).context("Invalid HTTP settings")?);
    let strategy = LinkedInStrategy::new(fetcher, config).context("Invalid configuration")?;

    let url = strategy
        .authorization_url(&args.redirect_uri, args.state.as_deref())
        .context("Cannot build authorization URL")?;

    if args.state.is_none() {
        output::print_warning("No --state given; LinkedIn rejects authorization requests without one");
    }
    println!("{url}");

    Ok(())
}
