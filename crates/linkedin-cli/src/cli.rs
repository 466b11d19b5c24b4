use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "linkedin")]
#[command(about = "Fetch LinkedIn member profiles with an OAuth access token")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to ~/.linkedin/config.toml)
    #[arg(short, long, global = true, env = "LINKEDIN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Requested scope, repeatable (overrides the config file)
    #[arg(long = "scope", global = true)]
    pub scopes: Vec<String>,

    /// API base URL (overrides the config file)
    #[arg(long, global = true, env = "LINKEDIN_API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// Log level filter, used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Summary,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the member profile for an access token
    Profile(ProfileArgs),
    /// Print the OAuth authorization URL
    AuthorizeUrl(AuthorizeUrlArgs),
    /// Inspect CLI configuration
    Config(ConfigArgs),
}

#[derive(clap::Args)]
pub struct ProfileArgs {
    /// OAuth access token
    #[arg(short, long, env = "LINKEDIN_ACCESS_TOKEN", hide_env_values = true)]
    pub token: String,
    /// Output format
    #[arg(short, long, default_value = "json")]
    pub format: OutputFormat,
}

#[derive(clap::Args)]
pub struct AuthorizeUrlArgs {
    /// Redirect URI registered for the application
    #[arg(long)]
    pub redirect_uri: String,
    /// Opaque state echoed back on the redirect
    #[arg(long)]
    pub state: Option<String>,
    /// OAuth client ID (overrides the config file)
    #[arg(long, env = "LINKEDIN_CLIENT_ID")]
    pub client_id: Option<String>,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
}
