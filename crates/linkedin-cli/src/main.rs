mod cli;
mod commands;
mod config;
mod observability;
mod output;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands, ConfigCommands};
use output::print_error;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    observability::init_tracing_with_level(&cli.log_level);

    let settings = config::load(cli.config.as_deref())?;
    let settings = config::apply_overrides(settings, &cli);

    match &cli.command {
        Commands::Profile(args) => {
            commands::profile::fetch(settings, args).await?;
        }
        Commands::AuthorizeUrl(args) => {
            commands::authorize::print_url(settings, args)?;
        }
        Commands::Config(args) => match &args.command {
            ConfigCommands::Show => {
                output::print_config(&settings)?;
            }
        },
    }

    Ok(())
}
