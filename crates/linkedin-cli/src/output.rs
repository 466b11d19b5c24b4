use anyhow::Result;
use colored::Colorize;
use linkedin_profile::{LinkedInConfig, Profile};
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_profile_summary(profile: &Profile) {
    println!("{}: {}", "Id".cyan(), profile.id);
    println!("{}: {}", "Name".cyan(), profile.display_name);
    println!(
        "{}: {}",
        "Email".cyan(),
        profile.primary_email().unwrap_or("(not requested)")
    );
    println!(
        "{}: {}",
        "Location".cyan(),
        profile.geo_location.as_deref().unwrap_or("(unknown)")
    );
    println!("{}: {}", "Photos".cyan(), profile.photos.len());
}

pub fn print_config(config: &LinkedInConfig) -> Result<()> {
    println!("{}", toml::to_string_pretty(&masked(config))?);
    Ok(())
}

fn masked(config: &LinkedInConfig) -> LinkedInConfig {
    let mut config = config.clone();
    if config.client_secret.is_some() {
        config.client_secret = Some("********".to_string());
    }
    config
}

pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}
