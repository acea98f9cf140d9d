//! `user-reconcile check-config`: validate without touching the network.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use super::load_config;

pub fn run(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;

    println!("{} {}", "✓".green(), config_path.display());
    println!("  permit group      {}", config.permit_group);
    println!("  failsafe count    {}", config.failsafe_count);
    println!("  directory         {}", config.gws.url);
    println!("  member type       {}", config.gws.member_type);
    println!("  client cert       {}", config.gws.tls.cert_file.display());
    println!("  client key        {}", config.gws.tls.key_file.display());
    println!("  ca bundle         {}", config.gws.tls.ca_file.display());
    println!("  team              {}", config.slack.team);
    println!("  web api           {}", config.slack.api_url);
    println!("  scim              {}", config.slack.scim_url);
    println!("  post channel      {}", config.slack.post_channel);
    println!("  token             [redacted]");
    Ok(())
}
