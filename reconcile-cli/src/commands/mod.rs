//! Subcommand implementations.

pub mod check_config;
pub mod plan;
pub mod run;

use std::path::Path;

use anyhow::{Context, Result};
use reconcile_core::{config, Config};
use reconcile_sync::{DirectoryClient, WorkspaceClient};

pub(crate) fn load_config(path: &Path) -> Result<Config> {
    config::load_at(path).with_context(|| format!("failed to load config {}", path.display()))
}

pub(crate) fn clients(config: &Config) -> Result<(DirectoryClient, WorkspaceClient)> {
    let directory =
        DirectoryClient::from_config(config).context("failed to set up directory client")?;
    let workspace =
        WorkspaceClient::from_config(config).context("failed to set up workspace client")?;
    Ok((directory, workspace))
}
