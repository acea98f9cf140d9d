//! Configuration loading and validation.
//!
//! # File layout
//!
//! ```yaml
//! common:
//!   failsafe_count: 100
//!   permit_gws_group: u_example_slack-users
//!   slack_team: example
//!   slack_token: xoxp-...
//!   slack_post_channel: "#slack-admins"
//!   gws_cert_file: /config/gws.crt
//!   gws_key_file: /config/gws.key
//!   gws_ca_file: /config/ca.pem
//! ```
//!
//! Optional keys: `gws_url`, `gws_member_type`, `slack_api_url`,
//! `slack_scim_url`.
//!
//! Validation runs in a fixed order (file, parse, required keys, values,
//! certificate files) so the first reported problem is deterministic.

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

use crate::error::{io_err, ConfigError};
use crate::types::GroupId;

/// Used when neither `--config` nor `$CONFIG_FILE` is given.
pub const DEFAULT_CONFIG_PATH: &str = "/config/user-reconcile.yaml";
pub const DEFAULT_GWS_URL: &str = "https://groups.uw.edu/group_sws/v3";
pub const DEFAULT_GWS_MEMBER_TYPE: &str = "uwnetid";
pub const DEFAULT_SLACK_SCIM_URL: &str = "https://api.slack.com/scim/v1";

const REQUIRED_OPTIONS: [&str; 8] = [
    "failsafe_count",
    "permit_gws_group",
    "slack_team",
    "slack_token",
    "slack_post_channel",
    "gws_cert_file",
    "gws_key_file",
    "gws_ca_file",
];

// ---------------------------------------------------------------------------
// Validated configuration
// ---------------------------------------------------------------------------

/// Fully validated run configuration. Passed explicitly to every client.
#[derive(Debug)]
pub struct Config {
    /// Minimum permitted-set size before any destructive action is allowed.
    pub failsafe_count: usize,
    pub permit_group: GroupId,
    pub gws: GwsConfig,
    pub slack: SlackConfig,
}

/// Directory service endpoint and client TLS material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GwsConfig {
    pub url: Url,
    /// Principal type kept from effective membership.
    pub member_type: String,
    pub tls: ClientTls,
}

/// PEM file paths for mutual TLS against the directory service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientTls {
    pub cert_file: PathBuf,
    pub key_file: PathBuf,
    pub ca_file: PathBuf,
}

/// Workspace endpoints and credentials.
#[derive(Debug)]
pub struct SlackConfig {
    pub team: String,
    /// Redacted in `Debug` output.
    pub token: SecretString,
    pub post_channel: String,
    /// Web API base (`users.list`, `chat.postMessage`).
    pub api_url: Url,
    /// SCIM base (`Users/{id}`).
    pub scim_url: Url,
}

// ---------------------------------------------------------------------------
// On-disk shape
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    common: Option<RawCommon>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCommon {
    failsafe_count: Option<RawCount>,
    permit_gws_group: Option<String>,
    slack_team: Option<String>,
    slack_token: Option<String>,
    slack_post_channel: Option<String>,
    gws_cert_file: Option<PathBuf>,
    gws_key_file: Option<PathBuf>,
    gws_ca_file: Option<PathBuf>,
    gws_url: Option<String>,
    gws_member_type: Option<String>,
    slack_api_url: Option<String>,
    slack_scim_url: Option<String>,
}

/// Accepts `100` as well as `"100"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCount {
    Int(i64),
    Text(String),
}

impl RawCommon {
    fn has(&self, option: &str) -> bool {
        match option {
            "failsafe_count" => self.failsafe_count.is_some(),
            "permit_gws_group" => self.permit_gws_group.is_some(),
            "slack_team" => self.slack_team.is_some(),
            "slack_token" => self.slack_token.is_some(),
            "slack_post_channel" => self.slack_post_channel.is_some(),
            "gws_cert_file" => self.gws_cert_file.is_some(),
            "gws_key_file" => self.gws_key_file.is_some(),
            "gws_ca_file" => self.gws_ca_file.is_some(),
            _ => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Load and validate the configuration at `path`, including the existence of
/// every certificate file it names.
pub fn load_at(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let config = parse(path, &contents)?;
    check_certificates(&config.gws.tls)?;
    Ok(config)
}

/// Parse and validate config text. Does not touch the filesystem.
fn parse(path: &Path, contents: &str) -> Result<Config, ConfigError> {
    let file: ConfigFile = if contents.trim().is_empty() {
        ConfigFile::default()
    } else {
        serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?
    };
    let raw = file.common.unwrap_or_default();

    if let Some(option) = REQUIRED_OPTIONS.into_iter().find(|o| !raw.has(o)) {
        return Err(ConfigError::MissingOption { option });
    }

    let failsafe_count = failsafe_count(raw.failsafe_count)?;
    let permit_group = GroupId(non_empty("permit_gws_group", raw.permit_gws_group)?);
    let team = slack_team(non_empty("slack_team", raw.slack_team)?)?;
    let token = SecretString::from(non_empty("slack_token", raw.slack_token)?);
    let post_channel = non_empty("slack_post_channel", raw.slack_post_channel)?;
    let tls = ClientTls {
        cert_file: non_empty_path("gws_cert_file", raw.gws_cert_file)?,
        key_file: non_empty_path("gws_key_file", raw.gws_key_file)?,
        ca_file: non_empty_path("gws_ca_file", raw.gws_ca_file)?,
    };

    let gws_url = base_url(
        "gws_url",
        raw.gws_url.as_deref().unwrap_or(DEFAULT_GWS_URL),
    )?;
    let member_type = match raw.gws_member_type {
        Some(kind) => non_empty("gws_member_type", Some(kind))?,
        None => DEFAULT_GWS_MEMBER_TYPE.to_string(),
    };
    let api_url = match raw.slack_api_url.as_deref() {
        Some(url) => base_url("slack_api_url", url)?,
        None => team_api_url(&team)?,
    };
    let scim_url = base_url(
        "slack_scim_url",
        raw.slack_scim_url.as_deref().unwrap_or(DEFAULT_SLACK_SCIM_URL),
    )?;

    Ok(Config {
        failsafe_count,
        permit_group,
        gws: GwsConfig {
            url: gws_url,
            member_type,
            tls,
        },
        slack: SlackConfig {
            team,
            token,
            post_channel,
            api_url,
            scim_url,
        },
    })
}

fn check_certificates(tls: &ClientTls) -> Result<(), ConfigError> {
    for path in [&tls.cert_file, &tls.key_file, &tls.ca_file] {
        if !path.exists() {
            return Err(ConfigError::CertificateNotFound { path: path.clone() });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Value validators
// ---------------------------------------------------------------------------

fn invalid(option: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidOption {
        option,
        reason: reason.into(),
    }
}

fn failsafe_count(raw: Option<RawCount>) -> Result<usize, ConfigError> {
    let value = match raw {
        Some(RawCount::Int(n)) => n,
        Some(RawCount::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid("failsafe_count", format!("'{s}' is not an integer")))?,
        None => return Err(ConfigError::MissingOption {
            option: "failsafe_count",
        }),
    };
    usize::try_from(value).map_err(|_| invalid("failsafe_count", "must not be negative"))
}

fn non_empty(option: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    let value = value.ok_or(ConfigError::MissingOption { option })?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid(option, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn non_empty_path(option: &'static str, value: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    let value = value.ok_or(ConfigError::MissingOption { option })?;
    if value.as_os_str().is_empty() {
        return Err(invalid(option, "must not be empty"));
    }
    Ok(value)
}

/// The team name becomes a DNS label in the default API host.
fn slack_team(team: String) -> Result<String, ConfigError> {
    let valid = team.len() <= 63
        && team.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && !team.starts_with('-')
        && !team.ends_with('-');
    if !valid {
        return Err(invalid(
            "slack_team",
            format!("'{team}' is not a valid subdomain label"),
        ));
    }
    Ok(team.to_ascii_lowercase())
}

fn base_url(option: &'static str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|e| invalid(option, e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(option, format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid(option, "URL cannot carry path segments"));
    }
    Ok(url)
}

fn team_api_url(team: &str) -> Result<Url, ConfigError> {
    let mut url = base_url("slack_api_url", "https://slack.com/api")?;
    url.set_host(Some(&format!("{team}.slack.com")))
        .map_err(|e| invalid("slack_team", e.to_string()))?;
    Ok(url)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
