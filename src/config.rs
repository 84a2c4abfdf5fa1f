//! App-level config: {user_config_dir}/google-email/config.toml.
//!
//! Every key is optional; a missing file means defaults throughout.

use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::apply::CommitGate;
use crate::resolve;

pub const DEFAULT_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1/users/me";
pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data_dir: Option<String>,
    #[serde(default)]
    pub gmail: GmailConfig,
    #[serde(default)]
    pub apply: ApplyConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GmailConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}
fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}
fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}
fn default_page_size() -> u32 {
    50
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for GmailConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            auth_uri: default_auth_uri(),
            token_uri: default_token_uri(),
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplyConfig {
    #[serde(default)]
    pub commit_gate: CommitGate,
}

/// Return the OS-native config directory for google-email.
pub fn config_dir() -> PathBuf {
    if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "google-email") {
        proj_dirs.config_dir().to_path_buf()
    } else {
        resolve::home_dir().join(".config").join("google-email")
    }
}

/// Return the path to config.toml. GOOGLE_EMAIL_CONFIG overrides it.
pub fn config_path() -> PathBuf {
    match std::env::var("GOOGLE_EMAIL_CONFIG") {
        Ok(path) if !path.is_empty() => resolve::expand_tilde(&path),
        _ => config_dir().join("config.toml"),
    }
}

/// Read config.toml, returning defaults if it is missing.
pub fn load() -> Result<Config> {
    load_from(&config_path())
}

pub fn load_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}
