//! Client configuration: auth token, team scope, and API endpoint.
//!
//! Precedence is flag > environment > auth file. The auth file lives
//! at `~/.config/nimbus/auth.toml` unless `--config` points elsewhere.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Default control-plane endpoint.
pub const DEFAULT_API_URL: &str = "https://api.nimbus.sh";

/// Contents of `auth.toml`. Every field is optional; flags and
/// environment variables fill the gaps.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthFile {
    pub token: Option<String>,
    pub team: Option<String>,
    pub api: Option<String>,
}

impl AuthFile {
    /// Parse an auth file from disk.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Default location: `~/.config/nimbus/auth.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("nimbus").join("auth.toml"))
    }
}

/// Fully resolved client settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub token: Option<String>,
    pub team: Option<String>,
    pub api_url: String,
}

impl ClientConfig {
    /// Resolve settings from flags, environment, and the auth file.
    ///
    /// An explicit `--config` path must exist; the default path is
    /// skipped silently when absent.
    pub fn resolve(
        config_path: Option<&Path>,
        token_flag: Option<String>,
        team_flag: Option<String>,
        api_flag: Option<String>,
    ) -> anyhow::Result<Self> {
        let file = match config_path {
            Some(path) => AuthFile::from_file(path)?,
            None => match AuthFile::default_path() {
                Some(path) if path.exists() => AuthFile::from_file(&path)?,
                _ => AuthFile::default(),
            },
        };

        let token = token_flag
            .or_else(|| env_non_empty("NIMBUS_TOKEN"))
            .or(file.token);
        let team = team_flag.or(file.team);
        let api_url = api_flag
            .or_else(|| env_non_empty("NIMBUS_API"))
            .or(file.api)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            token,
            team,
            api_url,
        })
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
