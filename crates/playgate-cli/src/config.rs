use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Gateway used when neither `PLAYGATE_URL` nor the config file names one.
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:8080";

/// Persisted CLI configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct CliConfig {
    /// Base URL of the playgate API.
    pub gateway_url: String,
    /// Account created by the last successful `register`.
    #[serde(default)]
    pub account_id: Option<Uuid>,
    /// Email address of that account.
    #[serde(default)]
    pub email: Option<String>,
}

/// Return the default path for the CLI config file (`~/.playgate/config.toml`).
#[must_use]
pub fn default_config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_owned());
    PathBuf::from(home).join(".playgate").join("config.toml")
}

/// Write `cfg` to `path`, creating parent directories if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot be written.
pub fn save_config(cfg: &CliConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string(cfg)?)?;
    Ok(())
}

/// Load and deserialize a [`CliConfig`] from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or deserialized.
pub fn load_config(path: &Path) -> Result<CliConfig> {
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

/// Pick the gateway URL: `PLAYGATE_URL` first, then the saved config, then
/// [`DEFAULT_GATEWAY_URL`]. Trailing slashes are dropped.
#[must_use]
pub fn resolve_gateway_url(env: Option<String>, saved: Option<&CliConfig>) -> String {
    let url = env
        .filter(|u| !u.trim().is_empty())
        .or_else(|| saved.map(|c| c.gateway_url.clone()))
        .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_owned());
    url.trim().trim_end_matches('/').to_owned()
}
