//! Configuration file management for stt-customizer.
//!
//! The config file holds service settings and named campaigns, each campaign
//! pointing at one Speech to Text instance with its own API key.

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// IBM Cloud IAM token endpoint
pub const DEFAULT_IAM_URL: &str = "https://iam.cloud.ibm.com/identity/token";

fn default_iam_url() -> String {
    DEFAULT_IAM_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

/// Settings shared by every campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Token endpoint used to exchange API keys for bearer tokens
    #[serde(default = "default_iam_url")]
    pub iam_url: String,
    /// Overall request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            iam_url: default_iam_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Credentials and endpoint for one Speech to Text instance.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CampaignConfig {
    #[serde(default)]
    pub api_key: String,
    /// Service instance URL
    #[serde(default)]
    pub url: String,
    /// Overrides `service.iam_url` for this campaign
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iam_url: Option<String>,
}

impl std::fmt::Debug for CampaignConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CampaignConfig")
            .field("api_key", &"***REDACTED***")
            .field("url", &self.url)
            .field("iam_url", &self.iam_url)
            .finish()
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomizerConfig {
    /// Campaign used when `--campaign` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_campaign: Option<String>,
    #[serde(default)]
    pub service: ServiceSettings,
    #[serde(default)]
    pub campaigns: BTreeMap<String, CampaignConfig>,
}

impl CustomizerConfig {
    /// Loads configuration from the given file.
    ///
    /// # Errors
    /// - If the file cannot be read
    /// - If the TOML is malformed
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {e}", path.display()))?;
        Self::parse(&content)
            .map_err(|e| anyhow!("Invalid config file {}: {e}", path.display()))
    }

    /// Loads configuration if the file exists, falling back to defaults.
    ///
    /// Used when credentials come from somewhere else and only service
    /// settings are needed.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    /// - If the TOML is malformed
    /// - If `service.timeout_secs` is 0
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content)?;
        if config.service.timeout_secs == 0 {
            return Err(anyhow!("service.timeout_secs must be at least 1"));
        }
        Ok(config)
    }

    /// Names of all configured campaigns, sorted.
    pub fn campaign_names(&self) -> Vec<&str> {
        self.campaigns.keys().map(String::as_str).collect()
    }
}

/// Retrieves the path to the config file.
///
/// # Errors
/// - If the home directory cannot be determined
pub fn get_config_path() -> anyhow::Result<PathBuf> {
    let config_dir = dirs::home_dir()
        .ok_or_else(|| anyhow!("Could not determine home directory"))?
        .join(".config")
        .join("stt-customizer");

    Ok(config_dir.join("stt-customizer.toml"))
}
