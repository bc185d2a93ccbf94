//! Credential providers.
//!
//! A provider turns one external source into the API key and service URL of a
//! Speech to Text instance. The source is chosen once at startup; credentials
//! are never compiled into the binary.

use anyhow::anyhow;
use std::collections::HashMap;
use std::path::PathBuf;

use super::file::CustomizerConfig;

/// API key and endpoint for one service instance.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub service_url: String,
    /// Token endpoint override; `service.iam_url` applies when absent
    pub iam_url: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"***REDACTED***")
            .field("service_url", &self.service_url)
            .field("iam_url", &self.iam_url)
            .finish()
    }
}

/// Source of service credentials.
pub trait CredentialsProvider {
    /// Reads credentials from the underlying source.
    fn load(&self) -> anyhow::Result<Credentials>;

    /// Short description of the source for logs.
    fn describe(&self) -> String;
}

/// Reads `API_KEY`, `API_URL` and optionally `IAM_URL` from a dotenv file.
///
/// The process environment is left untouched.
#[derive(Debug, Clone)]
pub struct EnvFileCredentials {
    path: PathBuf,
}

impl EnvFileCredentials {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialsProvider for EnvFileCredentials {
    fn load(&self) -> anyhow::Result<Credentials> {
        let entries = dotenv::from_path_iter(&self.path)
            .map_err(|e| anyhow!("Failed to read env file {}: {e}", self.path.display()))?;

        let mut vars = HashMap::new();
        for entry in entries {
            let (key, value) = entry
                .map_err(|e| anyhow!("Failed to parse env file {}: {e}", self.path.display()))?;
            vars.insert(key, value);
        }

        let required = |key: &str| -> anyhow::Result<String> {
            vars.get(key)
                .filter(|value| !value.is_empty())
                .cloned()
                .ok_or_else(|| anyhow!("{key} is not set in {}", self.path.display()))
        };

        Ok(Credentials {
            api_key: required("API_KEY")?,
            service_url: required("API_URL")?,
            iam_url: vars.get("IAM_URL").filter(|value| !value.is_empty()).cloned(),
        })
    }

    fn describe(&self) -> String {
        format!("env file {}", self.path.display())
    }
}

/// Reads a named campaign from the config file.
#[derive(Debug, Clone)]
pub struct ConfigFileCredentials {
    config: CustomizerConfig,
    campaign: Option<String>,
}

impl ConfigFileCredentials {
    /// Uses `campaign`, or the config's `default_campaign` when `None`.
    pub fn new(config: CustomizerConfig, campaign: Option<String>) -> Self {
        Self { config, campaign }
    }

    fn campaign_name(&self) -> anyhow::Result<&str> {
        self.campaign
            .as_deref()
            .or(self.config.default_campaign.as_deref())
            .ok_or_else(|| {
                anyhow!("No campaign selected. Pass --campaign or set default_campaign in the config file")
            })
    }
}

impl CredentialsProvider for ConfigFileCredentials {
    fn load(&self) -> anyhow::Result<Credentials> {
        let name = self.campaign_name()?;
        let campaign = self.config.campaigns.get(name).ok_or_else(|| {
            let known = self.config.campaign_names();
            if known.is_empty() {
                anyhow!("Campaign '{name}' not found. No campaigns are configured")
            } else {
                anyhow!(
                    "Campaign '{name}' not found. Known campaigns: {}",
                    known.join(", ")
                )
            }
        })?;

        if campaign.api_key.is_empty() {
            return Err(anyhow!("Campaign '{name}' has an empty api_key"));
        }
        if campaign.url.is_empty() {
            return Err(anyhow!("Campaign '{name}' has an empty url"));
        }

        Ok(Credentials {
            api_key: campaign.api_key.clone(),
            service_url: campaign.url.clone(),
            iam_url: campaign.iam_url.clone(),
        })
    }

    fn describe(&self) -> String {
        match self.campaign_name() {
            Ok(name) => format!("campaign '{name}'"),
            Err(_) => "config file".to_string(),
        }
    }
}
