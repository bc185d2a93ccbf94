//! Configuration management for stt-customizer.
//!
//! This module handles loading the TOML config file (service settings and named
//! campaigns) and the credential providers that feed the API client. Credentials
//! come either from a dotenv-style environment file or from a campaign in the
//! config file.

pub mod credentials;
pub mod file;

pub use credentials::{ConfigFileCredentials, Credentials, CredentialsProvider, EnvFileCredentials};
pub use file::{get_config_path, CustomizerConfig, ServiceSettings};
