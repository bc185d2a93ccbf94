//! First-run setup.
//!
//! Writes the default configuration template when the config file is missing so
//! the operator has a documented file to fill in.

use anyhow::anyhow;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Embedded default configuration template.
const DEFAULT_CONFIG: &str = include_str!("../../environments/stt-customizer.toml");

/// Creates the config file from the template if it does not exist.
///
/// Returns `true` when a new file was written.
///
/// # Errors
/// Returns an error if the directory or file cannot be created.
pub fn ensure_config(config_path: &Path) -> anyhow::Result<bool> {
    if config_path.exists() {
        return Ok(false);
    }

    let config_dir = config_path
        .parent()
        .ok_or_else(|| anyhow!("Invalid config path: {}", config_path.display()))?;
    std::fs::create_dir_all(config_dir)?;

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    owner_only(&mut options);
    let mut file = options
        .open(config_path)
        .map_err(|e| anyhow!("Failed to create {}: {e}", config_path.display()))?;
    file.write_all(DEFAULT_CONFIG.as_bytes())?;

    tracing::info!("Wrote default config to {}", config_path.display());
    Ok(true)
}

/// The config file holds API keys, so it is created readable by the owner only.
#[cfg(unix)]
fn owner_only(options: &mut OpenOptions) {
    use std::os::unix::fs::OpenOptionsExt;
    options.mode(0o600);
}

#[cfg(not(unix))]
fn owner_only(_options: &mut OpenOptions) {}
