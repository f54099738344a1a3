//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the token is absent there, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `VENDORLINK_TOKEN`: API bearer token (required)
//! - `VENDORLINK_BASE_URL`: API root
//! - `VENDORLINK_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `VENDORLINK_MAX_WORKERS`: Detail-fetch worker pool size
//! - `VENDORLINK_RETRY_BASE_DELAY_MS`: First backoff delay in milliseconds
//! - `VENDORLINK_RETRY_MAX_ATTEMPTS`: Total attempts per request
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./vendorlink.json` or `./vendorlink.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use vendorlink_domain::{ClientConfig, Result, VendorLinkError};

pub const ENV_TOKEN: &str = "VENDORLINK_TOKEN";
pub const ENV_BASE_URL: &str = "VENDORLINK_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "VENDORLINK_TIMEOUT_SECS";
pub const ENV_MAX_WORKERS: &str = "VENDORLINK_MAX_WORKERS";
pub const ENV_RETRY_BASE_DELAY_MS: &str = "VENDORLINK_RETRY_BASE_DELAY_MS";
pub const ENV_RETRY_MAX_ATTEMPTS: &str = "VENDORLINK_RETRY_MAX_ATTEMPTS";

const CONFIG_FILE_NAMES: &[&str] =
    &["vendorlink.json", "vendorlink.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the token is not
/// set there, falls back to loading from a config file.
///
/// # Errors
/// Returns `VendorLinkError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - A value is out of range
pub fn load() -> Result<ClientConfig> {
    if optional_env(ENV_TOKEN).is_none() {
        tracing::debug!("{} not set, trying config file", ENV_TOKEN);
        return load_from_file(None);
    }

    let config = load_from_env()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from environment variables
///
/// Only the token is required; everything else falls back to defaults.
///
/// # Errors
/// Returns `VendorLinkError::Config` if the token is missing or a numeric
/// variable does not parse.
pub fn load_from_env() -> Result<ClientConfig> {
    let mut config = ClientConfig { token: Some(env_var(ENV_TOKEN)?), ..ClientConfig::default() };

    if let Some(base_url) = optional_env(ENV_BASE_URL) {
        config.base_url = base_url;
    }
    if let Some(timeout) = env_number(ENV_TIMEOUT_SECS)? {
        config.timeout_secs = timeout;
    }
    if let Some(workers) = env_number(ENV_MAX_WORKERS)? {
        config.max_workers = workers;
    }
    if let Some(delay) = env_number(ENV_RETRY_BASE_DELAY_MS)? {
        config.retry.base_delay_ms = delay;
    }
    if let Some(attempts) = env_number(ENV_RETRY_MAX_ATTEMPTS)? {
        config.retry.max_attempts = attempts;
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Supports both JSON and
/// TOML formats (detected by file extension). A token from `VENDORLINK_TOKEN`
/// overrides the file's token.
///
/// # Errors
/// Returns `VendorLinkError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - A value is out of range
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(VendorLinkError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            VendorLinkError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| VendorLinkError::Config(format!("Failed to read config file: {}", e)))?;

    let mut config = parse_config(&contents, &config_path)?;
    if let Some(token) = optional_env(ENV_TOKEN) {
        config.token = Some(token);
    }
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `VendorLinkError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| VendorLinkError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| VendorLinkError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(VendorLinkError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe the standard paths for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf)) {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `VendorLinkError::Config` if the variable is not set or blank.
fn env_var(key: &str) -> Result<String> {
    optional_env(key).ok_or_else(|| {
        VendorLinkError::Config(format!("Missing required environment variable: {}", key))
    })
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn env_number<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    optional_env(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| VendorLinkError::Config(format!("Invalid value for {}: {}", key, e)))
        })
        .transpose()
}
