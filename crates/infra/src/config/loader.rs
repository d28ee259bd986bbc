//! Configuration loader
//!
//! Loads [`ClientConfig`] from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If neither `STITCH_APP_ID` nor `STITCH_BASE_URL` is set, falls back to
//!    loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `STITCH_BASE_URL`: Server root
//! - `STITCH_APP_ID`: Client app id (unset targets the admin API)
//! - `STITCH_APP_VERSION`: Reported in device info
//! - `STITCH_TIMEOUT_SECS`: Request timeout in seconds
//! - `STITCH_EXPIRY_MARGIN_SECS`: Proactive refresh window in seconds
//! - `STITCH_STORAGE_NAMESPACE`: Token store key prefix
//!
//! ## File Locations
//! The loader probes `stitch.toml` then `stitch.json` in the current working
//! directory, its parents, and the executable's directory.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use stitch_domain::{ClientConfig, Result, StitchError};

const CONFIG_FILE_NAMES: &[&str] = &["stitch.toml", "stitch.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `StitchError::Config` if configuration cannot be loaded from
/// either source or a value is malformed.
pub fn load() -> Result<ClientConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from `STITCH_*` environment variables.
///
/// # Errors
/// Returns `StitchError::Config` when neither `STITCH_APP_ID` nor
/// `STITCH_BASE_URL` is set, or a numeric value does not parse.
pub fn load_from_env() -> Result<ClientConfig> {
    from_lookup(|key| std::env::var(key).ok())
}

/// Build a config from any variable source.
pub fn from_lookup<F>(lookup: F) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

    let app_id = var("STITCH_APP_ID");
    let base_url = var("STITCH_BASE_URL");
    if app_id.is_none() && base_url.is_none() {
        return Err(StitchError::Config(
            "Missing required environment variable: STITCH_APP_ID or STITCH_BASE_URL".into(),
        ));
    }

    let mut config = ClientConfig { app_id, ..ClientConfig::default() };
    if let Some(base_url) = base_url {
        config.base_url = base_url;
    }
    if let Some(version) = var("STITCH_APP_VERSION") {
        config.app_version = version;
    }
    if let Some(timeout) = var("STITCH_TIMEOUT_SECS") {
        config.timeout_secs = parse_number("STITCH_TIMEOUT_SECS", &timeout)?;
    }
    if let Some(margin) = var("STITCH_EXPIRY_MARGIN_SECS") {
        config.expiry_margin_secs = parse_number("STITCH_EXPIRY_MARGIN_SECS", &margin)?;
    }
    if let Some(namespace) = var("STITCH_STORAGE_NAMESPACE") {
        config.storage_namespace = namespace;
    }
    Ok(config)
}

fn parse_number<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| StitchError::Config(format!("Invalid {key}: {e}")))
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `StitchError::Config` if the file is missing, unreadable or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(StitchError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            StitchError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| StitchError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration text, picking the format from the file extension.
fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| StitchError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| StitchError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(StitchError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file in the standard locations, if any.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend(cwd.ancestors().map(Path::to_path_buf));
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}
