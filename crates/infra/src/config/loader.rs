//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the required variables are missing, falls back to a config file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `SMARTCON_DB_PATH`: SQLite database file path (required)
//! - `SMARTCON_DB_POOL_SIZE`: Connection pool size (required)
//! - `SMARTCON_BIND_ADDR`: HTTP listen address
//! - `SMARTCON_INVOICE_API_URL`: Tax-invoice API base URL
//! - `SMARTCON_INVOICE_API_KEY`: Tax-invoice API key
//! - `SMARTCON_EXPORT_DIR`: Spreadsheet output directory
//! - `SMARTCON_RECONCILE_INTERVAL_SECS`: Background integrity reconcile period
//! - `SMARTCON_CONSTRUCTION_COMPANY`: Builder that 시공팀 workers belong to
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./smartcon.json` or `./smartcon.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};

use smartcon_domain::{Config, DatabaseConfig, Result, SmartconError};

const FILE_STEMS: [&str; 2] = ["config", "smartcon"];
const EXTENSIONS: [&str; 2] = ["json", "toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `SmartconError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// The database path and pool size must be present; every other section
/// starts from its default and is overridden by whichever variables are set.
///
/// # Errors
/// Returns `SmartconError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let path = env_var("SMARTCON_DB_PATH")?;
    let pool_size = env_var("SMARTCON_DB_POOL_SIZE").and_then(|s| parse_number(&s, "pool size"))?;

    let mut config = Config { database: DatabaseConfig { path, pool_size }, ..Config::default() };
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Apply the optional variables on top of an existing configuration.
///
/// Files loaded from disk go through this too, so a deployment can keep the
/// API key out of the config file.
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Some(addr) = env_opt("SMARTCON_BIND_ADDR") {
        config.server.bind_addr = addr;
    }
    if let Some(url) = env_opt("SMARTCON_INVOICE_API_URL") {
        config.invoice_api.base_url = Some(url);
    }
    if let Some(key) = env_opt("SMARTCON_INVOICE_API_KEY") {
        config.invoice_api.api_key = Some(key);
    }
    if let Some(dir) = env_opt("SMARTCON_EXPORT_DIR") {
        config.export.output_dir = dir;
    }
    if let Some(secs) = env_opt("SMARTCON_RECONCILE_INTERVAL_SECS") {
        let secs: u64 = parse_number(&secs, "reconcile interval")?;
        config.integrity.auto_reconcile_interval_secs = (secs > 0).then_some(secs);
    }
    if let Some(name) = env_opt("SMARTCON_CONSTRUCTION_COMPANY") {
        config.registration.construction_company_name = name;
    }
    Ok(())
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `SmartconError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SmartconError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            SmartconError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SmartconError::Config(format!("Failed to read config file: {e}")))?;

    let mut config = parse_config(&contents, &config_path)?;
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Parse configuration from string content, format chosen by extension.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SmartconError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SmartconError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(SmartconError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the working directory, its parents and the executable directory.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for stem in FILE_STEMS {
        for ext in EXTENSIONS {
            paths.push(dir.join(format!("{stem}.{ext}")));
        }
    }
    for parent in ["..", "../.."] {
        for ext in EXTENSIONS {
            paths.push(dir.join(parent).join(format!("config.{ext}")));
        }
    }
    paths
}

/// Get required environment variable
///
/// # Errors
/// Returns `SmartconError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        SmartconError::Config(format!("Missing required environment variable: {key}"))
    })
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_number<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| SmartconError::Config(format!("Invalid {what}: {e}")))
}
