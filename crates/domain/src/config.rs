//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CONSTRUCTION_COMPANY_NAME, DEFAULT_INTEGRITY_BATCH_SIZE, DEFAULT_INVOICE_TIMEOUT_SECS,
};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub invoice_api: InvoiceApiConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub integrity: IntegrityConfig,
    #[serde(default)]
    pub registration: RegistrationConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_addr: "127.0.0.1:8080".to_string() }
    }
}

/// Electronic tax-invoice API configuration
///
/// Issuance is disabled while `base_url` is `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvoiceApiConfig {
    pub base_url: Option<String>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for InvoiceApiConfig {
    fn default() -> Self {
        Self { base_url: None, api_key: None, timeout_secs: DEFAULT_INVOICE_TIMEOUT_SECS }
    }
}

/// Spreadsheet export configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportConfig {
    pub output_dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { output_dir: "exports".to_string() }
    }
}

/// Integrity scan / reconciliation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntegrityConfig {
    /// Maximum writes per fix-all batch.
    pub batch_size: usize,
    /// Run scan + fix-all in the background at this interval; disabled when
    /// `None`.
    pub auto_reconcile_interval_secs: Option<u64>,
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self { batch_size: DEFAULT_INTEGRITY_BATCH_SIZE, auto_reconcile_interval_secs: None }
    }
}

/// Quick-register rules that depend on the installation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistrationConfig {
    /// Name of the primary contractor that 시공팀 workers are pinned to.
    pub construction_company_name: String,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self { construction_company_name: DEFAULT_CONSTRUCTION_COMPANY_NAME.to_string() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig { path: "smartcon.db".to_string(), pool_size: 8 },
            server: ServerConfig::default(),
            invoice_api: InvoiceApiConfig::default(),
            export: ExportConfig::default(),
            integrity: IntegrityConfig::default(),
            registration: RegistrationConfig::default(),
        }
    }
}
