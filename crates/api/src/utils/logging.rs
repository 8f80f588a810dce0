use std::time::Duration;

use smartcon_domain::SmartconError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `RUST_LOG` selects the filter (default `info`); `SMARTCON_LOG_JSON=1`
/// switches to one JSON object per line. Safe to call more than once: later
/// calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("SMARTCON_LOG_JSON").is_ok_and(|v| v == "1" || v == "true");

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let result = if json { builder.json().try_init() } else { builder.try_init() };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Log the outcome of a command execution with structured fields.
///
/// # Parameters
/// * `command` - Logical command identifier (e.g. `"reports::save_board"`).
/// * `elapsed` - Duration the command execution took.
/// * `success` - Whether the command completed successfully.
///
/// Callers must avoid forwarding sensitive values in `command`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let duration_ms = elapsed.as_millis() as u64;

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, "command_execution_failure");
    }
}

/// Convert a `SmartconError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &SmartconError) -> &'static str {
    match error {
        SmartconError::Database(_) => "database",
        SmartconError::Config(_) => "config",
        SmartconError::Network(_) => "network",
        SmartconError::Auth(_) => "auth",
        SmartconError::NotFound(_) => "not_found",
        SmartconError::InvalidInput(_) => "invalid_input",
        SmartconError::Validation(_) => "validation",
        SmartconError::WriteVerification(_) => "write_verification",
        SmartconError::Conflict(_) => "conflict",
        SmartconError::Export(_) => "export",
        SmartconError::Internal(_) => "internal",
    }
}
