//! Command execution helpers
//!
//! Every HTTP handler funnels its service call through here so that timing
//! and outcome logging look the same across the API.

use std::future::Future;
use std::time::Instant;

use smartcon_domain::Result as DomainResult;
use tracing::warn;

use crate::utils::logging::{error_label, log_command_execution};

/// Execute a command, logging its duration and outcome.
///
/// # Example
///
/// ```rust,ignore
/// async fn list_sites(State(ctx): State<Arc<AppContext>>) -> ApiResult<Vec<Site>> {
///     let sites = execute_command("master_data::list_sites", || ctx.master_data.list_sites())
///         .await?;
///     Ok(Json(sites))
/// }
/// ```
pub async fn execute_command<F, Fut, T>(command_name: &str, command_fn: F) -> DomainResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    let start = Instant::now();

    let result = command_fn().await;

    let elapsed = start.elapsed();
    log_command_execution(command_name, elapsed, result.is_ok());
    if let Err(err) = &result {
        warn!(
        command = command_name,
        error_type = error_label(err),
        error = %err,
        "command failed"
    );
    }

    result
}
