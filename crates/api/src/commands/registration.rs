//! Quick-register command

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use smartcon_core::{RegisterForm, RegisterOutcome};

use super::ApiResult;
use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

/// Register a worker, team, site or company from the bottom panel form.
pub async fn quick_register(
    State(ctx): State<Arc<AppContext>>,
    Json(form): Json<RegisterForm>,
) -> ApiResult<RegisterOutcome> {
    let outcome =
        execute_command("registration::quick_register", || ctx.quick_register.register(form))
            .await?;
    Ok(Json(outcome))
}
