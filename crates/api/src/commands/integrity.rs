//! Denormalized-name integrity commands

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use smartcon_domain::{Discrepancy, FixReport};

use super::ApiResult;
use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

pub async fn scan(State(ctx): State<Arc<AppContext>>) -> ApiResult<Vec<Discrepancy>> {
    let found = execute_command("integrity::scan", || ctx.integrity.scan()).await?;
    Ok(Json(found))
}

#[derive(Debug, Serialize)]
pub struct FixOneResponse {
    pub fixed: bool,
}

pub async fn fix_one(
    State(ctx): State<Arc<AppContext>>,
    Json(discrepancy): Json<Discrepancy>,
) -> ApiResult<FixOneResponse> {
    let fixed =
        execute_command("integrity::fix_one", || ctx.integrity.fix_one(&discrepancy)).await?;
    Ok(Json(FixOneResponse { fixed }))
}

pub async fn fix_all(State(ctx): State<Arc<AppContext>>) -> ApiResult<FixReport> {
    let report = execute_command("integrity::fix_all", || ctx.integrity.fix_all()).await?;
    Ok(Json(report))
}
