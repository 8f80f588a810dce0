//! Dashboard aggregates

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;
use smartcon_domain::DashboardSummary;

use super::{ApiResult, Period};
use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

pub async fn summary(
    State(ctx): State<Arc<AppContext>>,
    Query(period): Query<Period>,
) -> ApiResult<DashboardSummary> {
    let summary =
        execute_command("dashboard::summary", || ctx.dashboard.summary(period.start, period.end))
            .await?;
    Ok(Json(summary))
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub companies_updated: usize,
}

/// Recompute every company's cumulative man-days from all reports.
pub async fn refresh_company_totals(
    State(ctx): State<Arc<AppContext>>,
) -> ApiResult<RefreshResponse> {
    let companies_updated = execute_command("dashboard::refresh_company_totals", || {
        ctx.dashboard.refresh_company_totals()
    })
    .await?;
    Ok(Json(RefreshResponse { companies_updated }))
}
