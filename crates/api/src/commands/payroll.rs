//! Payroll settings, labor cost statements and the tax office export

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use smartcon_domain::{AdvanceDeduction, PayrollConfig, TaxOfficeReport, TeamLaborCostInvoice};

use super::{ApiError, ApiResult, Period};
use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

pub async fn get_payroll_config(State(ctx): State<Arc<AppContext>>) -> ApiResult<PayrollConfig> {
    let config = execute_command("payroll::get_config", || ctx.payroll_config.load()).await?;
    Ok(Json(config))
}

/// Save, then confirm the stored document matches what was sent.
pub async fn save_payroll_config(
    State(ctx): State<Arc<AppContext>>,
    Json(config): Json<PayrollConfig>,
) -> ApiResult<PayrollConfig> {
    let saved = execute_command("payroll::save_config", || ctx.payroll_config.save(config)).await?;
    Ok(Json(saved))
}

pub async fn team_invoice(
    State(ctx): State<Arc<AppContext>>,
    Path(team_id): Path<String>,
    Query(period): Query<Period>,
) -> ApiResult<TeamLaborCostInvoice> {
    let invoice = execute_command("payroll::team_invoice", || {
        ctx.payroll.team_invoice(&team_id, period.start, period.end)
    })
    .await?;
    Ok(Json(invoice))
}

pub async fn tax_office_report(
    State(ctx): State<Arc<AppContext>>,
    Query(period): Query<Period>,
) -> ApiResult<TaxOfficeReport> {
    let report = execute_command("payroll::tax_office_report", || {
        ctx.payroll.tax_office_report(period.start, period.end)
    })
    .await?;
    Ok(Json(report))
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub path: String,
}

/// Write the tax office workbook into the export directory.
pub async fn export_tax_office_report(
    State(ctx): State<Arc<AppContext>>,
    Json(period): Json<Period>,
) -> ApiResult<ExportResponse> {
    let path = execute_command("payroll::export_tax_office_report", || {
        ctx.payroll.export_tax_office_report(period.start, period.end)
    })
    .await?;
    Ok(Json(ExportResponse { path: path.display().to_string() }))
}

pub async fn list_deductions(
    State(ctx): State<Arc<AppContext>>,
    Query(period): Query<Period>,
) -> ApiResult<Vec<AdvanceDeduction>> {
    let deductions = execute_command("payroll::list_deductions", || {
        ctx.payroll.list_deductions(period.start, period.end)
    })
    .await?;
    Ok(Json(deductions))
}

pub async fn record_deduction(
    State(ctx): State<Arc<AppContext>>,
    Json(deduction): Json<AdvanceDeduction>,
) -> ApiResult<AdvanceDeduction> {
    let recorded =
        execute_command("payroll::record_deduction", || ctx.payroll.record_deduction(deduction))
            .await?;
    Ok(Json(recorded))
}

pub async fn delete_deduction(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    execute_command("payroll::delete_deduction", || ctx.payroll.delete_deduction(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
