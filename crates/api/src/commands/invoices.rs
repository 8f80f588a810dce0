//! Electronic tax invoice commands

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use smartcon_domain::{InvoiceRecord, TaxInvoiceRequest};

use super::ApiResult;
use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

pub async fn list_invoices(State(ctx): State<Arc<AppContext>>) -> ApiResult<Vec<InvoiceRecord>> {
    let records = execute_command("invoices::list", || ctx.invoices.list()).await?;
    Ok(Json(records))
}

pub async fn issue_invoice(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<TaxInvoiceRequest>,
) -> ApiResult<InvoiceRecord> {
    let record = execute_command("invoices::issue", || ctx.invoices.issue(request)).await?;
    Ok(Json(record))
}
