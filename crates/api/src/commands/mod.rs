//! HTTP commands - JSON bridge between clients and the core services

mod dashboard;
mod events;
mod health;
mod integrity;
mod invoices;
mod master_data;
mod payroll;
mod registration;
mod reports;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use smartcon_domain::constants::MSG_SAVE_FAILED;
use smartcon_domain::SmartconError;
use tracing::error;

use crate::context::AppContext;
use crate::utils::logging::error_label;

/// Error returned by every handler.
#[derive(Debug)]
pub struct ApiError(pub SmartconError);

pub type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

impl From<SmartconError> for ApiError {
    fn from(err: SmartconError) -> Self {
        Self(err)
    }
}

/// Status code for each error kind.
pub fn error_status(err: &SmartconError) -> StatusCode {
    match err {
        SmartconError::Validation(_) | SmartconError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        SmartconError::NotFound(_) => StatusCode::NOT_FOUND,
        SmartconError::Conflict(_) | SmartconError::WriteVerification(_) => StatusCode::CONFLICT,
        SmartconError::Network(_) => StatusCode::BAD_GATEWAY,
        SmartconError::Auth(_)
        | SmartconError::Database(_)
        | SmartconError::Config(_)
        | SmartconError::Export(_)
        | SmartconError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = error_status(&self.0);
        let kind = error_label(&self.0);
        let message = match &self.0 {
            // operator-facing text is shown as is
            SmartconError::Validation(msg) | SmartconError::WriteVerification(msg) => msg.clone(),
            SmartconError::Database(_) | SmartconError::Internal(_) => {
                error!(error = %self.0, "store failure");
                MSG_SAVE_FAILED.to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "type": kind, "message": message }))).into_response()
    }
}

/// Inclusive date range taken from `?start=YYYY-MM-DD&end=YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Every route, sharing one context.
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/events", get(events::master_data_events))
        // master data
        .route("/companies", get(master_data::list_companies).post(master_data::create_company))
        .route(
            "/companies/{id}",
            get(master_data::get_company)
                .put(master_data::update_company)
                .delete(master_data::delete_company),
        )
        .route("/companies/{id}/archive", post(master_data::archive_company))
        .route("/teams", get(master_data::list_teams).post(master_data::create_team))
        .route("/teams/{id}", get(master_data::get_team).put(master_data::update_team))
        .route("/teams/{id}/deactivate", post(master_data::deactivate_team))
        .route("/sites", get(master_data::list_sites).post(master_data::create_site))
        .route("/sites/{id}", get(master_data::get_site).put(master_data::update_site))
        .route("/sites/{id}/archive", post(master_data::archive_site))
        .route("/workers", get(master_data::list_workers).post(master_data::create_worker))
        .route("/workers/bulk-edit", post(master_data::bulk_edit_workers))
        .route("/workers/{id}", get(master_data::get_worker).put(master_data::update_worker))
        .route("/workers/{id}/retire", post(master_data::retire_worker))
        .route("/quick-register", post(registration::quick_register))
        // daily reports
        .route("/reports/{date}", get(reports::reports_for_date).put(reports::save_assignments))
        .route("/reports/{date}/board", get(reports::load_board).post(reports::save_board))
        .route("/reports/{date}/copy-previous", post(reports::copy_previous_day))
        // payroll
        .route(
            "/payroll/config",
            get(payroll::get_payroll_config).put(payroll::save_payroll_config),
        )
        .route("/payroll/teams/{team_id}/invoice", get(payroll::team_invoice))
        .route(
            "/payroll/tax-report",
            get(payroll::tax_office_report).post(payroll::export_tax_office_report),
        )
        .route(
            "/payroll/deductions",
            get(payroll::list_deductions).post(payroll::record_deduction),
        )
        .route("/payroll/deductions/{id}", axum::routing::delete(payroll::delete_deduction))
        // tax invoices
        .route("/invoices", get(invoices::list_invoices).post(invoices::issue_invoice))
        // integrity
        .route("/integrity/scan", get(integrity::scan))
        .route("/integrity/fix", post(integrity::fix_one))
        .route("/integrity/fix-all", post(integrity::fix_all))
        // dashboard
        .route("/dashboard", get(dashboard::summary))
        .route("/dashboard/company-totals", put(dashboard::refresh_company_totals))
        .with_state(ctx)
}
