//! Daily report and allocation board commands

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use smartcon_core::reports::SaveAssignments;
use smartcon_core::AllocatorBoard;
use smartcon_domain::{DailyReport, SmartconError};

use super::ApiResult;
use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

pub async fn reports_for_date(
    State(ctx): State<Arc<AppContext>>,
    Path(date): Path<NaiveDate>,
) -> ApiResult<Vec<DailyReport>> {
    let reports =
        execute_command("reports::reports_for_date", || ctx.reports.reports_for_date(date))
            .await?;
    Ok(Json(reports))
}

/// Replace the date's reports with the submitted placements.
pub async fn save_assignments(
    State(ctx): State<Arc<AppContext>>,
    Path(date): Path<NaiveDate>,
    Json(submitted): Json<SaveAssignments>,
) -> ApiResult<Vec<DailyReport>> {
    let saved = execute_command("reports::save_assignments", || {
        ctx.reports.save_assignments(date, &submitted)
    })
    .await?;
    Ok(Json(saved))
}

pub async fn load_board(
    State(ctx): State<Arc<AppContext>>,
    Path(date): Path<NaiveDate>,
) -> ApiResult<AllocatorBoard> {
    let board = execute_command("reports::load_board", || ctx.reports.load_board(date)).await?;
    Ok(Json(board))
}

/// Save a whole board as edited by the client.
pub async fn save_board(
    State(ctx): State<Arc<AppContext>>,
    Path(date): Path<NaiveDate>,
    Json(board): Json<AllocatorBoard>,
) -> ApiResult<Vec<DailyReport>> {
    let saved = execute_command("reports::save_board", || async {
        if board.date() != date {
            return Err(SmartconError::InvalidInput(format!(
                "board is for {}, not {date}",
                board.date()
            )));
        }
        ctx.reports.save_board(&board).await
    })
    .await?;
    Ok(Json(saved))
}

#[derive(Debug, Deserialize)]
pub struct CopyPreviousRequest {
    pub team_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CopyPreviousResponse {
    pub placed: usize,
    pub board: AllocatorBoard,
}

/// Load the date's board and replay each selected team's latest earlier day
/// onto it. Nothing is saved; the client reviews the board first.
pub async fn copy_previous_day(
    State(ctx): State<Arc<AppContext>>,
    Path(date): Path<NaiveDate>,
    Json(request): Json<CopyPreviousRequest>,
) -> ApiResult<CopyPreviousResponse> {
    let response = execute_command("reports::copy_previous_day", || async {
        let mut board = ctx.reports.load_board(date).await?;
        let placed = ctx.reports.copy_previous_day(&mut board, &request.team_ids).await?;
        Ok(CopyPreviousResponse { placed, board })
    })
    .await?;
    Ok(Json(response))
}
