//! Company, team, site and worker commands

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use smartcon_core::{BulkEditResult, BulkWorkerEdit};
use smartcon_domain::{Company, Site, Team, Worker};

use super::{ApiError, ApiResult};
use crate::context::AppContext;
use crate::utils::command_helpers::execute_command;

type Ctx = State<Arc<AppContext>>;

// Companies

pub async fn list_companies(State(ctx): Ctx) -> ApiResult<Vec<Company>> {
    let companies =
        execute_command("master_data::list_companies", || ctx.master_data.list_companies())
            .await?;
    Ok(Json(companies))
}

pub async fn get_company(State(ctx): Ctx, Path(id): Path<String>) -> ApiResult<Company> {
    let company =
        execute_command("master_data::get_company", || ctx.master_data.get_company(&id)).await?;
    Ok(Json(company))
}

pub async fn create_company(State(ctx): Ctx, Json(company): Json<Company>) -> ApiResult<Company> {
    let created =
        execute_command("master_data::create_company", || ctx.master_data.create_company(company))
            .await?;
    Ok(Json(created))
}

pub async fn update_company(
    State(ctx): Ctx,
    Path(id): Path<String>,
    Json(mut company): Json<Company>,
) -> ApiResult<Company> {
    company.id = id;
    let updated =
        execute_command("master_data::update_company", || ctx.master_data.update_company(company))
            .await?;
    Ok(Json(updated))
}

pub async fn delete_company(
    State(ctx): Ctx,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    execute_command("master_data::delete_company", || ctx.master_data.delete_company(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn archive_company(State(ctx): Ctx, Path(id): Path<String>) -> ApiResult<Company> {
    let company =
        execute_command("master_data::archive_company", || ctx.master_data.archive_company(&id))
            .await?;
    Ok(Json(company))
}

// Teams

pub async fn list_teams(State(ctx): Ctx) -> ApiResult<Vec<Team>> {
    let teams = execute_command("master_data::list_teams", || ctx.master_data.list_teams()).await?;
    Ok(Json(teams))
}

pub async fn get_team(State(ctx): Ctx, Path(id): Path<String>) -> ApiResult<Team> {
    let team = execute_command("master_data::get_team", || ctx.master_data.get_team(&id)).await?;
    Ok(Json(team))
}

pub async fn create_team(State(ctx): Ctx, Json(team): Json<Team>) -> ApiResult<Team> {
    let created =
        execute_command("master_data::create_team", || ctx.master_data.create_team(team)).await?;
    Ok(Json(created))
}

pub async fn update_team(
    State(ctx): Ctx,
    Path(id): Path<String>,
    Json(mut team): Json<Team>,
) -> ApiResult<Team> {
    team.id = id;
    let updated =
        execute_command("master_data::update_team", || ctx.master_data.update_team(team)).await?;
    Ok(Json(updated))
}

pub async fn deactivate_team(State(ctx): Ctx, Path(id): Path<String>) -> ApiResult<Team> {
    let team =
        execute_command("master_data::deactivate_team", || ctx.master_data.deactivate_team(&id))
            .await?;
    Ok(Json(team))
}

// Sites

pub async fn list_sites(State(ctx): Ctx) -> ApiResult<Vec<Site>> {
    let sites = execute_command("master_data::list_sites", || ctx.master_data.list_sites()).await?;
    Ok(Json(sites))
}

pub async fn get_site(State(ctx): Ctx, Path(id): Path<String>) -> ApiResult<Site> {
    let site = execute_command("master_data::get_site", || ctx.master_data.get_site(&id)).await?;
    Ok(Json(site))
}

pub async fn create_site(State(ctx): Ctx, Json(site): Json<Site>) -> ApiResult<Site> {
    let created =
        execute_command("master_data::create_site", || ctx.master_data.create_site(site)).await?;
    Ok(Json(created))
}

pub async fn update_site(
    State(ctx): Ctx,
    Path(id): Path<String>,
    Json(mut site): Json<Site>,
) -> ApiResult<Site> {
    site.id = id;
    let updated =
        execute_command("master_data::update_site", || ctx.master_data.update_site(site)).await?;
    Ok(Json(updated))
}

pub async fn archive_site(State(ctx): Ctx, Path(id): Path<String>) -> ApiResult<Site> {
    let site =
        execute_command("master_data::archive_site", || ctx.master_data.archive_site(&id)).await?;
    Ok(Json(site))
}

// Workers

pub async fn list_workers(State(ctx): Ctx) -> ApiResult<Vec<Worker>> {
    let workers =
        execute_command("master_data::list_workers", || ctx.master_data.list_workers()).await?;
    Ok(Json(workers))
}

pub async fn get_worker(State(ctx): Ctx, Path(id): Path<String>) -> ApiResult<Worker> {
    let worker =
        execute_command("master_data::get_worker", || ctx.master_data.get_worker(&id)).await?;
    Ok(Json(worker))
}

pub async fn create_worker(State(ctx): Ctx, Json(worker): Json<Worker>) -> ApiResult<Worker> {
    let created =
        execute_command("master_data::create_worker", || ctx.master_data.create_worker(worker))
            .await?;
    Ok(Json(created))
}

pub async fn update_worker(
    State(ctx): Ctx,
    Path(id): Path<String>,
    Json(mut worker): Json<Worker>,
) -> ApiResult<Worker> {
    worker.id = id;
    let updated =
        execute_command("master_data::update_worker", || ctx.master_data.update_worker(worker))
            .await?;
    Ok(Json(updated))
}

pub async fn retire_worker(State(ctx): Ctx, Path(id): Path<String>) -> ApiResult<Worker> {
    let worker =
        execute_command("master_data::retire_worker", || ctx.master_data.retire_worker(&id))
            .await?;
    Ok(Json(worker))
}

#[derive(Debug, Deserialize)]
pub struct BulkEditRequest {
    pub worker_ids: Vec<String>,
    pub edit: BulkWorkerEdit,
}

pub async fn bulk_edit_workers(
    State(ctx): Ctx,
    Json(request): Json<BulkEditRequest>,
) -> ApiResult<BulkEditResult> {
    let result = execute_command("master_data::bulk_edit_workers", || {
        ctx.bulk_edit.apply(&request.worker_ids, &request.edit)
    })
    .await?;
    Ok(Json(result))
}
