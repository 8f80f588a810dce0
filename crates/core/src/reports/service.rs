//! Loading and saving the daily allocation board

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use smartcon_domain::{DailyReport, Result, SmartconError, TeamStatus, WorkerStatus};
use tracing::{debug, info};

use super::board::{AllocatorBoard, DropTarget, SiteNote};
use super::ports::DailyReportRepository;
use crate::master_data::MasterRepositories;

/// One placement submitted from the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub worker_id: String,
    pub site_id: String,
    pub man_day: f64,
}

/// Board state submitted on save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveAssignments {
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub notes: Vec<(String, SiteNote)>,
}

pub struct DailyReportService {
    repos: MasterRepositories,
    reports: Arc<dyn DailyReportRepository>,
}

impl DailyReportService {
    pub fn new(repos: MasterRepositories, reports: Arc<dyn DailyReportRepository>) -> Self {
        Self { repos, reports }
    }

    pub async fn reports_for_date(&self, date: NaiveDate) -> Result<Vec<DailyReport>> {
        self.reports.reports_for_date(date).await
    }

    /// Board for `date`: active workers in active teams, open sites, and the
    /// placements already saved for that date.
    pub async fn load_board(&self, date: NaiveDate) -> Result<AllocatorBoard> {
        let workers: Vec<_> = self
            .repos
            .workers
            .list()
            .await?
            .into_iter()
            .filter(|w| w.status != WorkerStatus::Retired)
            .collect();
        let sites: Vec<_> =
            self.repos.sites.list().await?.into_iter().filter(|s| s.status.is_open()).collect();
        let teams: Vec<_> = self
            .repos
            .teams
            .list()
            .await?
            .into_iter()
            .filter(|t| t.status == TeamStatus::Active)
            .collect();

        let mut board = AllocatorBoard::new(date, &workers, &sites, &teams);
        let existing = self.reports.reports_for_date(date).await?;
        board.apply_reports(&existing);
        debug!(
            %date,
            workers = workers.len(),
            sites = sites.len(),
            reports = existing.len(),
            "board loaded"
        );
        Ok(board)
    }

    /// For each team, replay its most recent earlier report date onto the
    /// board. Teams with no earlier report are skipped. Returns the number of
    /// workers placed.
    pub async fn copy_previous_day(
        &self,
        board: &mut AllocatorBoard,
        team_ids: &[String],
    ) -> Result<usize> {
        let mut placed = 0;
        for team_id in team_ids {
            let Some(previous) = self.reports.latest_date_before(team_id, board.date()).await?
            else {
                debug!(%team_id, "no earlier report to copy");
                continue;
            };
            let reports = self.reports.team_reports_for_date(team_id, previous).await?;
            placed += board.replay_assignments(team_id, &reports);
        }
        Ok(placed)
    }

    /// Overwrite the board date's reports with the board's current state.
    pub async fn save_board(&self, board: &AllocatorBoard) -> Result<Vec<DailyReport>> {
        let reports = board.build_reports()?;
        let written = self.reports.replace_for_date(board.date(), &reports).await?;
        info!(
            date = %board.date(),
            reports = written,
            assigned = board.assigned_count(),
            "daily reports saved"
        );
        Ok(reports)
    }

    /// Rebuild the board from submitted placements and save it.
    pub async fn save_assignments(
        &self,
        date: NaiveDate,
        submitted: &SaveAssignments,
    ) -> Result<Vec<DailyReport>> {
        let mut board = self.load_board(date).await?;
        board.reset_all();
        for assignment in &submitted.assignments {
            if board.item(&assignment.worker_id).is_none() {
                return Err(SmartconError::InvalidInput(format!(
                    "worker {} is not on the board",
                    assignment.worker_id
                )));
            }
            board.move_workers(
                std::slice::from_ref(&assignment.worker_id),
                &DropTarget::Site(assignment.site_id.clone()),
                None,
            )?;
            board.set_man_day(&assignment.worker_id, assignment.man_day)?;
        }
        for (site_id, note) in &submitted.notes {
            board.set_site_note(site_id, note.clone())?;
        }
        self.save_board(&board).await
    }
}
