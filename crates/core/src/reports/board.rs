//! Drag-and-drop allocation board for one day's reports
//!
//! Normalized store: items by id, one ordered id list per container (team
//! pool or site card), and four ordered lists of site cards. A worker id is
//! in exactly one container at any time; `current_site_id` always names the
//! container it is in.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use smartcon_domain::constants::{BOARD_COLUMN_COUNT, DEFAULT_MAN_DAY, MAX_MAN_DAY};
use smartcon_domain::{
    new_document_id, DailyReport, EntityRef, ReportWorkerEntry, Result, SalaryModel, Site,
    SmartconError, Team, Worker,
};

use crate::validation::is_valid_man_day;

/// A worker on the board plus the day's transient fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerItem {
    pub worker_id: String,
    pub name: String,
    pub team_id: String,
    pub unit_price: i64,
    pub salary_model: SalaryModel,
    pub man_day: f64,
    current_site_id: Option<String>,
    is_confirmed: bool,
}

impl WorkerItem {
    fn from_worker(worker: &Worker, team_id: &str) -> Self {
        Self {
            worker_id: worker.id.clone(),
            name: worker.name.clone(),
            team_id: team_id.to_string(),
            unit_price: worker.unit_price,
            salary_model: worker.salary_model,
            man_day: DEFAULT_MAN_DAY,
            current_site_id: None,
            is_confirmed: false,
        }
    }

    pub fn current_site_id(&self) -> Option<&str> {
        self.current_site_id.as_deref()
    }

    pub fn is_confirmed(&self) -> bool {
        self.is_confirmed
    }

    pub fn is_assigned(&self) -> bool {
        self.current_site_id.is_some()
    }

    // The only place assignment state changes.
    fn set_site(&mut self, site_id: Option<String>) {
        self.is_confirmed = site_id.is_some();
        self.current_site_id = site_id;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteCard {
    pub site_id: String,
    pub name: String,
    pub company: Option<EntityRef>,
}

/// Free-text fields of the reports written for one site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteNote {
    pub work_content: Option<String>,
    pub weather: Option<String>,
}

/// Where dragged workers land.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "site_id", rename_all = "snake_case")]
pub enum DropTarget {
    /// Back to each worker's own team pool.
    Pool,
    Site(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocatorBoard {
    date: NaiveDate,
    items: BTreeMap<String, WorkerItem>,
    /// Initial worker order, used to rebuild pools on reset.
    order: Vec<String>,
    teams: BTreeMap<String, EntityRef>,
    pools: BTreeMap<String, Vec<String>>,
    sites: BTreeMap<String, SiteCard>,
    site_workers: BTreeMap<String, Vec<String>>,
    columns: Vec<Vec<String>>,
    notes: BTreeMap<String, SiteNote>,
    selection: Vec<String>,
}

impl AllocatorBoard {
    /// Board with every worker unassigned in their team pool. Workers without
    /// a team, or whose team isn't listed, are left off; site cards are dealt
    /// across the columns in the given order.
    pub fn new(date: NaiveDate, workers: &[Worker], sites: &[Site], teams: &[Team]) -> Self {
        let teams: BTreeMap<String, EntityRef> = teams
            .iter()
            .map(|t| (t.id.clone(), EntityRef::new(t.id.clone(), t.name.clone())))
            .collect();

        let mut board = Self {
            date,
            items: BTreeMap::new(),
            order: Vec::new(),
            pools: teams.keys().map(|id| (id.clone(), Vec::new())).collect(),
            teams,
            sites: BTreeMap::new(),
            site_workers: BTreeMap::new(),
            columns: vec![Vec::new(); BOARD_COLUMN_COUNT],
            notes: BTreeMap::new(),
            selection: Vec::new(),
        };

        for worker in workers {
            let Some(team_id) = worker.team_id() else { continue };
            if !board.teams.contains_key(team_id) || board.items.contains_key(&worker.id) {
                continue;
            }
            board.items.insert(worker.id.clone(), WorkerItem::from_worker(worker, team_id));
            board.order.push(worker.id.clone());
            board.pools.entry(team_id.to_string()).or_default().push(worker.id.clone());
        }

        for site in sites {
            board.add_site_card(SiteCard {
                site_id: site.id.clone(),
                name: site.name.clone(),
                company: site.company.clone(),
            });
        }
        board
    }

    fn add_site_card(&mut self, card: SiteCard) {
        if self.sites.contains_key(&card.site_id) {
            return;
        }
        let column = self.sites.len() % BOARD_COLUMN_COUNT;
        self.columns[column].push(card.site_id.clone());
        self.site_workers.insert(card.site_id.clone(), Vec::new());
        self.sites.insert(card.site_id.clone(), card);
    }

    /// Place workers as recorded in saved reports. Sites missing from the
    /// board get a card; workers missing from the board are ignored.
    pub fn apply_reports(&mut self, reports: &[DailyReport]) {
        for report in reports {
            self.add_site_card(SiteCard {
                site_id: report.site.id.clone(),
                name: report.site.name.clone(),
                company: None,
            });
            if report.work_content.is_some() || report.weather.is_some() {
                self.notes.insert(
                    report.site.id.clone(),
                    SiteNote {
                        work_content: report.work_content.clone(),
                        weather: report.weather.clone(),
                    },
                );
            }
            for entry in &report.workers {
                if self.items.contains_key(&entry.worker_id) {
                    self.place(&entry.worker_id, Some(&report.site.id), None);
                    if let Some(item) = self.items.get_mut(&entry.worker_id) {
                        item.man_day = entry.man_day;
                    }
                }
            }
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn item(&self, worker_id: &str) -> Option<&WorkerItem> {
        self.items.get(worker_id)
    }

    pub fn items(&self) -> impl Iterator<Item = &WorkerItem> {
        self.items.values()
    }

    pub fn pool(&self, team_id: &str) -> &[String] {
        self.pools.get(team_id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn site_workers(&self, site_id: &str) -> &[String] {
        self.site_workers.get(site_id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn columns(&self) -> &[Vec<String>] {
        &self.columns
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    pub fn assigned_count(&self) -> usize {
        self.items.values().filter(|i| i.is_assigned()).count()
    }

    /// Select a worker.
    ///
    /// A plain click selects only that worker, or clears the selection if it
    /// was the only one selected. An additive click toggles it; when added,
    /// selected workers whose assignment state differs from the clicked one
    /// are dropped, so a selection is always all-pool or all-site.
    pub fn click(&mut self, worker_id: &str, additive: bool) -> Result<()> {
        let clicked_assigned = self.require_item(worker_id)?.is_assigned();

        if !additive {
            if self.selection.len() == 1 && self.selection[0] == worker_id {
                self.selection.clear();
            } else {
                self.selection = vec![worker_id.to_string()];
            }
            return Ok(());
        }

        if let Some(pos) = self.selection.iter().position(|id| id == worker_id) {
            self.selection.remove(pos);
            return Ok(());
        }

        let items = &self.items;
        self.selection
            .retain(|id| items.get(id).is_some_and(|i| i.is_assigned() == clicked_assigned));
        self.selection.push(worker_id.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Drag workers to a pool or site card. `index` positions them within
    /// the target list (clamped); `None` appends. Order of `worker_ids` is
    /// kept.
    pub fn move_workers(
        &mut self,
        worker_ids: &[String],
        target: &DropTarget,
        index: Option<usize>,
    ) -> Result<()> {
        for id in worker_ids {
            self.require_item(id)?;
        }
        let site_id = match target {
            DropTarget::Pool => None,
            DropTarget::Site(site_id) => {
                if !self.sites.contains_key(site_id) {
                    return Err(SmartconError::not_found("sites", site_id));
                }
                Some(site_id.as_str())
            }
        };

        for (offset, id) in worker_ids.iter().enumerate() {
            self.place(id, site_id, index.map(|i| i + offset));
        }
        self.selection.clear();
        Ok(())
    }

    /// Double-click: send a worker back to its team pool.
    pub fn unassign(&mut self, worker_id: &str) -> Result<()> {
        self.require_item(worker_id)?;
        self.place(worker_id, None, None);
        self.selection.retain(|id| id != worker_id);
        Ok(())
    }

    /// Move the selection, in selection order, to the end of a site card.
    pub fn quick_assign(&mut self, site_id: &str) -> Result<usize> {
        if self.selection.is_empty() {
            return Err(SmartconError::Validation("작업자를 선택해주세요".into()));
        }
        let selected = self.selection.clone();
        self.move_workers(&selected, &DropTarget::Site(site_id.to_string()), None)?;
        Ok(selected.len())
    }

    /// Drag a site card to `column` at `index` (clamped).
    pub fn move_site_card(&mut self, site_id: &str, column: usize, index: usize) -> Result<()> {
        if column >= self.columns.len() {
            return Err(SmartconError::InvalidInput(format!("column {column} out of range")));
        }
        if !self.sites.contains_key(site_id) {
            return Err(SmartconError::not_found("sites", site_id));
        }
        for col in &mut self.columns {
            col.retain(|id| id != site_id);
        }
        let target = &mut self.columns[column];
        let at = index.min(target.len());
        target.insert(at, site_id.to_string());
        Ok(())
    }

    /// Replay a team's earlier assignments (copy previous day). Entries for
    /// workers or sites not on this board are skipped. Returns the number of
    /// workers placed.
    pub fn replay_assignments(&mut self, team_id: &str, reports: &[DailyReport]) -> usize {
        let mut placed = 0;
        for report in reports.iter().filter(|r| r.team.id == team_id) {
            if !self.sites.contains_key(&report.site.id) {
                continue;
            }
            for entry in &report.workers {
                let on_team =
                    self.items.get(&entry.worker_id).is_some_and(|i| i.team_id == team_id);
                if !on_team {
                    continue;
                }
                self.place(&entry.worker_id, Some(&report.site.id), None);
                if let Some(item) = self.items.get_mut(&entry.worker_id) {
                    item.man_day = entry.man_day;
                }
                placed += 1;
            }
        }
        placed
    }

    /// Every worker back to its pool in the original order, man-days reset.
    pub fn reset_all(&mut self) {
        for list in self.site_workers.values_mut() {
            list.clear();
        }
        for list in self.pools.values_mut() {
            list.clear();
        }
        for id in &self.order {
            if let Some(item) = self.items.get_mut(id) {
                item.set_site(None);
                item.man_day = DEFAULT_MAN_DAY;
                self.pools.entry(item.team_id.clone()).or_default().push(id.clone());
            }
        }
        self.selection.clear();
    }

    pub fn set_man_day(&mut self, worker_id: &str, man_day: f64) -> Result<()> {
        if !is_valid_man_day(man_day) || man_day > MAX_MAN_DAY {
            return Err(SmartconError::Validation(format!(
                "공수는 0 이상 {MAX_MAN_DAY} 이하로 입력해주세요"
            )));
        }
        let item = self
            .items
            .get_mut(worker_id)
            .ok_or_else(|| SmartconError::not_found("workers", worker_id))?;
        item.man_day = man_day;
        Ok(())
    }

    pub fn set_site_note(&mut self, site_id: &str, note: SiteNote) -> Result<()> {
        if !self.sites.contains_key(site_id) {
            return Err(SmartconError::not_found("sites", site_id));
        }
        self.notes.insert(site_id.to_string(), note);
        Ok(())
    }

    /// Group confirmed, assigned workers by (site, team) into reports.
    ///
    /// Sites follow column order, workers follow their order on the card.
    /// Fails when a report's amount does not fit in whole won.
    pub fn build_reports(&self) -> Result<Vec<DailyReport>> {
        let mut reports = Vec::new();
        for site_id in self.columns.iter().flatten() {
            let Some(card) = self.sites.get(site_id) else { continue };
            let mut by_team: Vec<(String, Vec<ReportWorkerEntry>)> = Vec::new();

            for worker_id in self.site_workers(site_id) {
                let Some(item) = self.items.get(worker_id) else { continue };
                if !item.is_confirmed() || item.current_site_id() != Some(site_id.as_str()) {
                    continue;
                }
                let entry = ReportWorkerEntry {
                    worker_id: item.worker_id.clone(),
                    name: item.name.clone(),
                    man_day: item.man_day,
                    unit_price: item.unit_price,
                    salary_model: item.salary_model,
                };
                match by_team.iter_mut().find(|(team, _)| *team == item.team_id) {
                    Some((_, entries)) => entries.push(entry),
                    None => by_team.push((item.team_id.clone(), vec![entry])),
                }
            }

            let note = self.notes.get(site_id).cloned().unwrap_or_default();
            for (team_id, entries) in by_team {
                let team = self
                    .teams
                    .get(&team_id)
                    .cloned()
                    .unwrap_or_else(|| EntityRef::new(team_id.clone(), String::new()));
                let mut report = DailyReport::new(
                    new_document_id(),
                    self.date,
                    team,
                    EntityRef::new(card.site_id.clone(), card.name.clone()),
                    entries,
                )?;
                report.work_content = note.work_content.clone();
                report.weather = note.weather.clone();
                reports.push(report);
            }
        }
        Ok(reports)
    }

    fn require_item(&self, worker_id: &str) -> Result<&WorkerItem> {
        self.items.get(worker_id).ok_or_else(|| SmartconError::not_found("workers", worker_id))
    }

    /// Remove a worker from its current container and insert it into the
    /// target one. Callers have checked that the item and site exist.
    fn place(&mut self, worker_id: &str, site_id: Option<&str>, index: Option<usize>) {
        let Some(item) = self.items.get_mut(worker_id) else { return };

        match item.current_site_id.as_deref() {
            Some(current) => {
                if let Some(list) = self.site_workers.get_mut(current) {
                    list.retain(|id| id != worker_id);
                }
            }
            None => {
                if let Some(list) = self.pools.get_mut(&item.team_id) {
                    list.retain(|id| id != worker_id);
                }
            }
        }

        let target = match site_id {
            Some(site) => self.site_workers.entry(site.to_string()).or_default(),
            None => self.pools.entry(item.team_id.clone()).or_default(),
        };
        let at = index.map_or(target.len(), |i| i.min(target.len()));
        target.insert(at, worker_id.to_string());
        item.set_site(site_id.map(str::to_string));
    }
}
