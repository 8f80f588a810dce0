//! Shared helpers for `smartcon-infra` integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use smartcon_domain::{
    Company, CompanyType, EntityRef, MasterRecord, SalaryModel, Site, SiteStatus, Team,
    TeamStatus, TeamType, Worker, WorkerStatus,
};
use smartcon_infra::DbManager;
use tempfile::TempDir;

/// A migrated database in a temporary directory, removed on drop.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let db_path = temp_dir.path().join("smartcon.db");
        let manager = DbManager::new(&db_path, 4).expect("failed to open test database");
        manager.run_migrations().expect("failed to run migrations");
        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

pub fn company(id: &str, name: &str, company_type: CompanyType) -> Company {
    Company { id: id.into(), name: name.into(), company_type, ..Company::default() }
}

pub fn team(id: &str, name: &str, company: Option<(&str, &str)>) -> Team {
    Team {
        id: id.into(),
        name: name.into(),
        team_type: TeamType::Construction,
        company: company.map(|(id, name)| EntityRef::new(id, name)),
        leader: None,
        members: Vec::new(),
        status: TeamStatus::Active,
        created_at: 0,
        updated_at: 0,
    }
}

pub fn site(id: &str, name: &str) -> Site {
    Site { id: id.into(), name: name.into(), status: SiteStatus::Active, ..Site::default() }
}

pub fn worker(id: &str, name: &str, team: &Team) -> Worker {
    Worker {
        id: id.into(),
        name: name.into(),
        id_number: "800101-1234567".into(),
        team: Some(team.to_ref()),
        company: team.company.clone(),
        salary_model: SalaryModel::Daily,
        unit_price: 150_000,
        status: WorkerStatus::Unassigned,
        ..Worker::default()
    }
}
