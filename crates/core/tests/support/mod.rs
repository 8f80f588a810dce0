//! Shared test helpers for `smartcon-core` integration tests.
//!
//! These helpers provide in-memory stores and seeded master data so service
//! tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod repositories;

use std::sync::Arc;

use chrono::NaiveDate;
use smartcon_core::{shared_cache, EventBus, MasterRepositories, SharedCache};
use smartcon_domain::{
    Company, CompanyType, EntityRef, MasterRecord, SalaryModel, Site, SiteStatus, Team,
    TeamStatus, TeamType, Worker, WorkerStatus,
};

pub use repositories::*;

/// Master collections plus the cache and bus every service shares.
pub struct Fixture {
    pub companies: Arc<MemoryCollection<Company>>,
    pub teams: Arc<MemoryCollection<Team>>,
    pub sites: Arc<MemoryCollection<Site>>,
    pub workers: Arc<MemoryCollection<Worker>>,
    pub cache: SharedCache,
    pub events: EventBus,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            companies: Arc::new(MemoryCollection::new()),
            teams: Arc::new(MemoryCollection::new()),
            sites: Arc::new(MemoryCollection::new()),
            workers: Arc::new(MemoryCollection::new()),
            cache: shared_cache(),
            events: EventBus::new(),
        }
    }

    pub fn repos(&self) -> MasterRepositories {
        MasterRepositories {
            companies: self.companies.clone(),
            teams: self.teams.clone(),
            sites: self.sites.clone(),
            workers: self.workers.clone(),
        }
    }

    /// 청연 (builder), 대한협력 (partner) with its 지원팀, one 시공팀, two open
    /// sites and one completed site.
    pub fn seeded() -> Self {
        let fixture = Self::new();
        fixture.companies.seed([
            company("c-main", "청연", CompanyType::Contractor),
            company("c-partner", "대한협력", CompanyType::Partner),
        ]);
        fixture.teams.seed([
            team("t-main", "시공1팀", TeamType::Construction, Some(("c-main", "청연"))),
            team("t-partner", "대한협력 팀", TeamType::Support, Some(("c-partner", "대한협력"))),
        ]);
        fixture.sites.seed([
            site("s-a", "강남 현장", SiteStatus::Active),
            site("s-b", "판교 현장", SiteStatus::Ongoing),
            site("s-old", "종료 현장", SiteStatus::Completed),
        ]);
        fixture
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

pub fn company(id: &str, name: &str, company_type: CompanyType) -> Company {
    Company {
        id: id.into(),
        name: name.into(),
        company_type,
        ..Company::default()
    }
}

pub fn team(id: &str, name: &str, team_type: TeamType, company: Option<(&str, &str)>) -> Team {
    Team {
        id: id.into(),
        name: name.into(),
        team_type,
        company: company.map(|(id, name)| EntityRef::new(id, name)),
        leader: None,
        members: Vec::new(),
        status: TeamStatus::Active,
        created_at: 0,
        updated_at: 0,
    }
}

pub fn site(id: &str, name: &str, status: SiteStatus) -> Site {
    Site { id: id.into(), name: name.into(), status, ..Site::default() }
}

/// Daily-rate worker in `team`, not assigned to a site.
pub fn worker(id: &str, name: &str, team: &Team, unit_price: i64) -> Worker {
    Worker {
        id: id.into(),
        name: name.into(),
        id_number: "800101-1234567".into(),
        team: Some(team.to_ref()),
        company: team.company.clone(),
        salary_model: SalaryModel::Daily,
        unit_price,
        status: WorkerStatus::Unassigned,
        ..Worker::default()
    }
}
