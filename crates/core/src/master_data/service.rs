//! Master-data CRUD and lifecycle transitions

use std::sync::Arc;

use smartcon_common::Validator;
use smartcon_domain::constants::{MAX_UNIT_PRICE, MSG_UNIT_PRICE_TOO_LARGE};
use smartcon_domain::{
    now_timestamp, Company, CompanyStatus, MasterDataChanged, MasterRecord, Result, Site,
    SiteStatus, SmartconError, Team, TeamStatus, Worker, WorkerStatus,
};
use tracing::{debug, info};

use super::cache::SharedCache;
use super::commands::{run_optimistic, CacheCommand};
use super::ports::{MasterRepository, WorkerRepository};
use crate::events::EventBus;
use crate::validation::{is_resident_id, validation_failed};

/// Repository handles for the four master collections.
#[derive(Clone)]
pub struct MasterRepositories {
    pub companies: Arc<dyn MasterRepository<Company>>,
    pub teams: Arc<dyn MasterRepository<Team>>,
    pub sites: Arc<dyn MasterRepository<Site>>,
    pub workers: Arc<dyn WorkerRepository>,
}

/// Load a document or fail with `NotFound`.
pub(crate) async fn require<T: MasterRecord>(
    repo: &dyn MasterRepository<T>,
    id: &str,
) -> Result<T> {
    repo.get(id).await?.ok_or_else(|| SmartconError::not_found(T::COLLECTION, id))
}

/// CRUD over companies, teams, sites and workers.
///
/// Renames do not cascade into the names copied onto other documents; the
/// integrity scanner repairs those.
pub struct MasterDataService {
    repos: MasterRepositories,
    cache: SharedCache,
    events: EventBus,
}

impl MasterDataService {
    pub fn new(repos: MasterRepositories, cache: SharedCache, events: EventBus) -> Self {
        Self { repos, cache, events }
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    /// Reload every collection into the cache.
    pub async fn refresh_cache(&self) -> Result<()> {
        let companies = self.repos.companies.list().await?;
        let teams = self.repos.teams.list().await?;
        let sites = self.repos.sites.list().await?;
        let workers = self.repos.workers.list().await?;
        debug!(
            companies = companies.len(),
            teams = teams.len(),
            sites = sites.len(),
            workers = workers.len(),
            "master data cache refreshed"
        );

        let mut cache = self.cache.write();
        cache.replace_companies(companies);
        cache.replace_teams(teams);
        cache.replace_sites(sites);
        cache.replace_workers(workers);
        Ok(())
    }

    // Companies

    pub async fn list_companies(&self) -> Result<Vec<Company>> {
        let companies = self.repos.companies.list().await?;
        self.cache.write().replace_companies(companies.clone());
        Ok(companies)
    }

    pub async fn get_company(&self, id: &str) -> Result<Company> {
        require(self.repos.companies.as_ref(), id).await
    }

    pub async fn create_company(&self, mut company: Company) -> Result<Company> {
        validate_name(&company.name, "회사명을 입력해주세요")?;
        company.initialize(now_timestamp());

        let repo = Arc::clone(&self.repos.companies);
        let record = company.clone();
        run_optimistic(&self.cache, CacheCommand::UpsertCompany(company.clone()), async move {
            repo.create(&record).await
        })
        .await?;
        info!(company_id = %company.id, "company created");
        self.events.publish(MasterDataChanged::companies());
        Ok(company)
    }

    pub async fn update_company(&self, mut company: Company) -> Result<Company> {
        validate_name(&company.name, "회사명을 입력해주세요")?;
        let existing = self.get_company(&company.id).await?;
        company.created_at = existing.created_at;
        company.touch(now_timestamp());

        let repo = Arc::clone(&self.repos.companies);
        let record = company.clone();
        run_optimistic(&self.cache, CacheCommand::UpsertCompany(company.clone()), async move {
            repo.update(&record).await
        })
        .await?;
        self.events.publish(MasterDataChanged::companies());
        Ok(company)
    }

    /// Hard delete. Teams, sites and workers keep their copied references.
    pub async fn delete_company(&self, id: &str) -> Result<()> {
        let repo = Arc::clone(&self.repos.companies);
        let owned = id.to_string();
        let command = CacheCommand::RemoveCompany(id.to_string());
        let removed =
            run_optimistic(&self.cache, command, async move { repo.delete(&owned).await }).await?;
        if !removed {
            return Err(SmartconError::not_found(Company::COLLECTION, id));
        }
        info!(company_id = %id, "company deleted");
        self.events.publish(MasterDataChanged::companies());
        Ok(())
    }

    pub async fn archive_company(&self, id: &str) -> Result<Company> {
        let mut company = self.get_company(id).await?;
        company.status = CompanyStatus::Archived;
        self.update_company(company).await
    }

    // Teams

    pub async fn list_teams(&self) -> Result<Vec<Team>> {
        let teams = self.repos.teams.list().await?;
        self.cache.write().replace_teams(teams.clone());
        Ok(teams)
    }

    pub async fn get_team(&self, id: &str) -> Result<Team> {
        require(self.repos.teams.as_ref(), id).await
    }

    pub async fn create_team(&self, mut team: Team) -> Result<Team> {
        validate_name(&team.name, "팀명을 입력해주세요")?;
        team.initialize(now_timestamp());

        let repo = Arc::clone(&self.repos.teams);
        let record = team.clone();
        run_optimistic(&self.cache, CacheCommand::UpsertTeam(team.clone()), async move {
            repo.create(&record).await
        })
        .await?;
        info!(team_id = %team.id, team_type = %team.team_type, "team created");
        self.events.publish(MasterDataChanged::teams());
        Ok(team)
    }

    pub async fn update_team(&self, mut team: Team) -> Result<Team> {
        validate_name(&team.name, "팀명을 입력해주세요")?;
        let existing = self.get_team(&team.id).await?;
        team.created_at = existing.created_at;
        team.touch(now_timestamp());

        let repo = Arc::clone(&self.repos.teams);
        let record = team.clone();
        run_optimistic(&self.cache, CacheCommand::UpsertTeam(team.clone()), async move {
            repo.update(&record).await
        })
        .await?;
        self.events.publish(MasterDataChanged::teams());
        Ok(team)
    }

    pub async fn deactivate_team(&self, id: &str) -> Result<Team> {
        let mut team = self.get_team(id).await?;
        team.status = TeamStatus::Inactive;
        self.update_team(team).await
    }

    // Sites

    pub async fn list_sites(&self) -> Result<Vec<Site>> {
        let sites = self.repos.sites.list().await?;
        self.cache.write().replace_sites(sites.clone());
        Ok(sites)
    }

    pub async fn get_site(&self, id: &str) -> Result<Site> {
        require(self.repos.sites.as_ref(), id).await
    }

    pub async fn create_site(&self, mut site: Site) -> Result<Site> {
        validate_site(&site)?;
        site.initialize(now_timestamp());

        let repo = Arc::clone(&self.repos.sites);
        let record = site.clone();
        run_optimistic(&self.cache, CacheCommand::UpsertSite(site.clone()), async move {
            repo.create(&record).await
        })
        .await?;
        info!(site_id = %site.id, "site created");
        self.events.publish(MasterDataChanged::sites());
        Ok(site)
    }

    pub async fn update_site(&self, mut site: Site) -> Result<Site> {
        validate_site(&site)?;
        let existing = self.get_site(&site.id).await?;
        site.created_at = existing.created_at;
        site.touch(now_timestamp());

        let repo = Arc::clone(&self.repos.sites);
        let record = site.clone();
        run_optimistic(&self.cache, CacheCommand::UpsertSite(site.clone()), async move {
            repo.update(&record).await
        })
        .await?;
        self.events.publish(MasterDataChanged::sites());
        Ok(site)
    }

    /// Soft delete: the site is marked completed and drops off the board.
    pub async fn archive_site(&self, id: &str) -> Result<Site> {
        let mut site = self.get_site(id).await?;
        site.status = SiteStatus::Completed;
        self.update_site(site).await
    }

    // Workers

    pub async fn list_workers(&self) -> Result<Vec<Worker>> {
        let workers = self.repos.workers.list().await?;
        self.cache.write().replace_workers(workers.clone());
        Ok(workers)
    }

    pub async fn get_worker(&self, id: &str) -> Result<Worker> {
        self.repos
            .workers
            .get(id)
            .await?
            .ok_or_else(|| SmartconError::not_found(Worker::COLLECTION, id))
    }

    pub async fn create_worker(&self, mut worker: Worker) -> Result<Worker> {
        validate_worker(&worker)?;
        worker.initialize(now_timestamp());

        let repo = Arc::clone(&self.repos.workers);
        let record = worker.clone();
        run_optimistic(&self.cache, CacheCommand::UpsertWorker(worker.clone()), async move {
            repo.create(&record).await
        })
        .await?;
        info!(worker_id = %worker.id, "worker created");
        self.events.publish(MasterDataChanged::workers());
        Ok(worker)
    }

    pub async fn update_worker(&self, mut worker: Worker) -> Result<Worker> {
        validate_worker(&worker)?;
        let existing = self.get_worker(&worker.id).await?;
        worker.created_at = existing.created_at;
        worker.touch(now_timestamp());

        let repo = Arc::clone(&self.repos.workers);
        let record = worker.clone();
        run_optimistic(&self.cache, CacheCommand::UpsertWorker(worker.clone()), async move {
            repo.update(&record).await
        })
        .await?;
        self.events.publish(MasterDataChanged::workers());
        Ok(worker)
    }

    /// Soft delete: status 퇴사 and no site assignment.
    pub async fn retire_worker(&self, id: &str) -> Result<Worker> {
        let mut worker = self.get_worker(id).await?;
        worker.status = WorkerStatus::Retired;
        worker.site = None;
        self.update_worker(worker).await
    }
}

fn validate_name(name: &str, message: &str) -> Result<()> {
    let mut v = Validator::new();
    v.require("name", name, message);
    v.finalize().map_err(validation_failed)
}

pub(crate) fn validate_site(site: &Site) -> Result<()> {
    let mut v = Validator::new();
    v.require("name", &site.name, "현장명을 입력해주세요");
    if let (Some(start), Some(end)) = (site.start_date, site.end_date) {
        v.ensure("end_date", end >= start, "종료일은 시작일 이후여야 합니다");
    }
    v.finalize().map_err(validation_failed)
}

pub(crate) fn validate_worker(worker: &Worker) -> Result<()> {
    let mut v = Validator::new();
    v.require("name", &worker.name, "이름을 입력해주세요")
        .require("id_number", &worker.id_number, "주민등록번호를 입력해주세요");
    if !worker.id_number.trim().is_empty() {
        v.ensure(
            "id_number",
            is_resident_id(&worker.id_number),
            "주민등록번호 형식이 올바르지 않습니다 (######-#######)",
        );
    }
    v.ensure("unit_price", worker.unit_price >= 0, "단가는 0 이상이어야 합니다")
        .ensure("unit_price", worker.unit_price <= MAX_UNIT_PRICE, MSG_UNIT_PRICE_TOO_LARGE);
    v.finalize().map_err(validation_failed)
}
