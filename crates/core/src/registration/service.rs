//! Quick-register: create a master entity from one form submission

use std::sync::Arc;

use smartcon_domain::constants::DEFAULT_TEAM_SUFFIX;
use smartcon_domain::{
    company_abbreviation, now_timestamp, BankAccount, Company, CompanyStatus, CompanyType,
    MasterDataChanged, MasterRecord, RegistrationConfig, Result, Site, SmartconError,
    Team, TeamStatus, TeamType, Worker, WorkerStatus,
};
use tracing::{error, info, warn};

use super::forms::{CompanyForm, RegisterForm, RegisterOutcome, SiteForm, TeamForm, WorkerForm};
use crate::events::EventBus;
use crate::master_data::service::require;
use crate::master_data::{run_optimistic, CacheCommand, MasterRepositories, SharedCache};
use crate::validation::validation_failed;

/// Validate → resolve references → write → patch cache → notify.
pub struct QuickRegisterService {
    repos: MasterRepositories,
    cache: SharedCache,
    events: EventBus,
    config: RegistrationConfig,
}

impl QuickRegisterService {
    pub fn new(
        repos: MasterRepositories,
        cache: SharedCache,
        events: EventBus,
        config: RegistrationConfig,
    ) -> Self {
        Self { repos, cache, events, config }
    }

    pub async fn register(&self, form: RegisterForm) -> Result<RegisterOutcome> {
        let outcome = match form {
            RegisterForm::Worker(form) => self.register_worker(form).await?,
            RegisterForm::Team(form) => self.register_team(form).await?,
            RegisterForm::Site(form) => self.register_site(form).await?,
            RegisterForm::PartnerCompany(form) => self.register_partner_company(form).await?,
            RegisterForm::ConstructionCompany(form) => {
                self.register_construction_company(form).await?
            }
        };
        self.events.publish(outcome.changed);
        Ok(outcome)
    }

    async fn register_worker(&self, form: WorkerForm) -> Result<RegisterOutcome> {
        form.validate()?;

        let company = match form.team_type {
            TeamType::Construction => Some(self.construction_company().await?.to_ref()),
            TeamType::Support => {
                let id = form.company_id().unwrap_or_default();
                let company = require(self.repos.companies.as_ref(), id).await?;
                if company.company_type != CompanyType::Partner {
                    return Err(rule("지원팀 작업자는 협력사 소속이어야 합니다"));
                }
                Some(company.to_ref())
            }
            _ => match form.company_id() {
                Some(id) => Some(require(self.repos.companies.as_ref(), id).await?.to_ref()),
                None => None,
            },
        };

        let team = match form.team_id() {
            Some(id) => {
                let team = require(self.repos.teams.as_ref(), id).await?;
                if form.team_type == TeamType::Support
                    && team.company_id() != company.as_ref().map(|c| c.id.as_str())
                {
                    return Err(rule("선택한 팀이 해당 협력사 소속이 아닙니다"));
                }
                Some(team.to_ref())
            }
            None => None,
        };

        let site = match form.site_id() {
            Some(id) => Some(require(self.repos.sites.as_ref(), id).await?.to_ref()),
            None => None,
        };

        let status = if site.is_some() { WorkerStatus::Employed } else { WorkerStatus::Unassigned };
        let mut worker = Worker {
            id: String::new(),
            name: form.name.trim().to_string(),
            id_number: form.id_number.trim().to_string(),
            team,
            site,
            company,
            role: form.role.filter(|r| !r.trim().is_empty()),
            salary_model: form.salary_model,
            unit_price: form.unit_price,
            status,
            phone: form.phone,
            bank: BankAccount::default(),
            created_at: 0,
            updated_at: 0,
        };
        worker.initialize(now_timestamp());

        let repo = Arc::clone(&self.repos.workers);
        let record = worker.clone();
        run_optimistic(&self.cache, CacheCommand::UpsertWorker(worker.clone()), async move {
            repo.create(&record).await
        })
        .await?;
        info!(worker_id = %worker.id, team_type = %form.team_type, "worker registered");

        Ok(RegisterOutcome {
            worker: Some(worker),
            changed: MasterDataChanged::workers(),
            ..RegisterOutcome::default()
        })
    }

    async fn register_team(&self, form: TeamForm) -> Result<RegisterOutcome> {
        form.validate()?;

        let company = match form.company_id() {
            Some(id) => Some(require(self.repos.companies.as_ref(), id).await?),
            None => None,
        };
        if form.team_type == TeamType::Support
            && company.as_ref().map(|c| c.company_type) != Some(CompanyType::Partner)
        {
            return Err(rule("지원팀은 협력사를 선택해주세요"));
        }
        let leader = match form.leader_id() {
            Some(id) => Some(
                self.repos
                    .workers
                    .get(id)
                    .await?
                    .ok_or_else(|| SmartconError::not_found(Worker::COLLECTION, id))?
                    .to_ref(),
            ),
            None => None,
        };

        let team = self
            .write_team(Team {
                id: String::new(),
                name: form.name.trim().to_string(),
                team_type: form.team_type,
                company: company.map(|c| c.to_ref()),
                members: leader.iter().cloned().collect(),
                leader,
                status: TeamStatus::Active,
                created_at: 0,
                updated_at: 0,
            })
            .await?;

        Ok(RegisterOutcome {
            team: Some(team),
            changed: MasterDataChanged::teams(),
            ..RegisterOutcome::default()
        })
    }

    async fn register_site(&self, form: SiteForm) -> Result<RegisterOutcome> {
        form.validate()?;

        let company = match form.company_id() {
            Some(id) => Some(require(self.repos.companies.as_ref(), id).await?.to_ref()),
            None => None,
        };
        let responsible_team = match form.responsible_team_id() {
            Some(id) => Some(require(self.repos.teams.as_ref(), id).await?.to_ref()),
            None => None,
        };

        let mut site = Site {
            id: String::new(),
            name: form.name.trim().to_string(),
            code: form.code.filter(|c| !c.trim().is_empty()),
            company,
            responsible_team,
            status: form.status,
            start_date: form.start_date,
            end_date: form.end_date,
            created_at: 0,
            updated_at: 0,
        };
        site.initialize(now_timestamp());

        let repo = Arc::clone(&self.repos.sites);
        let record = site.clone();
        run_optimistic(&self.cache, CacheCommand::UpsertSite(site.clone()), async move {
            repo.create(&record).await
        })
        .await?;
        info!(site_id = %site.id, "site registered");

        Ok(RegisterOutcome {
            site: Some(site),
            changed: MasterDataChanged::sites(),
            ..RegisterOutcome::default()
        })
    }

    /// Creates the company and its default 지원팀. If the team write fails
    /// the company is deleted again and the team error is returned.
    async fn register_partner_company(&self, form: CompanyForm) -> Result<RegisterOutcome> {
        form.validate(true)?;

        let code = form.ceo_name().map(company_abbreviation).filter(|c| !c.is_empty());
        let company = self.write_company(new_company(&form, CompanyType::Partner, code)).await?;

        let default_team = Team {
            id: String::new(),
            name: format!("{}{}", company.name, DEFAULT_TEAM_SUFFIX),
            team_type: TeamType::Support,
            company: Some(company.to_ref()),
            leader: None,
            members: Vec::new(),
            status: TeamStatus::Active,
            created_at: 0,
            updated_at: 0,
        };

        let team = match self.write_team(default_team).await {
            Ok(team) => team,
            Err(err) => {
                warn!(
                    company_id = %company.id,
                    error = %err,
                    "default team write failed, removing company"
                );
                self.compensate_company(&company).await;
                return Err(err);
            }
        };

        Ok(RegisterOutcome {
            company: Some(company),
            team: Some(team),
            changed: MasterDataChanged::companies().merge(MasterDataChanged::teams()),
            ..RegisterOutcome::default()
        })
    }

    async fn register_construction_company(&self, form: CompanyForm) -> Result<RegisterOutcome> {
        form.validate(false)?;
        let code = form.ceo_name().map(company_abbreviation).filter(|c| !c.is_empty());
        let company =
            self.write_company(new_company(&form, CompanyType::Construction, code)).await?;
        Ok(RegisterOutcome {
            company: Some(company),
            changed: MasterDataChanged::companies(),
            ..RegisterOutcome::default()
        })
    }

    /// The company every 시공팀 worker belongs to.
    async fn construction_company(&self) -> Result<Company> {
        let name = self.config.construction_company_name.as_str();
        let companies = self.repos.companies.list().await?;
        companies
            .into_iter()
            .find(|c| c.name == name && c.company_type.is_builder())
            .ok_or_else(|| rule(&format!("시공사 '{name}'을(를) 먼저 등록해주세요")))
    }

    async fn write_company(&self, mut company: Company) -> Result<Company> {
        company.initialize(now_timestamp());
        let repo = Arc::clone(&self.repos.companies);
        let record = company.clone();
        run_optimistic(&self.cache, CacheCommand::UpsertCompany(company.clone()), async move {
            repo.create(&record).await
        })
        .await?;
        info!(
            company_id = %company.id,
            company_type = %company.company_type,
            "company registered"
        );
        Ok(company)
    }

    async fn write_team(&self, mut team: Team) -> Result<Team> {
        team.initialize(now_timestamp());
        let repo = Arc::clone(&self.repos.teams);
        let record = team.clone();
        run_optimistic(&self.cache, CacheCommand::UpsertTeam(team.clone()), async move {
            repo.create(&record).await
        })
        .await?;
        info!(team_id = %team.id, team_type = %team.team_type, "team registered");
        Ok(team)
    }

    async fn compensate_company(&self, company: &Company) {
        CacheCommand::RemoveCompany(company.id.clone()).apply(&mut self.cache.write());
        if let Err(err) = self.repos.companies.delete(&company.id).await {
            // Left for the operator: a partner company without its team.
            error!(
                company_id = %company.id,
                error = %err,
                "failed to remove company after team write failure"
            );
        }
    }
}

fn new_company(form: &CompanyForm, company_type: CompanyType, code: Option<String>) -> Company {
    Company {
        id: String::new(),
        name: form.name.trim().to_string(),
        code,
        business_number: form.business_number.clone(),
        ceo_name: form.ceo_name().map(str::to_string),
        address: form.address.clone(),
        phone: form.phone.clone(),
        company_type,
        status: CompanyStatus::Active,
        bank: BankAccount::default(),
        total_man_day: 0.0,
        created_at: 0,
        updated_at: 0,
    }
}

fn rule(message: &str) -> SmartconError {
    let mut errors = smartcon_common::ValidationError::new();
    errors.add_field_error("form", message);
    validation_failed(errors)
}
