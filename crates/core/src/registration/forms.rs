//! Quick-register form payloads and their schema rules

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use smartcon_common::Validator;
use smartcon_domain::constants::{MAX_UNIT_PRICE, MSG_UNIT_PRICE_TOO_LARGE};
use smartcon_domain::{
    Company, MasterDataChanged, Result, SalaryModel, Site, SiteStatus, Team, TeamType, Worker,
};

use crate::validation::{is_resident_id, validation_failed};

/// One of the five quick-register forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegisterForm {
    Worker(WorkerForm),
    Team(TeamForm),
    Site(SiteForm),
    PartnerCompany(CompanyForm),
    ConstructionCompany(CompanyForm),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerForm {
    pub name: String,
    pub id_number: String,
    /// Kind of team the worker belongs to; drives the company rules.
    pub team_type: TeamType,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub salary_model: SalaryModel,
    #[serde(default)]
    pub unit_price: i64,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamForm {
    pub name: String,
    pub team_type: TeamType,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub leader_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteForm {
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub responsible_team_id: Option<String>,
    #[serde(default)]
    pub status: SiteStatus,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyForm {
    pub name: String,
    #[serde(default)]
    pub ceo_name: Option<String>,
    #[serde(default)]
    pub business_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// What a quick-register submission wrote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisterOutcome {
    pub company: Option<Company>,
    pub team: Option<Team>,
    pub site: Option<Site>,
    pub worker: Option<Worker>,
    pub changed: MasterDataChanged,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl WorkerForm {
    pub(crate) fn company_id(&self) -> Option<&str> {
        non_blank(&self.company_id)
    }

    pub(crate) fn team_id(&self) -> Option<&str> {
        non_blank(&self.team_id)
    }

    pub(crate) fn site_id(&self) -> Option<&str> {
        non_blank(&self.site_id)
    }

    /// Rules that need no lookups. Reference rules run after resolution.
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new().stop_on_first_error();
        v.require("name", &self.name, "이름을 입력해주세요")
            .require("id_number", &self.id_number, "주민등록번호를 입력해주세요")
            .ensure(
                "id_number",
                is_resident_id(&self.id_number),
                "주민등록번호 형식이 올바르지 않습니다 (######-#######)",
            )
            .ensure(
                "unit_price",
                self.salary_model != SalaryModel::Daily || self.unit_price > 0,
                "일급제 작업자는 단가를 입력해주세요",
            )
            .ensure("unit_price", self.unit_price >= 0, "단가는 0 이상이어야 합니다")
            .ensure("unit_price", self.unit_price <= MAX_UNIT_PRICE, MSG_UNIT_PRICE_TOO_LARGE);
        if self.team_type == TeamType::Support {
            v.ensure(
                "company_id",
                self.company_id().is_some(),
                "지원팀 작업자는 협력사를 선택해주세요",
            )
            .ensure("team_id", self.team_id().is_some(), "지원팀 작업자는 소속 팀을 선택해주세요");
        }
        v.finalize().map_err(validation_failed)
    }
}

impl TeamForm {
    pub(crate) fn company_id(&self) -> Option<&str> {
        non_blank(&self.company_id)
    }

    pub(crate) fn leader_id(&self) -> Option<&str> {
        non_blank(&self.leader_id)
    }

    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new().stop_on_first_error();
        v.require("name", &self.name, "팀명을 입력해주세요");
        if self.team_type == TeamType::Support {
            v.ensure("company_id", self.company_id().is_some(), "지원팀은 협력사를 선택해주세요");
        }
        v.finalize().map_err(validation_failed)
    }
}

impl SiteForm {
    pub(crate) fn company_id(&self) -> Option<&str> {
        non_blank(&self.company_id)
    }

    pub(crate) fn responsible_team_id(&self) -> Option<&str> {
        non_blank(&self.responsible_team_id)
    }

    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new().stop_on_first_error();
        v.require("name", &self.name, "현장명을 입력해주세요");
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            v.ensure("end_date", end >= start, "종료일은 시작일 이후여야 합니다");
        }
        v.finalize().map_err(validation_failed)
    }
}

impl CompanyForm {
    pub(crate) fn ceo_name(&self) -> Option<&str> {
        non_blank(&self.ceo_name)
    }

    /// Partners need a CEO name to derive their display code.
    pub fn validate(&self, require_ceo: bool) -> Result<()> {
        let mut v = Validator::new().stop_on_first_error();
        v.require("name", &self.name, "회사명을 입력해주세요");
        if require_ceo {
            v.ensure("ceo_name", self.ceo_name().is_some(), "대표자명을 입력해주세요");
        }
        v.finalize().map_err(validation_failed)
    }
}
