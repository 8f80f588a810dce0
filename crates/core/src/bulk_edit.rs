//! Bulk worker edit: one partial update applied to many workers

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smartcon_common::Validator;
use smartcon_domain::constants::{MAX_UNIT_PRICE, MSG_UNIT_PRICE_TOO_LARGE};
use smartcon_domain::{
    impl_wire_name_conversions, MasterDataChanged, MasterRecord, Result, SalaryModel, WorkerPatch,
    WorkerStatus,
};
use tracing::info;

use crate::events::EventBus;
use crate::master_data::service::require;
use crate::master_data::{run_optimistic, CacheCommand, MasterRepositories, SharedCache};
use crate::validation::validation_failed;

/// Checkbox on the bulk edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkField {
    Team,
    Site,
    Company,
    Role,
    SalaryModel,
    Status,
    UnitPrice,
}

impl_wire_name_conversions!(BulkField {
    Team => "team",
    Site => "site",
    Company => "company",
    Role => "role",
    SalaryModel => "salary_model",
    Status => "status",
    UnitPrice => "unit_price",
});

/// Selected fields and the values to write. Values of unselected fields are
/// ignored; a selected reference with no id clears the assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkWorkerEdit {
    pub fields: BTreeSet<BulkField>,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub site_id: Option<String>,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub salary_model: Option<SalaryModel>,
    #[serde(default)]
    pub status: Option<WorkerStatus>,
    #[serde(default)]
    pub unit_price: Option<i64>,
}

impl BulkWorkerEdit {
    fn selected(&self, field: BulkField) -> bool {
        self.fields.contains(&field)
    }

    fn validate(&self, worker_ids: &[String]) -> Result<()> {
        let mut v = Validator::new().stop_on_first_error();
        v.ensure("worker_ids", !worker_ids.is_empty(), "작업자를 선택해주세요")
            .ensure("fields", !self.fields.is_empty(), "수정할 항목을 선택해주세요");
        if self.selected(BulkField::SalaryModel) {
            v.ensure("salary_model", self.salary_model.is_some(), "급여 형태를 선택해주세요");
        }
        if self.selected(BulkField::Status) {
            v.ensure("status", self.status.is_some(), "상태를 선택해주세요");
        }
        if self.selected(BulkField::UnitPrice) {
            v.ensure(
                "unit_price",
                self.unit_price.is_some_and(|p| p >= 0),
                "단가는 0 이상이어야 합니다",
            )
            .ensure(
                "unit_price",
                !self.unit_price.is_some_and(|p| p > MAX_UNIT_PRICE),
                MSG_UNIT_PRICE_TOO_LARGE,
            );
        }
        v.finalize().map_err(validation_failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkEditResult {
    pub requested: usize,
    pub updated: usize,
    pub patch: WorkerPatch,
}

pub struct BulkEditService {
    repos: MasterRepositories,
    cache: SharedCache,
    events: EventBus,
}

impl BulkEditService {
    pub fn new(repos: MasterRepositories, cache: SharedCache, events: EventBus) -> Self {
        Self { repos, cache, events }
    }

    /// Resolve names for the chosen ids, then write one combined patch to all
    /// workers in a single batch. There is no per-worker recovery: the batch
    /// either lands or the cache is reverted and the error returned.
    pub async fn apply(
        &self,
        worker_ids: &[String],
        edit: &BulkWorkerEdit,
    ) -> Result<BulkEditResult> {
        edit.validate(worker_ids)?;
        let patch = self.build_patch(edit).await?;

        let repo = Arc::clone(&self.repos.workers);
        let ids = worker_ids.to_vec();
        let persisted_patch = patch.clone();
        let command =
            CacheCommand::PatchWorkers { ids: worker_ids.to_vec(), patch: patch.clone() };
        let updated = run_optimistic(&self.cache, command, async move {
            repo.update_many(&ids, &persisted_patch).await
        })
        .await?;

        info!(
            requested = worker_ids.len(),
            updated,
            fields = edit.fields.len(),
            "bulk worker edit applied"
        );
        self.events.publish(MasterDataChanged::workers());
        Ok(BulkEditResult { requested: worker_ids.len(), updated, patch })
    }

    async fn build_patch(&self, edit: &BulkWorkerEdit) -> Result<WorkerPatch> {
        let mut patch = WorkerPatch::default();
        for field in &edit.fields {
            match field {
                BulkField::Team => {
                    patch.team = Some(match non_blank(&edit.team_id) {
                        Some(id) => Some(require(self.repos.teams.as_ref(), id).await?.to_ref()),
                        None => None,
                    });
                }
                BulkField::Site => {
                    patch.site = Some(match non_blank(&edit.site_id) {
                        Some(id) => Some(require(self.repos.sites.as_ref(), id).await?.to_ref()),
                        None => None,
                    });
                }
                BulkField::Company => {
                    patch.company = Some(match non_blank(&edit.company_id) {
                        Some(id) => {
                            Some(require(self.repos.companies.as_ref(), id).await?.to_ref())
                        }
                        None => None,
                    });
                }
                BulkField::Role => {
                    patch.role = Some(non_blank(&edit.role).map(str::to_string));
                }
                BulkField::SalaryModel => patch.salary_model = edit.salary_model,
                BulkField::Status => patch.status = edit.status,
                BulkField::UnitPrice => patch.unit_price = edit.unit_price,
            }
        }
        Ok(patch)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
