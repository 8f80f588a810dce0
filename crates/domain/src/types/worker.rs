//! Worker master data

use serde::{Deserialize, Serialize};

use super::{BankAccount, EntityRef};
use crate::constants::COLLECTION_WORKERS;
use crate::{impl_master_record, impl_wire_name_conversions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SalaryModel {
    #[default]
    #[serde(rename = "일급제")]
    Daily,
    #[serde(rename = "월급제")]
    Monthly,
    #[serde(rename = "지원팀")]
    Support,
    #[serde(rename = "용역팀")]
    Contracted,
    #[serde(rename = "가지급")]
    Provisional,
}

impl_wire_name_conversions!(SalaryModel {
    Daily => "일급제",
    Monthly => "월급제",
    Support => "지원팀",
    Contracted => "용역팀",
    Provisional => "가지급",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WorkerStatus {
    #[default]
    #[serde(rename = "재직")]
    Employed,
    #[serde(rename = "퇴사")]
    Retired,
    #[serde(rename = "미배정")]
    Unassigned,
}

impl_wire_name_conversions!(WorkerStatus {
    Employed => "재직",
    Retired => "퇴사",
    Unassigned => "미배정",
});

impl WorkerStatus {
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Retired)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// Resident registration number, `######-#######`.
    pub id_number: String,
    #[serde(default)]
    pub team: Option<EntityRef>,
    #[serde(default)]
    pub site: Option<EntityRef>,
    #[serde(default)]
    pub company: Option<EntityRef>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub salary_model: SalaryModel,
    #[serde(default)]
    pub unit_price: i64,
    #[serde(default)]
    pub status: WorkerStatus,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub bank: BankAccount,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Worker {
    pub fn team_id(&self) -> Option<&str> {
        self.team.as_ref().map(|t| t.id.as_str())
    }

    pub fn site_id(&self) -> Option<&str> {
        self.site.as_ref().map(|s| s.id.as_str())
    }

    pub fn company_id(&self) -> Option<&str> {
        self.company.as_ref().map(|c| c.id.as_str())
    }

    /// Apply the set fields of a patch.
    pub fn apply_patch(&mut self, patch: &WorkerPatch) {
        if let Some(team) = &patch.team {
            self.team = team.clone();
        }
        if let Some(site) = &patch.site {
            self.site = site.clone();
        }
        if let Some(company) = &patch.company {
            self.company = company.clone();
        }
        if let Some(role) = &patch.role {
            self.role = role.clone();
        }
        if let Some(model) = patch.salary_model {
            self.salary_model = model;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(price) = patch.unit_price {
            self.unit_price = price;
        }
    }

    /// Patch that restores the fields `patch` would overwrite.
    pub fn inverse_of(&self, patch: &WorkerPatch) -> WorkerPatch {
        WorkerPatch {
            team: patch.team.as_ref().map(|_| self.team.clone()),
            site: patch.site.as_ref().map(|_| self.site.clone()),
            company: patch.company.as_ref().map(|_| self.company.clone()),
            role: patch.role.as_ref().map(|_| self.role.clone()),
            salary_model: patch.salary_model.map(|_| self.salary_model),
            status: patch.status.map(|_| self.status),
            unit_price: patch.unit_price.map(|_| self.unit_price),
        }
    }
}

impl_master_record!(Worker, COLLECTION_WORKERS);

/// Partial worker update. An outer `None` leaves the field untouched; for
/// reference fields `Some(None)` clears the assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerPatch {
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub team: Option<Option<EntityRef>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub site: Option<Option<EntityRef>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub company: Option<Option<EntityRef>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub role: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_model: Option<SalaryModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkerStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<i64>,
}

/// Keeps an explicit `null` distinct from a missing field.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl WorkerPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
