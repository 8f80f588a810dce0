//! Company master data

use serde::{Deserialize, Serialize};

use super::BankAccount;
use crate::constants::COLLECTION_COMPANIES;
use crate::{impl_master_record, impl_wire_name_conversions};

/// Business relationship of a company to the primary contractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CompanyType {
    #[default]
    #[serde(rename = "미지정")]
    Unspecified,
    #[serde(rename = "시공사")]
    Contractor,
    #[serde(rename = "협력사")]
    Partner,
    #[serde(rename = "건설사")]
    Construction,
    #[serde(rename = "기타")]
    Other,
}

impl_wire_name_conversions!(CompanyType {
    Unspecified => "미지정",
    Contractor => "시공사",
    Partner => "협력사",
    Construction => "건설사",
    Other => "기타",
});

impl CompanyType {
    /// Contractor or construction company: eligible to own 시공팀 workers.
    pub fn is_builder(self) -> bool {
        matches!(self, Self::Contractor | Self::Construction)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanyStatus {
    #[default]
    Active,
    Inactive,
    Archived,
}

impl_wire_name_conversions!(CompanyStatus {
    Active => "active",
    Inactive => "inactive",
    Archived => "archived",
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// Display abbreviation, generated from the CEO name for partners.
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub business_number: Option<String>,
    #[serde(default)]
    pub ceo_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company_type: CompanyType,
    #[serde(default)]
    pub status: CompanyStatus,
    #[serde(default)]
    pub bank: BankAccount,
    /// Aggregate of reported man-days for this company's workers.
    #[serde(default)]
    pub total_man_day: f64,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl_master_record!(Company, COLLECTION_COMPANIES);
