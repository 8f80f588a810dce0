//! Construction site master data

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::EntityRef;
use crate::constants::COLLECTION_SITES;
use crate::{impl_master_record, impl_wire_name_conversions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteStatus {
    #[default]
    Planned,
    Active,
    Ongoing,
    Completed,
}

impl_wire_name_conversions!(SiteStatus {
    Planned => "planned",
    Active => "active",
    Ongoing => "ongoing",
    Completed => "completed",
});

impl SiteStatus {
    /// Sites that can still receive workers on the daily board.
    pub fn is_open(self) -> bool {
        !matches!(self, Self::Completed)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    pub company: Option<EntityRef>,
    #[serde(default)]
    pub responsible_team: Option<EntityRef>,
    #[serde(default)]
    pub status: SiteStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl_master_record!(Site, COLLECTION_SITES);
