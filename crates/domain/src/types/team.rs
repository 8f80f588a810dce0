//! Team master data

use serde::{Deserialize, Serialize};

use super::EntityRef;
use crate::constants::COLLECTION_TEAMS;
use crate::{impl_master_record, impl_wire_name_conversions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamType {
    #[serde(rename = "본팀")]
    Main,
    #[serde(rename = "관리팀")]
    Management,
    #[serde(rename = "새끼팀")]
    Sub,
    #[serde(rename = "직영팀")]
    Direct,
    #[serde(rename = "시공팀")]
    Construction,
    #[serde(rename = "지원팀")]
    Support,
    #[serde(rename = "용역팀")]
    Contracted,
}

impl_wire_name_conversions!(TeamType {
    Main => "본팀",
    Management => "관리팀",
    Sub => "새끼팀",
    Direct => "직영팀",
    Construction => "시공팀",
    Support => "지원팀",
    Contracted => "용역팀",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamStatus {
    #[default]
    Active,
    Inactive,
}

impl_wire_name_conversions!(TeamStatus {
    Active => "active",
    Inactive => "inactive",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub team_type: TeamType,
    pub company: Option<EntityRef>,
    #[serde(default)]
    pub leader: Option<EntityRef>,
    #[serde(default)]
    pub members: Vec<EntityRef>,
    #[serde(default)]
    pub status: TeamStatus,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Team {
    pub fn company_id(&self) -> Option<&str> {
        self.company.as_ref().map(|c| c.id.as_str())
    }
}

impl_master_record!(Team, COLLECTION_TEAMS);
