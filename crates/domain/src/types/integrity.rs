//! Integrity scan results for denormalized worker references

use serde::{Deserialize, Serialize};

use crate::impl_wire_name_conversions;

/// Which denormalized reference on a worker is out of date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceField {
    Team,
    Site,
    Company,
}

impl_wire_name_conversions!(ReferenceField {
    Team => "team",
    Site => "site",
    Company => "company",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    pub worker_id: String,
    pub worker_name: String,
    pub field: ReferenceField,
    pub referenced_id: String,
    /// Name copied onto the worker.
    pub stored_name: String,
    /// Current master name; `None` when the master was deleted.
    pub master_name: Option<String>,
    pub master_exists: bool,
}

impl Discrepancy {
    pub fn is_fixable(&self) -> bool {
        self.master_exists && self.master_name.is_some()
    }

    /// The overwrite that repairs this discrepancy, if one exists.
    pub fn to_fix(&self) -> Option<ReferenceFix> {
        let name = self.master_name.as_ref().filter(|_| self.master_exists)?;
        Some(ReferenceFix {
            worker_id: self.worker_id.clone(),
            field: self.field,
            referenced_id: self.referenced_id.clone(),
            name: name.clone(),
        })
    }
}

/// Overwrite of one stale denormalized name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceFix {
    pub worker_id: String,
    pub field: ReferenceField,
    /// Guard: only applied while the worker still points at this id.
    pub referenced_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixReport {
    pub fixed: usize,
    /// Deleted-master discrepancies left for manual handling.
    pub skipped: usize,
    pub batches: usize,
}
