use serde::{Deserialize, Serialize};

use crate::constants::EVENT_MASTER_DATA_CHANGED;

/// Notification that master collections were written.
///
/// Each flag tells listeners whether that collection should be refetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MasterDataChanged {
    pub workers: bool,
    pub teams: bool,
    pub sites: bool,
    pub companies: bool,
}

impl MasterDataChanged {
    pub const TOPIC: &'static str = EVENT_MASTER_DATA_CHANGED;

    pub fn workers() -> Self {
        Self { workers: true, ..Self::default() }
    }

    pub fn teams() -> Self {
        Self { teams: true, ..Self::default() }
    }

    pub fn sites() -> Self {
        Self { sites: true, ..Self::default() }
    }

    pub fn companies() -> Self {
        Self { companies: true, ..Self::default() }
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            workers: self.workers || other.workers,
            teams: self.teams || other.teams,
            sites: self.sites || other.sites,
            companies: self.companies || other.companies,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.workers || self.teams || self.sites || self.companies)
    }
}
