//! In-memory copy of the master collections shared by all request handlers

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use smartcon_domain::{Company, MasterRecord, Site, Team, Worker, WorkerPatch};

/// Master collections keyed by id.
#[derive(Debug, Clone, Default)]
pub struct MasterDataCache {
    pub companies: BTreeMap<String, Company>,
    pub teams: BTreeMap<String, Team>,
    pub sites: BTreeMap<String, Site>,
    pub workers: BTreeMap<String, Worker>,
}

/// Cache handle passed to services.
pub type SharedCache = Arc<RwLock<MasterDataCache>>;

pub fn shared_cache() -> SharedCache {
    Arc::new(RwLock::new(MasterDataCache::default()))
}

fn index<T: MasterRecord>(records: Vec<T>) -> BTreeMap<String, T> {
    records.into_iter().map(|r| (r.id().to_string(), r)).collect()
}

impl MasterDataCache {
    pub fn replace_companies(&mut self, companies: Vec<Company>) {
        self.companies = index(companies);
    }

    pub fn replace_teams(&mut self, teams: Vec<Team>) {
        self.teams = index(teams);
    }

    pub fn replace_sites(&mut self, sites: Vec<Site>) {
        self.sites = index(sites);
    }

    pub fn replace_workers(&mut self, workers: Vec<Worker>) {
        self.workers = index(workers);
    }

    /// Workers with the patch applied, keyed by id. Unknown ids are ignored.
    pub fn patch_workers(&mut self, ids: &[String], patch: &WorkerPatch) -> Vec<Worker> {
        let mut previous = Vec::new();
        for id in ids {
            if let Some(worker) = self.workers.get_mut(id) {
                previous.push(worker.clone());
                worker.apply_patch(patch);
            }
        }
        previous
    }

    pub fn company_by_name(&self, name: &str) -> Option<&Company> {
        self.companies.values().find(|c| c.name == name)
    }

    pub fn teams_of_company<'a>(&'a self, company_id: &'a str) -> impl Iterator<Item = &'a Team> {
        self.teams.values().filter(move |t| t.company_id() == Some(company_id))
    }
}
