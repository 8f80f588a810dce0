//! Cross-check of worker reference names against master documents
//!
//! Workers carry copies of their team, site and company names. Nothing keeps
//! those copies current when a master is renamed or deleted, so this scanner
//! finds the drift and overwrites stale names in batches.

use std::collections::HashMap;

use smartcon_domain::{
    Discrepancy, EntityRef, FixReport, MasterDataChanged, ReferenceField, ReferenceFix, Result,
    SmartconError, Worker,
};
use tracing::{error, info, warn};

use crate::events::EventBus;
use crate::master_data::MasterRepositories;

pub struct IntegrityScanner {
    repos: MasterRepositories,
    events: EventBus,
    batch_size: usize,
}

impl IntegrityScanner {
    pub fn new(repos: MasterRepositories, events: EventBus, batch_size: usize) -> Self {
        Self { repos, events, batch_size: batch_size.max(1) }
    }

    /// Every stale or dangling reference, ordered by worker name.
    pub async fn scan(&self) -> Result<Vec<Discrepancy>> {
        let names = MasterNames {
            teams: self.repos.teams.list().await?.into_iter().map(|t| (t.id, t.name)).collect(),
            sites: self.repos.sites.list().await?.into_iter().map(|s| (s.id, s.name)).collect(),
            companies: self
                .repos
                .companies
                .list()
                .await?
                .into_iter()
                .map(|c| (c.id, c.name))
                .collect(),
        };
        let workers = self.repos.workers.list().await?;

        let mut found: Vec<Discrepancy> =
            workers.iter().flat_map(|worker| names.check(worker)).collect();
        found.sort_by(|a, b| {
            a.worker_name.cmp(&b.worker_name).then_with(|| a.worker_id.cmp(&b.worker_id))
        });

        let dangling = found.iter().filter(|d| !d.master_exists).count();
        info!(workers = workers.len(), discrepancies = found.len(), dangling, "integrity scan");
        Ok(found)
    }

    /// Overwrite one stale name with the master's current name, read fresh
    /// from the store. References to deleted masters need manual handling
    /// and are rejected.
    pub async fn fix_one(&self, discrepancy: &Discrepancy) -> Result<bool> {
        let id = discrepancy.referenced_id.as_str();
        let current = match discrepancy.field {
            ReferenceField::Team => self.repos.teams.get(id).await?.map(|t| t.name),
            ReferenceField::Site => self.repos.sites.get(id).await?.map(|s| s.name),
            ReferenceField::Company => self.repos.companies.get(id).await?.map(|c| c.name),
        };
        let name = current.ok_or_else(|| {
            SmartconError::InvalidInput(format!(
                "{} {id} no longer exists and cannot be fixed automatically",
                discrepancy.field
            ))
        })?;
        if name != discrepancy.master_name.as_deref().unwrap_or_default() {
            warn!(
                worker_id = %discrepancy.worker_id,
                field = %discrepancy.field,
                "submitted master name differs from the stored master"
            );
        }
        let fix = ReferenceFix {
            worker_id: discrepancy.worker_id.clone(),
            field: discrepancy.field,
            referenced_id: discrepancy.referenced_id.clone(),
            name,
        };
        let applied = self.repos.workers.set_reference_names(&[fix]).await?;
        if applied > 0 {
            self.events.publish(MasterDataChanged::workers());
        }
        Ok(applied > 0)
    }

    /// Rescan and fix every fixable discrepancy in batches. Batches written
    /// before a failure stay written.
    pub async fn fix_all(&self) -> Result<FixReport> {
        let found = self.scan().await?;
        let (fixes, skipped): (Vec<_>, Vec<_>) =
            found.iter().partition(|d| d.is_fixable());
        let fixes: Vec<ReferenceFix> = fixes.iter().filter_map(|d| d.to_fix()).collect();

        let mut report = FixReport { skipped: skipped.len(), ..FixReport::default() };
        for batch in fixes.chunks(self.batch_size) {
            match self.repos.workers.set_reference_names(batch).await {
                Ok(applied) => {
                    report.fixed += applied;
                    report.batches += 1;
                }
                Err(e) => {
                    error!(
                        error = %e,
                        fixed_so_far = report.fixed,
                        batches_written = report.batches,
                        "integrity fix batch failed"
                    );
                    if report.fixed > 0 {
                        self.events.publish(MasterDataChanged::workers());
                    }
                    return Err(e);
                }
            }
        }

        if report.skipped > 0 {
            warn!(skipped = report.skipped, "references to deleted masters need manual repair");
        }
        if report.fixed > 0 {
            self.events.publish(MasterDataChanged::workers());
        }
        info!(fixed = report.fixed, batches = report.batches, "integrity fix-all complete");
        Ok(report)
    }
}

struct MasterNames {
    teams: HashMap<String, String>,
    sites: HashMap<String, String>,
    companies: HashMap<String, String>,
}

impl MasterNames {
    fn check(&self, worker: &Worker) -> Vec<Discrepancy> {
        [
            (ReferenceField::Team, worker.team.as_ref(), &self.teams),
            (ReferenceField::Site, worker.site.as_ref(), &self.sites),
            (ReferenceField::Company, worker.company.as_ref(), &self.companies),
        ]
        .into_iter()
        .filter_map(|(field, reference, masters)| compare(worker, field, reference?, masters))
        .collect()
    }
}

fn compare(
    worker: &Worker,
    field: ReferenceField,
    reference: &EntityRef,
    masters: &HashMap<String, String>,
) -> Option<Discrepancy> {
    if reference.id.is_empty() {
        return None;
    }
    let master_name = masters.get(&reference.id);
    if master_name == Some(&reference.name) {
        return None;
    }
    Some(Discrepancy {
        worker_id: worker.id.clone(),
        worker_name: worker.name.clone(),
        field,
        referenced_id: reference.id.clone(),
        stored_name: reference.name.clone(),
        master_name: master_name.cloned(),
        master_exists: master_name.is_some(),
    })
}
