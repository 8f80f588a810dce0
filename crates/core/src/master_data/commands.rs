//! Optimistic cache updates with inverse replay
//!
//! Each [`CacheCommand`] applied to a [`MasterDataCache`] returns the command
//! that undoes it. [`run_optimistic`] applies a command, runs the store
//! write, and replays the inverse if the write fails, so handlers never
//! hand-write their own rollback.

use std::future::Future;

use smartcon_domain::{Company, Result, Site, Team, Worker, WorkerPatch};
use tracing::warn;

use super::cache::{MasterDataCache, SharedCache};

#[derive(Debug, Clone, PartialEq)]
pub enum CacheCommand {
    UpsertCompany(Company),
    RemoveCompany(String),
    UpsertTeam(Team),
    RemoveTeam(String),
    UpsertSite(Site),
    RemoveSite(String),
    UpsertWorker(Worker),
    RemoveWorker(String),
    PatchWorkers { ids: Vec<String>, patch: WorkerPatch },
    /// Applied in order; its inverse runs the inverses in reverse order.
    Batch(Vec<CacheCommand>),
}

impl CacheCommand {
    /// Apply to the cache and return the inverse command.
    pub fn apply(self, cache: &mut MasterDataCache) -> CacheCommand {
        match self {
            Self::UpsertCompany(c) => {
                let id = c.id.clone();
                match cache.companies.insert(id.clone(), c) {
                    Some(old) => Self::UpsertCompany(old),
                    None => Self::RemoveCompany(id),
                }
            }
            Self::RemoveCompany(id) => {
                cache.companies.remove(&id).map_or(Self::noop(), Self::UpsertCompany)
            }
            Self::UpsertTeam(t) => {
                let id = t.id.clone();
                match cache.teams.insert(id.clone(), t) {
                    Some(old) => Self::UpsertTeam(old),
                    None => Self::RemoveTeam(id),
                }
            }
            Self::RemoveTeam(id) => cache.teams.remove(&id).map_or(Self::noop(), Self::UpsertTeam),
            Self::UpsertSite(s) => {
                let id = s.id.clone();
                match cache.sites.insert(id.clone(), s) {
                    Some(old) => Self::UpsertSite(old),
                    None => Self::RemoveSite(id),
                }
            }
            Self::RemoveSite(id) => cache.sites.remove(&id).map_or(Self::noop(), Self::UpsertSite),
            Self::UpsertWorker(w) => {
                let id = w.id.clone();
                match cache.workers.insert(id.clone(), w) {
                    Some(old) => Self::UpsertWorker(old),
                    None => Self::RemoveWorker(id),
                }
            }
            Self::RemoveWorker(id) => {
                cache.workers.remove(&id).map_or(Self::noop(), Self::UpsertWorker)
            }
            Self::PatchWorkers { ids, patch } => Self::Batch(
                cache.patch_workers(&ids, &patch).into_iter().map(Self::UpsertWorker).collect(),
            ),
            Self::Batch(commands) => {
                let mut inverses: Vec<_> = commands.into_iter().map(|c| c.apply(cache)).collect();
                inverses.reverse();
                Self::Batch(inverses)
            }
        }
    }

    pub fn noop() -> Self {
        Self::Batch(Vec::new())
    }
}

/// Apply `command` to the cache, then run `persist`. On failure the inverse
/// is replayed and the store error is returned unchanged.
pub async fn run_optimistic<T, F>(
    cache: &SharedCache,
    command: CacheCommand,
    persist: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let inverse = command.apply(&mut cache.write());
    match persist.await {
        Ok(value) => Ok(value),
        Err(err) => {
            warn!(error = %err, "write failed, reverting optimistic cache update");
            inverse.apply(&mut cache.write());
            Err(err)
        }
    }
}
