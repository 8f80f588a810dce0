//! Companies, teams, sites and workers

pub mod cache;
pub mod commands;
pub mod ports;
pub mod service;

pub use cache::{shared_cache, MasterDataCache, SharedCache};
pub use commands::{run_optimistic, CacheCommand};
pub use ports::{MasterRepository, WorkerRepository};
pub use service::{MasterDataService, MasterRepositories};
