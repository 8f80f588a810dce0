//! Port interfaces for master-data collections
//!
//! The store is a plain document database: no joins, no cross-document
//! transactions. Multi-document writes are independent calls.

use async_trait::async_trait;
use smartcon_domain::{MasterRecord, ReferenceFix, Result, Worker, WorkerPatch};

/// CRUD over one master collection.
#[async_trait]
pub trait MasterRepository<T: MasterRecord>: Send + Sync {
    /// All documents, ordered by name.
    async fn list(&self) -> Result<Vec<T>>;

    /// Document by id, `None` when absent.
    async fn get(&self, id: &str) -> Result<Option<T>>;

    /// Insert a new document. Fails with `Conflict` when the id exists.
    async fn create(&self, record: &T) -> Result<()>;

    /// Replace an existing document. Fails with `NotFound` when absent.
    async fn update(&self, record: &T) -> Result<()>;

    /// Hard delete. Returns whether a document was removed.
    async fn delete(&self, id: &str) -> Result<bool>;
}

/// Worker-specific batch writes.
#[async_trait]
pub trait WorkerRepository: MasterRepository<Worker> {
    /// Apply the same partial update to every listed worker in one batch.
    ///
    /// Returns the number of workers updated; unknown ids are skipped.
    async fn update_many(&self, ids: &[String], patch: &WorkerPatch) -> Result<usize>;

    /// Overwrite denormalized reference names in one batch.
    ///
    /// A fix is skipped when the worker no longer references
    /// `fix.referenced_id`. Returns the number of fixes applied.
    async fn set_reference_names(&self, fixes: &[ReferenceFix]) -> Result<usize>;
}
