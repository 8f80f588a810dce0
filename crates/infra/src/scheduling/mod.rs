//! Background jobs

pub mod error;
pub mod reconciler;

pub use error::{SchedulerError, SchedulerResult};
pub use reconciler::{IntegrityReconciler, ReconcilerConfig};
