//! Periodic integrity reconciliation
//!
//! Runs scan + fix-all on a fixed interval so stale denormalized names get
//! repaired without an operator opening the integrity page. Disabled unless
//! `integrity.auto_reconcile_interval_secs` is set.

use std::sync::Arc;
use std::time::Duration;

use smartcon_core::IntegrityScanner;
use smartcon_domain::{FixReport, IntegrityConfig};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use super::error::{SchedulerError, SchedulerResult};

type TaskHandle = Arc<Mutex<Option<JoinHandle<()>>>>;

#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    pub interval: Duration,
    /// Upper bound for one scan + fix-all pass.
    pub run_timeout: Duration,
}

impl ReconcilerConfig {
    /// `None` when background reconciliation is disabled.
    pub fn from_integrity(config: &IntegrityConfig) -> Option<Self> {
        config.auto_reconcile_interval_secs.filter(|secs| *secs > 0).map(|secs| Self {
            interval: Duration::from_secs(secs),
            run_timeout: Duration::from_secs(300),
        })
    }
}

pub struct IntegrityReconciler {
    scanner: Arc<IntegrityScanner>,
    config: ReconcilerConfig,
    cancellation_token: CancellationToken,
    task_handle: TaskHandle,
}

impl IntegrityReconciler {
    pub fn new(scanner: Arc<IntegrityScanner>, config: ReconcilerConfig) -> Self {
        Self {
            scanner,
            config,
            cancellation_token: CancellationToken::new(),
            task_handle: Arc::new(Mutex::new(None)),
        }
    }

    #[instrument(skip(self), fields(interval_secs = self.config.interval.as_secs()))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        // fresh token so a stopped reconciler can be restarted
        self.cancellation_token = CancellationToken::new();

        let scanner = Arc::clone(&self.scanner);
        let config = self.config.clone();
        let cancel = self.cancellation_token.clone();
        let handle = tokio::spawn(async move {
            Self::reconcile_loop(scanner, config, cancel).await;
        });
        *self.task_handle.lock().await = Some(handle);

        info!("integrity reconciler started");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.is_running() {
            return Err(SchedulerError::NotRunning);
        }

        self.cancellation_token.cancel();

        if let Some(handle) = self.task_handle.lock().await.take() {
            let join_timeout = Duration::from_secs(5);
            tokio::time::timeout(join_timeout, handle)
                .await
                .map_err(|_| SchedulerError::Timeout { seconds: join_timeout.as_secs() })?
                .map_err(|e| SchedulerError::TaskJoinFailed(e.to_string()))?;
        }

        info!("integrity reconciler stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.task_handle
            .try_lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    /// One scan + fix-all pass, bounded by `run_timeout`.
    pub async fn run_once(&self) -> SchedulerResult<Option<FixReport>> {
        Self::reconcile(&self.scanner, &self.config).await
    }

    async fn reconcile_loop(
        scanner: Arc<IntegrityScanner>,
        config: ReconcilerConfig,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("reconcile loop cancelled");
                    break;
                }
                _ = tokio::time::sleep(config.interval) => {
                    if let Err(e) = Self::reconcile(&scanner, &config).await {
                        error!(error = %e, "integrity reconcile pass timed out");
                    }
                }
            }
        }
    }

    /// `Ok(None)` when the pass itself failed; the error is logged and the
    /// next tick tries again.
    async fn reconcile(
        scanner: &IntegrityScanner,
        config: &ReconcilerConfig,
    ) -> SchedulerResult<Option<FixReport>> {
        let result = tokio::time::timeout(config.run_timeout, scanner.fix_all())
            .await
            .map_err(|_| SchedulerError::Timeout { seconds: config.run_timeout.as_secs() })?;

        match result {
            Ok(report) => {
                if report.fixed > 0 || report.skipped > 0 {
                    info!(
                        fixed = report.fixed,
                        skipped = report.skipped,
                        batches = report.batches,
                        "integrity reconcile pass finished"
                    );
                } else {
                    debug!("integrity reconcile found nothing to fix");
                }
                Ok(Some(report))
            }
            Err(e) => {
                warn!(error = %e, "integrity reconcile pass failed");
                Ok(None)
            }
        }
    }
}
