//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use smartcon_core::{
    shared_cache, BulkEditService, DailyReportService, DashboardService, EventBus,
    IntegrityScanner, MasterDataService, PayrollConfigService, PayrollService,
    QuickRegisterService, SharedCache, TaxInvoiceGateway, TaxInvoiceService,
};
use smartcon_domain::{Config, Result};
use smartcon_infra::{
    master_repositories, DbManager, DisabledInvoiceGateway, IntegrityReconciler,
    InvoiceApiClient, ReconcilerConfig, SqliteAdvanceDeductionRepository,
    SqliteDailyReportRepository, SqliteInvoiceRecordRepository, SqlitePayrollConfigStore,
    XlsxSpreadsheetWriter,
};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::utils::health::{ComponentHealth, HealthStatus};

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub cache: SharedCache,
    pub events: EventBus,

    pub master_data: MasterDataService,
    pub quick_register: QuickRegisterService,
    pub bulk_edit: BulkEditService,
    pub reports: DailyReportService,
    pub payroll_config: Arc<PayrollConfigService>,
    pub payroll: PayrollService,
    pub integrity: Arc<IntegrityScanner>,
    pub dashboard: DashboardService,
    pub invoices: TaxInvoiceService,

    invoice_api_enabled: bool,
    reconciler: Option<Mutex<IntegrityReconciler>>,
}

impl AppContext {
    /// Open (and migrate) the configured database, then wire every service.
    pub fn new(config: Config) -> Result<Self> {
        let db = DbManager::open(&config.database)?;
        Self::with_database(config, db)
    }

    /// Wire services over an already opened database.
    pub fn with_database(config: Config, db: Arc<DbManager>) -> Result<Self> {
        let repos = master_repositories(&db);
        let cache = shared_cache();
        let events = EventBus::new();

        let reports_repo = Arc::new(SqliteDailyReportRepository::new(Arc::clone(&db)));
        let config_store = Arc::new(SqlitePayrollConfigStore::new(Arc::clone(&db)));
        let payroll_config = Arc::new(PayrollConfigService::new(config_store));

        let payroll = PayrollService::new(
            repos.clone(),
            reports_repo.clone(),
            Arc::new(SqliteAdvanceDeductionRepository::new(Arc::clone(&db))),
            Arc::clone(&payroll_config),
            Arc::new(XlsxSpreadsheetWriter::new()),
            config.export.output_dir.clone(),
        );

        let integrity = Arc::new(IntegrityScanner::new(
            repos.clone(),
            events.clone(),
            config.integrity.batch_size,
        ));

        let (gateway, invoice_api_enabled): (Arc<dyn TaxInvoiceGateway>, bool) =
            match InvoiceApiClient::from_config(&config.invoice_api)? {
                Some(client) => (Arc::new(client), true),
                None => {
                    info!("tax invoice API not configured; issuing is disabled");
                    (Arc::new(DisabledInvoiceGateway), false)
                }
            };
        let invoices = TaxInvoiceService::new(
            gateway,
            Arc::new(SqliteInvoiceRecordRepository::new(Arc::clone(&db))),
        );

        let reconciler = ReconcilerConfig::from_integrity(&config.integrity)
            .map(|rc| Mutex::new(IntegrityReconciler::new(Arc::clone(&integrity), rc)));

        Ok(Self {
            master_data: MasterDataService::new(repos.clone(), cache.clone(), events.clone()),
            quick_register: QuickRegisterService::new(
                repos.clone(),
                cache.clone(),
                events.clone(),
                config.registration.clone(),
            ),
            bulk_edit: BulkEditService::new(repos.clone(), cache.clone(), events.clone()),
            reports: DailyReportService::new(repos.clone(), reports_repo.clone()),
            dashboard: DashboardService::new(repos, reports_repo, cache.clone(), events.clone()),
            payroll_config,
            payroll,
            integrity,
            invoices,
            invoice_api_enabled,
            reconciler,
            config,
            db,
            cache,
            events,
        })
    }

    /// Prime the master-data cache and start the background reconciler.
    pub async fn start(&self) -> Result<()> {
        self.master_data.refresh_cache().await?;
        if let Err(err) = self.payroll_config.load().await {
            warn!(error = %err, "payroll settings could not be loaded at startup");
        }

        if let Some(reconciler) = &self.reconciler {
            reconciler.lock().await.start().await?;
        }
        Ok(())
    }

    pub async fn health_check(&self) -> HealthStatus {
        let mut status = HealthStatus::new();

        status = status.add_component(self.check_database_health().await);

        status = status.add_component(if self.invoice_api_enabled {
            ComponentHealth::healthy("invoice_api")
        } else {
            ComponentHealth::healthy_with_note("invoice_api", "disabled")
        });

        status = status.add_component(match &self.reconciler {
            None => ComponentHealth::healthy_with_note("reconciler", "disabled"),
            Some(reconciler) => match reconciler.try_lock() {
                Ok(guard) if !guard.is_running() => {
                    ComponentHealth::unhealthy("reconciler", "not running")
                }
                _ => ComponentHealth::healthy("reconciler"),
            },
        });

        status.calculate_score();
        status
    }

    /// Uses spawn_blocking so the pool checkout never stalls the runtime.
    async fn check_database_health(&self) -> ComponentHealth {
        let db = Arc::clone(&self.db);
        match tokio::task::spawn_blocking(move || db.health_check()).await {
            Ok(Ok(())) => ComponentHealth::healthy("database"),
            Ok(Err(err)) => ComponentHealth::unhealthy("database", err.to_string()),
            Err(err) => {
                ComponentHealth::unhealthy("database", format!("health task failed: {err}"))
            }
        }
    }

    /// Stop background work. Requests in flight are left to finish.
    pub async fn shutdown(&self) -> Result<()> {
        info!("shutdown called on AppContext");

        if let Some(reconciler) = &self.reconciler {
            let mut reconciler = reconciler.lock().await;
            if reconciler.is_running() {
                let stop = reconciler.stop();
                match tokio::time::timeout(Duration::from_secs(10), stop).await {
                    Ok(result) => result?,
                    Err(_) => warn!("reconciler did not stop within 10s"),
                }
            }
        }
        Ok(())
    }
}
