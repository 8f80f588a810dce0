//! SQLite repositories exercised end to end against a migrated database.

mod support;

use std::sync::Arc;
use std::time::Duration;

use smartcon_core::{
    AdvanceDeductionRepository, DailyReportRepository, EventBus, IntegrityScanner,
    InvoiceRecordRepository, MasterRepository, PayrollConfigService, PayrollConfigStore,
    WorkerRepository,
};
use smartcon_domain::{
    AdvanceDeduction, Company, CompanyType, DailyReport, EntityRef, InvoiceParty, InvoiceRecord,
    InvoiceStatus, PayrollConfig, ReferenceField, ReferenceFix, ReportWorkerEntry, SalaryModel,
    Site, SmartconError, Team, Worker, WorkerPatch, WorkerStatus,
};
use smartcon_infra::{
    master_repositories, IntegrityReconciler, ReconcilerConfig, SqliteAdvanceDeductionRepository,
    SqliteDailyReportRepository, SqliteDocumentRepository, SqliteInvoiceRecordRepository,
    SqlitePayrollConfigStore,
};
use support::{company, date, site, team, worker, TestDatabase};

fn entry(id: &str, name: &str, man_day: f64) -> ReportWorkerEntry {
    ReportWorkerEntry {
        worker_id: id.into(),
        name: name.into(),
        man_day,
        unit_price: 150_000,
        salary_model: SalaryModel::Daily,
    }
}

fn report(id: &str, day: u32, team_id: &str, site_id: &str) -> DailyReport {
    DailyReport::new(
        id.into(),
        date(2024, 6, day),
        EntityRef::new(team_id, "팀"),
        EntityRef::new(site_id, "현장"),
        vec![entry("w-1", "가나다", 1.0), entry("w-2", "라마바", 0.5)],
    )
    .unwrap()
}

#[tokio::test]
async fn master_documents_round_trip_in_name_order() {
    let db = TestDatabase::new();
    let companies: SqliteDocumentRepository<Company> =
        SqliteDocumentRepository::new(db.manager.clone());

    companies.create(&company("c-2", "한빛", CompanyType::Partner)).await.unwrap();
    companies.create(&company("c-1", "대한", CompanyType::Partner)).await.unwrap();

    let names: Vec<String> = companies.list().await.unwrap().into_iter().map(|c| c.name).collect();
    assert_eq!(names, ["대한", "한빛"]);

    let mut stored = companies.get("c-2").await.unwrap().unwrap();
    assert_eq!(stored.company_type, CompanyType::Partner);
    stored.name = "가온".into();
    companies.update(&stored).await.unwrap();
    assert_eq!(companies.list().await.unwrap()[0].name, "가온");

    assert!(companies.delete("c-2").await.unwrap());
    assert!(!companies.delete("c-2").await.unwrap());
    assert!(companies.get("c-2").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_create_conflicts_and_missing_update_is_not_found() {
    let db = TestDatabase::new();
    let sites: SqliteDocumentRepository<Site> = SqliteDocumentRepository::new(db.manager.clone());

    sites.create(&site("s-a", "강남 현장")).await.unwrap();
    let err = sites.create(&site("s-a", "강남 현장")).await.unwrap_err();
    assert!(matches!(err, SmartconError::Conflict(_)));

    let err = sites.update(&site("s-missing", "없음")).await.unwrap_err();
    assert!(matches!(err, SmartconError::NotFound(_)));
}

#[tokio::test]
async fn collections_do_not_share_ids() {
    let db = TestDatabase::new();
    let repos = master_repositories(&db.manager);

    repos.teams.create(&team("x-1", "시공1팀", None)).await.unwrap();
    repos.sites.create(&site("x-1", "강남 현장")).await.unwrap();

    assert_eq!(repos.teams.list().await.unwrap().len(), 1);
    assert_eq!(repos.sites.get("x-1").await.unwrap().unwrap().name, "강남 현장");
}

#[tokio::test]
async fn update_many_patches_only_listed_workers() {
    let db = TestDatabase::new();
    let workers: SqliteDocumentRepository<Worker> =
        SqliteDocumentRepository::new(db.manager.clone());
    let crew = team("t-main", "시공1팀", Some(("c-main", "청연")));
    for (id, name) in [("w-1", "가나다"), ("w-2", "라마바"), ("w-3", "사아자")] {
        workers.create(&worker(id, name, &crew)).await.unwrap();
    }

    let patch = WorkerPatch {
        site: Some(Some(EntityRef::new("s-b", "판교 현장"))),
        status: Some(WorkerStatus::Employed),
        ..WorkerPatch::default()
    };
    let ids = ["w-1".to_string(), "w-3".to_string(), "w-gone".to_string()];
    assert_eq!(workers.update_many(&ids, &patch).await.unwrap(), 2);

    let patched = workers.get("w-1").await.unwrap().unwrap();
    assert_eq!(patched.site.clone().map(|s| s.name), Some("판교 현장".to_string()));
    assert_eq!(patched.status, WorkerStatus::Employed);
    assert_eq!(patched.team_id(), Some("t-main"));

    let untouched = workers.get("w-2").await.unwrap().unwrap();
    assert!(untouched.site.is_none());
    assert_eq!(untouched.status, WorkerStatus::Unassigned);
}

#[tokio::test]
async fn reference_fixes_are_guarded_by_the_referenced_id() {
    let db = TestDatabase::new();
    let workers: SqliteDocumentRepository<Worker> =
        SqliteDocumentRepository::new(db.manager.clone());
    let old = Team { name: "옛이름".into(), ..team("t-main", "시공1팀", None) };
    workers.create(&worker("w-1", "가나다", &old)).await.unwrap();
    let moved = Team { id: "t-other".into(), ..old.clone() };
    workers.create(&worker("w-2", "라마바", &moved)).await.unwrap();

    let fix = |worker_id: &str| ReferenceFix {
        worker_id: worker_id.into(),
        field: ReferenceField::Team,
        referenced_id: "t-main".into(),
        name: "시공1팀".into(),
    };
    assert_eq!(workers.set_reference_names(&[fix("w-1"), fix("w-2")]).await.unwrap(), 1);

    assert_eq!(workers.get("w-1").await.unwrap().unwrap().team.unwrap().name, "시공1팀");
    assert_eq!(workers.get("w-2").await.unwrap().unwrap().team.unwrap().name, "옛이름");
}

#[tokio::test]
async fn replacing_a_date_drops_the_previous_save() {
    let db = TestDatabase::new();
    let reports = SqliteDailyReportRepository::new(db.manager.clone());

    let first = [report("r-1", 3, "t-main", "s-a"), report("r-2", 3, "t-b", "s-b")];
    reports.replace_for_date(date(2024, 6, 3), &first).await.unwrap();
    let second = [report("r-3", 3, "t-main", "s-b")];
    let saved = reports.replace_for_date(date(2024, 6, 3), &second).await.unwrap();
    assert_eq!(saved, 1);

    let stored = reports.reports_for_date(date(2024, 6, 3)).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, "r-3");
    assert_eq!(stored[0].workers.len(), 2);
    assert!((stored[0].total_man_day - 1.5).abs() < 1e-9);
    assert_eq!(stored[0].total_amount, 225_000);
}

#[tokio::test]
async fn replacing_with_a_report_for_another_day_is_rejected() {
    let db = TestDatabase::new();
    let reports = SqliteDailyReportRepository::new(db.manager.clone());
    let saved = [report("r-1", 3, "t-main", "s-a")];
    reports.replace_for_date(date(2024, 6, 3), &saved).await.unwrap();

    let err = reports
        .replace_for_date(date(2024, 6, 3), &[report("r-2", 4, "t-main", "s-a")])
        .await
        .unwrap_err();
    assert!(matches!(err, SmartconError::InvalidInput(_)));
    assert_eq!(reports.reports_for_date(date(2024, 6, 3)).await.unwrap()[0].id, "r-1");
}

#[tokio::test]
async fn range_and_latest_date_queries() {
    let db = TestDatabase::new();
    let reports = SqliteDailyReportRepository::new(db.manager.clone());
    let history =
        [("r-1", 1, "t-main"), ("r-2", 3, "t-main"), ("r-3", 4, "t-b"), ("r-4", 7, "t-main")];
    for (id, day, team_id) in history {
        let saved = [report(id, day, team_id, "s-a")];
        reports.replace_for_date(date(2024, 6, day), &saved).await.unwrap();
    }

    let in_range = reports.reports_in_range(date(2024, 6, 2), date(2024, 6, 4)).await.unwrap();
    let ids: Vec<&str> = in_range.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&"r-2") && ids.contains(&"r-3"));

    assert_eq!(
        reports.latest_date_before("t-main", date(2024, 6, 7)).await.unwrap(),
        Some(date(2024, 6, 3))
    );
    assert_eq!(reports.latest_date_before("t-main", date(2024, 6, 1)).await.unwrap(), None);
    assert_eq!(reports.latest_date_before("t-none", date(2024, 6, 30)).await.unwrap(), None);

    let team_day = reports.team_reports_for_date("t-b", date(2024, 6, 4)).await.unwrap();
    assert_eq!(team_day.len(), 1);
    assert!(reports.team_reports_for_date("t-main", date(2024, 6, 4)).await.unwrap().is_empty());
}

#[tokio::test]
async fn payroll_settings_survive_the_verified_save() {
    let db = TestDatabase::new();
    let store = Arc::new(SqlitePayrollConfigStore::new(db.manager.clone()));
    assert_eq!(store.load().await.unwrap(), None);

    let service = PayrollConfigService::new(store.clone());
    assert_eq!(service.load().await.unwrap(), PayrollConfig::default());

    let config = PayrollConfig {
        split_reporting: true,
        split_threshold_days: 10.0,
        ..PayrollConfig::default()
    };
    service.save(config.clone()).await.unwrap();
    assert_eq!(store.load().await.unwrap(), Some(config.clone()));

    let updated = PayrollConfig { insurance_mode: true, ..config };
    store.save(&updated).await.unwrap();
    assert_eq!(store.load().await.unwrap(), Some(updated));
}

#[tokio::test]
async fn deductions_are_filtered_by_inclusive_range() {
    let db = TestDatabase::new();
    let deductions = SqliteAdvanceDeductionRepository::new(db.manager.clone());
    for (id, day, amount) in [("d-1", 1, 10_000), ("d-2", 15, 20_000), ("d-3", 30, 30_000)] {
        deductions
            .save(&AdvanceDeduction {
                id: id.into(),
                worker_id: "w-1".into(),
                date: date(2024, 4, day),
                item_key: "advance".into(),
                amount,
            })
            .await
            .unwrap();
    }

    let found = deductions.in_range(date(2024, 4, 1), date(2024, 4, 15)).await.unwrap();
    assert_eq!(found.iter().map(|d| d.amount).sum::<i64>(), 30_000);

    // saving an existing id overwrites it
    let mut first = found.into_iter().find(|d| d.id == "d-1").unwrap();
    first.amount = 5_000;
    deductions.save(&first).await.unwrap();
    let found = deductions.in_range(date(2024, 4, 1), date(2024, 4, 30)).await.unwrap();
    assert_eq!(found.len(), 3);
    assert_eq!(found.iter().map(|d| d.amount).sum::<i64>(), 55_000);

    assert!(deductions.delete("d-3").await.unwrap());
    assert!(!deductions.delete("d-3").await.unwrap());
}

#[tokio::test]
async fn invoices_list_newest_first() {
    let db = TestDatabase::new();
    let invoices = SqliteInvoiceRecordRepository::new(db.manager.clone());
    let party = InvoiceParty {
        business_number: "1234567890".into(),
        company_name: "청연".into(),
        ceo_name: "김철수".into(),
        address: None,
        email: None,
    };
    for (id, issued_at) in [("i-1", 100), ("i-2", 300), ("i-3", 200)] {
        invoices
            .save(&InvoiceRecord {
                id: id.into(),
                approval_number: format!("2024-{id}"),
                write_date: "20240731".into(),
                supplier: party.clone(),
                buyer: party.clone(),
                items: Vec::new(),
                total_supply_cost: 1_000_000,
                total_tax: 100_000,
                status: InvoiceStatus::Issued,
                issued_at,
            })
            .await
            .unwrap();
    }

    let ids: Vec<String> = invoices.list().await.unwrap().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, ["i-2", "i-3", "i-1"]);
}

#[tokio::test]
async fn reconciler_pass_repairs_renamed_references() {
    let db = TestDatabase::new();
    let repos = master_repositories(&db.manager);
    repos.sites.create(&site("s-a", "강남 현장")).await.unwrap();
    let crew = team("t-main", "시공1팀", None);
    repos.teams.create(&crew).await.unwrap();

    let mut stale = worker("w-1", "가나다", &crew);
    stale.site = Some(EntityRef::new("s-a", "강남"));
    repos.workers.create(&stale).await.unwrap();
    let mut dangling = worker("w-2", "라마바", &crew);
    dangling.site = Some(EntityRef::new("s-gone", "철거 현장"));
    repos.workers.create(&dangling).await.unwrap();

    let scanner = Arc::new(IntegrityScanner::new(repos.clone(), EventBus::new(), 500));
    assert_eq!(scanner.scan().await.unwrap().len(), 2);

    let reconciler = IntegrityReconciler::new(
        scanner.clone(),
        ReconcilerConfig {
            interval: Duration::from_secs(3600),
            run_timeout: Duration::from_secs(30),
        },
    );
    let report = reconciler.run_once().await.unwrap().expect("pass completes");
    assert_eq!((report.fixed, report.skipped), (1, 1));

    let fixed = repos.workers.get("w-1").await.unwrap().unwrap();
    assert_eq!(fixed.site.unwrap().name, "강남 현장");
    let remaining = scanner.scan().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert!(!remaining[0].master_exists);
}

#[tokio::test]
async fn reconciler_start_and_stop() {
    let db = TestDatabase::new();
    let repos = master_repositories(&db.manager);
    let scanner = Arc::new(IntegrityScanner::new(repos, EventBus::new(), 500));
    let mut reconciler = IntegrityReconciler::new(
        scanner,
        ReconcilerConfig {
            interval: Duration::from_millis(20),
            run_timeout: Duration::from_secs(5),
        },
    );

    reconciler.start().await.unwrap();
    assert!(reconciler.is_running());
    assert!(reconciler.start().await.is_err());

    tokio::time::sleep(Duration::from_millis(60)).await;
    reconciler.stop().await.unwrap();
    assert!(!reconciler.is_running());
    assert!(reconciler.stop().await.is_err());
}
