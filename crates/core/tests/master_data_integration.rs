//! Master-data lifecycle, bulk edits and integrity repair.

mod support;

use std::collections::BTreeSet;

use smartcon_core::{
    BulkEditService, BulkField, BulkWorkerEdit, IntegrityScanner, MasterDataService,
};
use smartcon_domain::constants::{MAX_UNIT_PRICE, MSG_UNIT_PRICE_TOO_LARGE};
use smartcon_domain::{
    EntityRef, ReferenceField, SalaryModel, SiteStatus, SmartconError, TeamStatus, TeamType,
    WorkerStatus,
};
use support::{team, worker, Fixture};

fn seeded_workers(fixture: &Fixture, count: usize) -> Vec<String> {
    let crew = team("t-main", "시공1팀", TeamType::Construction, None);
    let workers: Vec<_> = (0..count)
        .map(|i| worker(&format!("w-{i:03}"), &format!("작업자{i:03}"), &crew, 150_000))
        .collect();
    let ids = workers.iter().map(|w| w.id.clone()).collect();
    fixture.workers.seed(workers);
    ids
}

#[tokio::test]
async fn retire_worker_clears_site_and_notifies() {
    let fixture = Fixture::seeded();
    let ids = seeded_workers(&fixture, 1);
    let service =
        MasterDataService::new(fixture.repos(), fixture.cache.clone(), fixture.events.clone());
    let mut events = fixture.events.subscribe();

    let mut assigned = service.get_worker(&ids[0]).await.unwrap();
    assigned.site = Some(EntityRef::new("s-a", "강남 현장"));
    service.update_worker(assigned).await.unwrap();
    events.recv().await.unwrap();

    let retired = service.retire_worker(&ids[0]).await.unwrap();
    assert_eq!(retired.status, WorkerStatus::Retired);
    assert!(retired.site.is_none());
    assert_eq!(fixture.workers.snapshot(&ids[0]).unwrap().status, WorkerStatus::Retired);
    assert!(events.recv().await.unwrap().workers);
}

#[tokio::test]
async fn soft_deletes_change_status_only() {
    let fixture = Fixture::seeded();
    let service =
        MasterDataService::new(fixture.repos(), fixture.cache.clone(), fixture.events.clone());

    assert_eq!(service.archive_site("s-a").await.unwrap().status, SiteStatus::Completed);
    assert_eq!(service.deactivate_team("t-main").await.unwrap().status, TeamStatus::Inactive);
    assert!(fixture.sites.snapshot("s-a").is_some());
}

#[tokio::test]
async fn delete_missing_company_is_not_found() {
    let fixture = Fixture::seeded();
    let service =
        MasterDataService::new(fixture.repos(), fixture.cache.clone(), fixture.events.clone());

    service.delete_company("c-partner").await.unwrap();
    assert!(fixture.companies.snapshot("c-partner").is_none());
    assert!(matches!(service.delete_company("c-partner").await, Err(SmartconError::NotFound(_))));
}

#[tokio::test]
async fn invalid_worker_update_is_rejected() {
    let fixture = Fixture::seeded();
    let ids = seeded_workers(&fixture, 1);
    let service =
        MasterDataService::new(fixture.repos(), fixture.cache.clone(), fixture.events.clone());

    let mut worker = service.get_worker(&ids[0]).await.unwrap();
    worker.id_number = "123".into();
    let err = service.update_worker(worker).await.unwrap_err();
    assert_eq!(
        err,
        SmartconError::Validation("주민등록번호 형식이 올바르지 않습니다 (######-#######)".into())
    );

    let mut worker = service.get_worker(&ids[0]).await.unwrap();
    worker.unit_price = 100_000_000_000_000_000;
    let err = service.update_worker(worker).await.unwrap_err();
    assert_eq!(err, SmartconError::Validation(MSG_UNIT_PRICE_TOO_LARGE.into()));
}

#[tokio::test]
async fn bulk_edit_writes_only_selected_fields() {
    let fixture = Fixture::seeded();
    let ids = seeded_workers(&fixture, 3);
    let service =
        BulkEditService::new(fixture.repos(), fixture.cache.clone(), fixture.events.clone());

    let edit = BulkWorkerEdit {
        fields: BTreeSet::from([BulkField::Site, BulkField::SalaryModel]),
        site_id: Some("s-b".into()),
        salary_model: Some(SalaryModel::Monthly),
        unit_price: Some(999),
        ..BulkWorkerEdit::default()
    };
    let result = service.apply(&ids[..2], &edit).await.unwrap();
    assert_eq!(result.updated, 2);
    assert_eq!(fixture.workers.batch_calls(), 1);

    let edited = fixture.workers.snapshot(&ids[0]).unwrap();
    assert_eq!(edited.site.as_ref().map(|s| s.name.as_str()), Some("판교 현장"));
    assert_eq!(edited.salary_model, SalaryModel::Monthly);
    assert_eq!(edited.unit_price, 150_000);

    let untouched = fixture.workers.snapshot(&ids[2]).unwrap();
    assert!(untouched.site.is_none());
}

#[tokio::test]
async fn bulk_edit_reverts_cache_on_failure() {
    let fixture = Fixture::seeded();
    let ids = seeded_workers(&fixture, 2);
    let master =
        MasterDataService::new(fixture.repos(), fixture.cache.clone(), fixture.events.clone());
    master.refresh_cache().await.unwrap();
    fixture.workers.fail_writes(true);

    let service =
        BulkEditService::new(fixture.repos(), fixture.cache.clone(), fixture.events.clone());
    let edit = BulkWorkerEdit {
        fields: BTreeSet::from([BulkField::Status]),
        status: Some(WorkerStatus::Retired),
        ..BulkWorkerEdit::default()
    };

    assert!(service.apply(&ids, &edit).await.is_err());
    let cache = fixture.cache.read();
    assert!(ids.iter().all(|id| cache.workers[id].status == WorkerStatus::Unassigned));
}

#[tokio::test]
async fn bulk_edit_rejects_unit_price_above_limit() {
    let fixture = Fixture::seeded();
    let ids = seeded_workers(&fixture, 1);
    let service =
        BulkEditService::new(fixture.repos(), fixture.cache.clone(), fixture.events.clone());
    let edit = BulkWorkerEdit {
        fields: BTreeSet::from([BulkField::UnitPrice]),
        unit_price: Some(MAX_UNIT_PRICE + 1),
        ..BulkWorkerEdit::default()
    };

    let err = service.apply(&ids, &edit).await.unwrap_err();
    assert_eq!(err, SmartconError::Validation(MSG_UNIT_PRICE_TOO_LARGE.into()));
    assert_eq!(fixture.workers.batch_calls(), 0);
}

#[tokio::test]
async fn bulk_edit_unknown_site_fails_before_writing() {
    let fixture = Fixture::seeded();
    let ids = seeded_workers(&fixture, 1);
    let service =
        BulkEditService::new(fixture.repos(), fixture.cache.clone(), fixture.events.clone());
    let edit = BulkWorkerEdit {
        fields: BTreeSet::from([BulkField::Site]),
        site_id: Some("s-missing".into()),
        ..BulkWorkerEdit::default()
    };

    assert!(matches!(service.apply(&ids, &edit).await, Err(SmartconError::NotFound(_))));
    assert_eq!(fixture.workers.batch_calls(), 0);
}

#[tokio::test]
async fn integrity_scan_flags_renamed_and_deleted_masters() {
    let fixture = Fixture::seeded();
    let ids = seeded_workers(&fixture, 2);

    // stale site name on the first worker, dangling team on the second
    let mut stale = fixture.workers.snapshot(&ids[0]).unwrap();
    stale.site = Some(EntityRef::new("s-a", "강남"));
    let mut dangling = fixture.workers.snapshot(&ids[1]).unwrap();
    dangling.team = Some(EntityRef::new("t-gone", "해체된 팀"));
    fixture.workers.seed([stale, dangling]);

    let scanner = IntegrityScanner::new(fixture.repos(), fixture.events.clone(), 500);
    let found = scanner.scan().await.unwrap();
    assert_eq!(found.len(), 2);

    let renamed = found.iter().find(|d| d.field == ReferenceField::Site).unwrap();
    assert!(renamed.master_exists);
    assert_eq!(renamed.master_name.as_deref(), Some("강남 현장"));

    let deleted = found.iter().find(|d| d.field == ReferenceField::Team).unwrap();
    assert!(!deleted.master_exists);
    assert!(matches!(scanner.fix_one(deleted).await, Err(SmartconError::InvalidInput(_))));

    assert!(scanner.fix_one(renamed).await.unwrap());
    let fixed = fixture.workers.snapshot(&ids[0]).unwrap();
    assert_eq!(fixed.site.unwrap().name, "강남 현장");
}

#[tokio::test]
async fn fix_one_writes_the_stored_master_name() {
    let fixture = Fixture::seeded();
    let ids = seeded_workers(&fixture, 1);
    let mut stale = fixture.workers.snapshot(&ids[0]).unwrap();
    stale.site = Some(EntityRef::new("s-a", "강남"));
    fixture.workers.seed([stale]);

    let scanner = IntegrityScanner::new(fixture.repos(), fixture.events.clone(), 500);
    let mut submitted = scanner.scan().await.unwrap().remove(0);
    submitted.master_name = Some("아무 이름".into());

    assert!(scanner.fix_one(&submitted).await.unwrap());
    let fixed = fixture.workers.snapshot(&ids[0]).unwrap();
    assert_eq!(fixed.site.unwrap().name, "강남 현장");

    // a deleted master cannot be revived by claiming it exists
    let mut gone = submitted.clone();
    gone.field = ReferenceField::Team;
    gone.referenced_id = "t-gone".into();
    gone.master_exists = true;
    assert!(matches!(scanner.fix_one(&gone).await, Err(SmartconError::InvalidInput(_))));
}

#[tokio::test]
async fn fix_all_batches_and_skips_deleted_masters() {
    let fixture = Fixture::seeded();
    let ids = seeded_workers(&fixture, 5);
    let mut workers: Vec<_> = ids.iter().map(|id| fixture.workers.snapshot(id).unwrap()).collect();
    for worker in &mut workers[..4] {
        worker.site = Some(EntityRef::new("s-b", "옛 판교"));
    }
    workers[4].company = Some(EntityRef::new("c-gone", "폐업"));
    fixture.workers.seed(workers);

    let scanner = IntegrityScanner::new(fixture.repos(), fixture.events.clone(), 2);
    let report = scanner.fix_all().await.unwrap();

    assert_eq!(report.fixed, 4);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.batches, 2);
    assert_eq!(fixture.workers.batch_calls(), 2);

    let remaining = scanner.scan().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert!(!remaining[0].master_exists);
}
