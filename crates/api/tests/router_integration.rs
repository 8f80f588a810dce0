//! End-to-end requests through the axum router over a temporary database.

mod support;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use support::{setup_test_app, TestApp};
use tower::ServiceExt;

async fn register(app: &TestApp, form: Value) -> Value {
    let (status, body) = app.post("/quick-register", form).await;
    assert_eq!(status, StatusCode::OK, "register failed: {body}");
    body
}

/// 청연 (the default construction company), one 시공팀, one site and one
/// daily worker in that team. Returns (team_id, site_id, worker_id).
async fn seed_construction_crew(app: &TestApp) -> (String, String, String) {
    register(app, json!({ "kind": "construction_company", "name": "청연", "ceo_name": "김대표" }))
        .await;
    let team = register(app, json!({ "kind": "team", "name": "철근1팀", "team_type": "시공팀" }))
        .await;
    let team_id = team["team"]["id"].as_str().expect("team id").to_string();

    let site = register(app, json!({ "kind": "site", "name": "판교 현장", "status": "active" }))
        .await;
    let site_id = site["site"]["id"].as_str().expect("site id").to_string();

    let worker = register(
        app,
        json!({
            "kind": "worker",
            "name": "홍길동",
            "id_number": "800101-1234567",
            "team_type": "시공팀",
            "team_id": team_id,
            "salary_model": "일급제",
            "unit_price": 150000
        }),
    )
    .await;
    let worker_id = worker["worker"]["id"].as_str().expect("worker id").to_string();
    assert_eq!(worker["worker"]["company"]["name"], "청연");

    (team_id, site_id, worker_id)
}

#[tokio::test]
async fn health_reports_ok_with_optional_parts_disabled() {
    let app = setup_test_app().await;

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_healthy"], true);
    let names: Vec<&str> = body["components"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["database", "invoice_api", "reconciler"]);
}

#[tokio::test]
async fn partner_company_registration_creates_default_team() {
    let app = setup_test_app().await;

    let outcome = register(
        &app,
        json!({ "kind": "partner_company", "name": "대한건설", "ceo_name": "박영수" }),
    )
    .await;
    assert_eq!(outcome["changed"]["companies"], true);
    assert_eq!(outcome["changed"]["teams"], true);

    let (_, companies) = app.get("/companies").await;
    assert_eq!(companies.as_array().unwrap().len(), 1);
    assert_eq!(companies[0]["name"], "대한건설");

    let (_, teams) = app.get("/teams").await;
    assert_eq!(teams.as_array().unwrap().len(), 1);
    assert_eq!(teams[0]["team_type"], "지원팀");
    assert_eq!(teams[0]["company"]["id"], companies[0]["id"]);
}

#[tokio::test]
async fn partner_company_without_ceo_is_rejected() {
    let app = setup_test_app().await;

    let (status, body) =
        app.post("/quick-register", json!({ "kind": "partner_company", "name": "대한건설" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "type": "validation", "message": "대표자명을 입력해주세요" }));

    let (_, companies) = app.get("/companies").await;
    assert!(companies.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_worker_is_not_found() {
    let app = setup_test_app().await;

    let (status, body) = app.get("/workers/missing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["type"], "not_found");
}

#[tokio::test]
async fn saved_assignments_feed_the_team_invoice() {
    let app = setup_test_app().await;
    let (team_id, site_id, worker_id) = seed_construction_crew(&app).await;

    let assignment = json!({ "worker_id": worker_id, "site_id": site_id, "man_day": 1.0 });
    let (status, saved) =
        app.put("/reports/2024-06-03", json!({ "assignments": [assignment] })).await;
    assert_eq!(status, StatusCode::OK, "{saved}");
    assert_eq!(saved.as_array().unwrap().len(), 1);

    let (_, reports) = app.get("/reports/2024-06-03").await;
    assert_eq!(reports[0]["team"]["id"], team_id.as_str());
    assert_eq!(reports[0]["site"]["id"], site_id.as_str());
    assert_eq!(reports[0]["total_amount"], 150000);

    let (status, invoice) = app
        .get(&format!("/payroll/teams/{team_id}/invoice?start=2024-06-01&end=2024-06-30"))
        .await;
    assert_eq!(status, StatusCode::OK, "{invoice}");
    assert_eq!(invoice["lines"].as_array().unwrap().len(), 1);
    assert_eq!(invoice["lines"][0]["worker_id"], worker_id.as_str());
    assert_eq!(invoice["totals"]["gross"], 150000);
    assert_eq!(invoice["totals"]["man_days"], 1.0);
}

#[tokio::test]
async fn copy_previous_day_places_workers_without_saving() {
    let app = setup_test_app().await;
    let (team_id, site_id, worker_id) = seed_construction_crew(&app).await;
    let assignment = json!({ "worker_id": worker_id, "site_id": site_id, "man_day": 1.0 });
    app.put("/reports/2024-06-03", json!({ "assignments": [assignment] })).await;

    let (status, body) =
        app.post("/reports/2024-06-04/copy-previous", json!({ "team_ids": [team_id] })).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["placed"], 1);
    let (_, reports) = app.get("/reports/2024-06-04").await;
    assert!(reports.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn payroll_config_rejects_out_of_range_rates() {
    let app = setup_test_app().await;

    let (status, body) = app.put("/payroll/config", json!({ "tax_rate": 150.0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "요율은 0에서 100 사이여야 합니다");

    let (status, saved) =
        app.put("/payroll/config", json!({ "tax_rate": 3.3, "insurance_mode": true })).await;
    assert_eq!(status, StatusCode::OK, "{saved}");

    let (_, loaded) = app.get("/payroll/config").await;
    assert_eq!(loaded["insurance_mode"], true);
    assert_eq!(loaded["tax_rate"], 3.3);
}

#[tokio::test]
async fn invoice_issue_without_api_is_a_config_error() {
    let app = setup_test_app().await;
    let party = |name: &str, number: &str| {
        json!({ "business_number": number, "company_name": name, "ceo_name": "대표" })
    };

    let (status, body) = app
        .post(
            "/invoices",
            json!({
                "write_date": "2024-07-31",
                "supplier": party("청연", "123-45-67890"),
                "buyer": party("대한건설", "987-65-43210"),
                "items": [{
                    "serial": 1,
                    "name": "7월 인건비",
                    "quantity": 1,
                    "unit_cost": 4500000,
                    "supply_cost": 4500000,
                    "tax": 450000
                }]
            }),
        )
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["type"], "config");
    let (_, records) = app.get("/invoices").await;
    assert!(records.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn integrity_scan_of_consistent_data_is_empty() {
    let app = setup_test_app().await;
    seed_construction_crew(&app).await;

    let (status, body) = app.get("/integrity/scan").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn events_stream_is_server_sent() {
    let app = setup_test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(Request::get("/events").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "text/event-stream");
}

#[tokio::test]
async fn malformed_date_in_path_is_a_bad_request() {
    let app = setup_test_app().await;

    let (status, _) = app.get("/reports/2024-13-45").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
