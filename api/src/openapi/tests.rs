use super::{create_combined_api, API_BASE_PATH};
use crate::database::test_helpers::setup_test_db;
use crate::database::Database;
use poem::http::StatusCode;
use poem::test::TestClient;
use poem::{Endpoint, EndpointExt, Route};
use poem_openapi::OpenApiService;
use serde_json::json;
use std::sync::Arc;

async fn client() -> TestClient<impl Endpoint> {
    client_for(setup_test_db().await)
}

fn client_for(db: Database) -> TestClient<impl Endpoint> {
    let api = OpenApiService::new(create_combined_api(), "Computer Database API", "test");
    TestClient::new(Route::new().nest(API_BASE_PATH, api).data(Arc::new(db)))
}

async fn post_company(cli: &TestClient<impl Endpoint>, name: &str) -> i64 {
    let resp = cli
        .post("/api/companies")
        .body_json(&json!({ "name": name }))
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);
    resp.json().await.value().object().get("data").object().get("id").i64()
}

#[tokio::test]
async fn test_health() {
    let cli = client().await;
    let resp = cli.get("/api/health").send().await;
    resp.assert_status_is_ok();
    let body = resp.json().await;
    body.value().object().get("success").assert_bool(true);
    body.value().object().get("database").assert_string("ok");
}

#[tokio::test]
async fn test_health_reports_unreachable_database() {
    let db = setup_test_db().await;
    db.pool.close().await;
    let cli = client_for(db);

    let resp = cli.get("/api/health").send().await;
    resp.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body = resp.json().await;
    body.value().object().get("success").assert_bool(false);
    body.value().object().get("database").assert_string("unavailable");
}

#[tokio::test]
async fn test_create_and_filter_computers() {
    let cli = client().await;
    let company_id = post_company(&cli, "Apple Inc.").await;

    let resp = cli
        .post("/api/computers")
        .body_json(&json!({
            "name": "AAAAAAAAAA",
            "hardware": 0,
            "software": 0,
            "introduced": "1970-01-01",
            "company": { "id": company_id, "name": "" }
        }))
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);
    let location = resp
        .0
        .headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap();
    let created_id = resp.json().await.value().object().get("data").object().get("id").i64();
    assert_eq!(location, format!("/api/computers/{}", created_id));

    let resp = cli
        .get("/api/computers")
        .query("name.contains", &"AAAA")
        .query("companyId.equals", &company_id)
        .send()
        .await;
    resp.assert_status_is_ok();
    resp.assert_header("X-Total-Count", "1");
    let body = resp.json().await;
    let data = body.value().object().get("data").object_array();
    assert_eq!(data.len(), 1);
    data[0].get("company").object().get("name").assert_string("Apple Inc.");

    let resp = cli
        .get("/api/computers/count")
        .query("name.doesNotContain", &"AAAA")
        .send()
        .await;
    resp.assert_status_is_ok();
    resp.json().await.value().object().get("data").assert_i64(0);

    let resp = cli
        .get("/api/computers/count")
        .query("hardware.lessThan", &1)
        .send()
        .await;
    resp.json().await.value().object().get("data").assert_i64(1);
}

#[tokio::test]
async fn test_list_rejects_bad_parameters() {
    let cli = client().await;

    let resp = cli
        .get("/api/computers")
        .query("colour.equals", &"beige")
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);

    let resp = cli.get("/api/computers").query("sort", &"secret,asc").send().await;
    resp.assert_status(StatusCode::BAD_REQUEST);

    let resp = cli
        .get("/api/companies/count")
        .query("name.greaterThan", &"A")
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_pagination_headers() {
    let cli = client().await;
    for name in ["Acorn", "Atari", "Commodore", "Sinclair", "Tandy"] {
        post_company(&cli, name).await;
    }

    let resp = cli
        .get("/api/companies")
        .query("page", &1)
        .query("size", &2)
        .query("sort", &"name,asc")
        .send()
        .await;
    resp.assert_status_is_ok();
    resp.assert_header("X-Total-Count", "5");
    let link = resp
        .0
        .headers()
        .get("Link")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap();
    assert!(link.starts_with("</api/companies?"));
    assert!(link.contains("page=2&size=2>; rel=\"next\""));
    assert!(link.contains("page=0&size=2>; rel=\"prev\""));

    let body = resp.json().await;
    let names = body.value().object().get("data").object_array();
    names[0].get("name").assert_string("Commodore");
    names[1].get("name").assert_string("Sinclair");
}

#[tokio::test]
async fn test_create_rejects_id_and_invalid_fields() {
    let cli = client().await;

    let resp = cli
        .post("/api/computers")
        .body_json(&json!({ "id": 1, "name": "Has id" }))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);

    let resp = cli
        .post("/api/computers")
        .body_json(&json!({ "name": "Too much", "hardware": 41 }))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);

    let resp = cli
        .post("/api/computers")
        .body_json(&json!({ "name": "Orphan", "company": { "id": 404, "name": "" } }))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_id_checks() {
    let cli = client().await;
    let id = post_company(&cli, "Osborne").await;

    let resp = cli
        .put(format!("/api/companies/{}", id))
        .body_json(&json!({ "name": "No id" }))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);

    let resp = cli
        .put(format!("/api/companies/{}", id))
        .body_json(&json!({ "id": id + 1, "name": "Wrong id" }))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);

    let resp = cli
        .put(format!("/api/companies/{}", id + 1))
        .body_json(&json!({ "id": id + 1, "name": "Missing" }))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);

    let resp = cli
        .put(format!("/api/companies/{}", id))
        .body_json(&json!({ "id": id, "name": "Osborne Computer" }))
        .send()
        .await;
    resp.assert_status_is_ok();
    resp.json()
        .await
        .value()
        .object()
        .get("data")
        .object()
        .get("name")
        .assert_string("Osborne Computer");
}

#[tokio::test]
async fn test_patch_get_and_delete_computer() {
    let cli = client().await;
    let resp = cli
        .post("/api/computers")
        .body_json(&json!({ "name": "Kaypro II", "hardware": 4 }))
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);
    let id = resp.json().await.value().object().get("data").object().get("id").i64();

    let resp = cli
        .patch(format!("/api/computers/{}", id))
        .body_json(&json!({ "id": id, "software": 9 }))
        .send()
        .await;
    resp.assert_status_is_ok();
    let body = resp.json().await;
    let data = body.value().object().get("data").object();
    data.get("hardware").assert_i64(4);
    data.get("software").assert_i64(9);
    data.get("name").assert_string("Kaypro II");

    let resp = cli.delete(format!("/api/computers/{}", id)).send().await;
    resp.assert_status(StatusCode::NO_CONTENT);

    let resp = cli.get(format!("/api/computers/{}", id)).send().await;
    resp.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_computer_references_company_by_id_only() {
    let cli = client().await;
    let company_id = post_company(&cli, "Apple Inc.").await;

    let resp = cli
        .post("/api/computers")
        .body_json(&json!({ "name": "Apple II", "company": { "id": company_id } }))
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);
    let body = resp.json().await;
    let company = body.value().object().get("data").object().get("company").object();
    company.get("id").assert_i64(company_id);
    company.get("name").assert_string("Apple Inc.");
}

#[tokio::test]
async fn test_list_beyond_last_page() {
    let cli = client().await;
    post_company(&cli, "Acorn").await;

    let resp = cli
        .get("/api/companies")
        .query("page", &u32::MAX)
        .send()
        .await;
    resp.assert_status_is_ok();
    resp.assert_header("X-Total-Count", "1");
    let link = resp
        .0
        .headers()
        .get("Link")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap();
    assert!(!link.contains("rel=\"next\""));
    resp.json().await.value().object().get("data").array().assert_len(0);
}
