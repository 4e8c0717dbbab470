//! Integration tests of the HTTP surface: authentication, analysis,
//! history queries and mutations, batch upload, and export.

mod common;

use actix_web::{test, web, App};
use common::{test_oracle_config, ScriptedOracle};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

use textfold::config::AppConfig;
use textfold::ingestion::{IngestionPipeline, Oracle};
use textfold::server::{configure_routes, AppState};
use textfold::store::DbOperations;

fn test_state(dir: &TempDir, oracle: Arc<dyn Oracle>) -> web::Data<AppState> {
    let mut config = AppConfig::new(dir.path().to_path_buf());
    config.oracle = test_oracle_config();

    let db = Arc::new(DbOperations::open(dir.path()).unwrap());
    let pipeline = Arc::new(IngestionPipeline::new(
        Arc::clone(&db),
        oracle,
        config.oracle.clone(),
    ));

    web::Data::new(AppState {
        db,
        pipeline,
        config,
    })
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .configure(configure_routes),
        )
        .await
    };
}

async fn register_and_login<S>(app: &S, username: &str, email: &str) -> String
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "fullname": "Test User",
            "email": email,
            "username": username,
            "password": "hunter2"
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert!(resp.status().is_success(), "register failed: {}", resp.status());

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": "hunter2" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(app, req).await;
    assert_eq!(body["token_type"], "bearer");
    body["access_token"].as_str().unwrap().to_string()
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

#[actix_web::test]
async fn health_check_is_open() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, ScriptedOracle::always_good());
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "online");
}

#[actix_web::test]
async fn duplicate_registration_is_rejected() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, ScriptedOracle::always_good());
    let app = init_app!(state);

    register_and_login(&app, "alice", "a@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "fullname": "Someone Else",
            "email": "a@example.com",
            "username": "alice2",
            "password": "other"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn login_with_wrong_password_is_unauthorized() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, ScriptedOracle::always_good());
    let app = init_app!(state);

    register_and_login(&app, "alice", "a@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "a@example.com", "password": "wrong" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn analysis_requires_a_valid_token() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, ScriptedOracle::always_good());
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/analyze")
        .set_json(json!({ "text": "hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let req = test::TestRequest::post()
        .uri("/api/analyze")
        .insert_header(bearer("not-a-token"))
        .set_json(json!({ "text": "hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn analyze_persists_and_history_lists_newest_first() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, ScriptedOracle::always_good());
    let app = init_app!(state);
    let token = register_and_login(&app, "alice", "a@example.com").await;

    for text in ["first", "second"] {
        let req = test::TestRequest::post()
            .uri("/api/analyze")
            .insert_header(bearer(&token))
            .set_json(json!({ "text": text }))
            .to_request();
        let record: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(record["owner"], "alice");
        assert_eq!(record["sentiment"], "Positive");
        assert_eq!(record["text"], text);
    }

    let req = test::TestRequest::get()
        .uri("/api/analyze/history")
        .insert_header(bearer(&token))
        .to_request();
    let history: Value = test::call_and_read_body_json(&app, req).await;
    let records = history.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["num"], 2);
    assert_eq!(records[1]["num"], 1);
}

#[actix_web::test]
async fn oracle_failure_answers_with_a_server_error() {
    let dir = TempDir::new().unwrap();
    let state = test_state(
        &dir,
        ScriptedOracle::new(vec![Err("upstream unavailable".to_string())]),
    );
    let app = init_app!(state);
    let token = register_and_login(&app, "alice", "a@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/analyze")
        .insert_header(bearer(&token))
        .set_json(json!({ "text": "hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);

    let req = test::TestRequest::get()
        .uri("/api/analyze/history")
        .insert_header(bearer(&token))
        .to_request();
    let history: Value = test::call_and_read_body_json(&app, req).await;
    assert!(history.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn partial_update_changes_only_the_given_field() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, ScriptedOracle::always_good());
    let app = init_app!(state);
    let token = register_and_login(&app, "alice", "a@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/analyze")
        .insert_header(bearer(&token))
        .set_json(json!({ "text": "hello" }))
        .to_request();
    let record: Value = test::call_and_read_body_json(&app, req).await;
    let id = record["id"].as_str().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/analyze/history/{}", id))
        .insert_header(bearer(&token))
        .set_json(json!({ "priority": "Low" }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(updated["priority"], "Low");
    assert_eq!(updated["text"], record["text"]);
    assert_eq!(updated["sentiment"], record["sentiment"]);
    assert_eq!(updated["tags"], record["tags"]);
    assert_eq!(updated["num"], record["num"]);
    assert_eq!(updated["timestamp"], record["timestamp"]);
}

#[actix_web::test]
async fn empty_update_patch_is_a_bad_request() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, ScriptedOracle::always_good());
    let app = init_app!(state);
    let token = register_and_login(&app, "alice", "a@example.com").await;

    let req = test::TestRequest::put()
        .uri("/api/analyze/history/whatever")
        .insert_header(bearer(&token))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn foreign_records_answer_not_found_and_survive() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, ScriptedOracle::always_good());
    let app = init_app!(state);
    let alice = register_and_login(&app, "alice", "a@example.com").await;
    let mallory = register_and_login(&app, "mallory", "m@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/analyze")
        .insert_header(bearer(&alice))
        .set_json(json!({ "text": "private" }))
        .to_request();
    let record: Value = test::call_and_read_body_json(&app, req).await;
    let id = record["id"].as_str().unwrap();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/analyze/history/{}", id))
        .insert_header(bearer(&mallory))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let req = test::TestRequest::put()
        .uri(&format!("/api/analyze/history/{}", id))
        .insert_header(bearer(&mallory))
        .set_json(json!({ "priority": "Low" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    // the record is still there for its owner
    let req = test::TestRequest::get()
        .uri("/api/analyze/history")
        .insert_header(bearer(&alice))
        .to_request();
    let history: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn delete_removes_exactly_one_record() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, ScriptedOracle::always_good());
    let app = init_app!(state);
    let token = register_and_login(&app, "alice", "a@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/analyze")
        .insert_header(bearer(&token))
        .set_json(json!({ "text": "hello" }))
        .to_request();
    let record: Value = test::call_and_read_body_json(&app, req).await;
    let id = record["id"].as_str().unwrap();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/analyze/history/{}", id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let req = test::TestRequest::delete()
        .uri(&format!("/api/analyze/history/{}", id))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn batch_upload_creates_records_for_good_rows() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, ScriptedOracle::always_good());
    let app = init_app!(state);
    let token = register_and_login(&app, "alice", "a@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/analyze/batch")
        .insert_header(bearer(&token))
        .insert_header(("content-type", "text/csv"))
        .set_payload("text\nfirst row\nsecond row\n")
        .to_request();
    let records: Value = test::call_and_read_body_json(&app, req).await;

    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["text"], "first row");
    assert_eq!(records[1]["text"], "second row");
    assert_eq!(records[0]["num"], 1);
    assert_eq!(records[1]["num"], 2);
}

#[actix_web::test]
async fn header_only_batch_is_a_bad_request() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, ScriptedOracle::always_good());
    let app = init_app!(state);
    let token = register_and_login(&app, "alice", "a@example.com").await;

    let req = test::TestRequest::post()
        .uri("/api/analyze/batch")
        .insert_header(bearer(&token))
        .insert_header(("content-type", "text/csv"))
        .set_payload("text\n")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn export_returns_an_attachment_or_not_found() {
    let dir = TempDir::new().unwrap();
    let state = test_state(&dir, ScriptedOracle::always_good());
    let app = init_app!(state);
    let token = register_and_login(&app, "alice", "a@example.com").await;

    // no records yet
    let req = test::TestRequest::get()
        .uri("/api/analyze/export/excel")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let req = test::TestRequest::post()
        .uri("/api/analyze")
        .insert_header(bearer(&token))
        .set_json(json!({ "text": "hello" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/analyze/export/excel")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let disposition = resp
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.contains("attachment"));
    assert!(disposition.contains("analysis_export.xlsx"));

    let body = test::read_body(resp).await;
    assert_eq!(&body[0..2], b"PK");
}
