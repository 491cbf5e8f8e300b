//! Integration tests for the listing service routes.
//!
//! Each test builds the router over a seeded memory store (or a store double)
//! and drives it in-process.

mod helpers;

use axum::http::StatusCode;
use helpers::stores::{RecordingStore, UnreachableStore};
use helpers::TestHarness;
use serde_json::{json, Value};
use std::sync::Arc;

const NATIVE: &str = "64b7f0c2a1e4d3b2c1a09f8e";

fn catalog() -> Vec<Value> {
    vec![
        json!({ "id": "875", "name": "Armchair", "category": "Living", "condition": "Like New", "age_years": 3 }),
        json!({ "id": 42, "name": "Kettle", "category": "Kitchen", "condition": "New", "age_years": 1 }),
        json!({ "_id": NATIVE, "name": "Desk Lamp", "category": "Office", "condition": "Older", "age_years": 7 }),
        json!({ "id": "kt-2", "name": "Toaster", "category": "Kitchen", "condition": "Older", "age_years": 5 }),
    ]
}

// ---------------------------------------------------------------------------
// GET /api/gifts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_returns_every_gift_in_store_order() {
    let h = TestHarness::with_documents(catalog());
    let resp = h.get("/api/gifts").await;
    assert_eq!(resp.status, StatusCode::OK);

    let body = resp.json();
    let names: Vec<_> = body.as_array().unwrap().iter().map(|g| g["name"].clone()).collect();
    assert_eq!(names, vec!["Armchair", "Kettle", "Desk Lamp", "Toaster"]);
}

#[tokio::test]
async fn list_assigns_native_ids_to_seeded_documents() {
    let h = TestHarness::with_documents(catalog());
    let body = h.get("/api/gifts").await.json();
    for gift in body.as_array().unwrap() {
        assert_eq!(gift["_id"].as_str().map(str::len), Some(24), "missing _id: {gift}");
    }
}

#[tokio::test]
async fn list_store_failure_is_500_text() {
    let h = TestHarness::with_store(Arc::new(UnreachableStore));
    let resp = h.get("/api/gifts").await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.body, "Error fetching gifts");
}

// ---------------------------------------------------------------------------
// GET /api/gifts/{id}
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_by_string_id() {
    let h = TestHarness::with_documents(catalog());
    let resp = h.get("/api/gifts/875").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["name"], "Armchair");
}

#[tokio::test]
async fn string_match_skips_later_tiers() {
    let store = Arc::new(RecordingStore::new(catalog()));
    let h = TestHarness::with_store(store.clone());
    assert_eq!(h.get("/api/gifts/875").await.status, StatusCode::OK);
    assert_eq!(store.tiers(), vec!["string_id"]);
}

#[tokio::test]
async fn get_by_numeric_id() {
    let store = Arc::new(RecordingStore::new(catalog()));
    let h = TestHarness::with_store(store.clone());
    let resp = h.get("/api/gifts/42").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["name"], "Kettle");
    assert_eq!(store.tiers(), vec!["string_id", "numeric_id"]);
}

#[tokio::test]
async fn get_by_native_id() {
    let store = Arc::new(RecordingStore::new(catalog()));
    let h = TestHarness::with_store(store.clone());
    let resp = h.get(&format!("/api/gifts/{NATIVE}")).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["name"], "Desk Lamp");
    assert_eq!(store.tiers(), vec!["string_id", "native_id"]);
}

#[tokio::test]
async fn unknown_id_is_404_json() {
    let h = TestHarness::with_documents(catalog());
    for id in ["999", "nope", "ffffffffffffffffffffffff"] {
        let resp = h.get(&format!("/api/gifts/{id}")).await;
        assert_eq!(resp.status, StatusCode::NOT_FOUND, "id {id}");
        assert_eq!(resp.json(), json!({ "error": "Gift not found" }));
    }
}

#[tokio::test]
async fn lookup_store_failure_is_500_json() {
    let h = TestHarness::with_store(Arc::new(UnreachableStore));
    let resp = h.get("/api/gifts/875").await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.json(), json!({ "error": "Error fetching gift" }));
}

// ---------------------------------------------------------------------------
// POST /api/gifts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_then_fetch_by_assigned_id() {
    let h = TestHarness::with_documents(vec![]);
    let resp = h.post("/api/gifts", json!({ "name": "Lamp" })).await;
    assert_eq!(resp.status, StatusCode::CREATED);

    let created = resp.json();
    assert_eq!(created["name"], "Lamp");
    let id = created["_id"].as_str().expect("assigned _id").to_string();

    let fetched = h.get(&format!("/api/gifts/{id}")).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.json(), created);
}

#[tokio::test]
async fn create_keeps_arbitrary_fields() {
    let h = TestHarness::with_documents(vec![]);
    let body = json!({ "id": 7, "name": "Rug", "tags": ["wool"], "dims": { "w": 2 } });
    let created = h.post("/api/gifts", body).await.json();
    assert_eq!(created["tags"], json!(["wool"]));
    assert_eq!(created["dims"]["w"], 2);

    // Reachable through its numeric business id too.
    assert_eq!(h.get("/api/gifts/7").await.json()["name"], "Rug");
}

#[tokio::test]
async fn create_non_object_is_generic_500() {
    let h = TestHarness::with_documents(vec![]);
    let resp = h.post("/api/gifts", json!(["not", "a", "gift"])).await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.body, "Internal Server Error");
}

#[tokio::test]
async fn create_store_failure_is_500() {
    let h = TestHarness::with_store(Arc::new(UnreachableStore));
    let resp = h.post("/api/gifts", json!({ "name": "Lamp" })).await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
}

// ---------------------------------------------------------------------------
// GET /api/search
// ---------------------------------------------------------------------------

fn names(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .filter_map(|g| g["name"].as_str().map(str::to_string))
        .collect()
}

#[tokio::test]
async fn search_without_params_returns_everything() {
    let h = TestHarness::with_documents(catalog());
    let body = h.get("/api/search").await.json();
    assert_eq!(names(&body).len(), 4);
}

#[tokio::test]
async fn search_by_category() {
    let h = TestHarness::with_documents(catalog());
    let body = h.get("/api/search?category=Kitchen").await.json();
    assert_eq!(names(&body), vec!["Kettle", "Toaster"]);
}

#[tokio::test]
async fn search_by_age_ceiling() {
    let h = TestHarness::with_documents(catalog());
    let body = h.get("/api/search?age_years=3").await.json();
    assert_eq!(names(&body), vec!["Armchair", "Kettle"]);
}

#[tokio::test]
async fn search_name_is_case_insensitive() {
    let h = TestHarness::with_documents(catalog());
    let body = h.get("/api/search?name=LAMP").await.json();
    assert_eq!(names(&body), vec!["Desk Lamp"]);
}

#[tokio::test]
async fn search_combines_filters() {
    let h = TestHarness::with_documents(catalog());
    let body = h.get("/api/search?category=Kitchen&condition=Older&age_years=6").await.json();
    assert_eq!(names(&body), vec!["Toaster"]);
}

#[tokio::test]
async fn search_condition_with_space() {
    let h = TestHarness::with_documents(catalog());
    let body = h.get("/api/search?condition=Like%20New").await.json();
    assert_eq!(names(&body), vec!["Armchair"]);
}

#[tokio::test]
async fn search_very_long_name_still_filters() {
    let h = TestHarness::with_documents(catalog());
    let uri = format!("/api/search?name={}", "k".repeat(60_000));
    let resp = h.get(&uri).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(names(&resp.json()).is_empty());
}

#[tokio::test]
async fn search_non_numeric_age_is_400() {
    let h = TestHarness::with_documents(catalog());
    assert_eq!(h.get("/api/search?age_years=old").await.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_store_failure_is_500_text() {
    let h = TestHarness::with_store(Arc::new(UnreachableStore));
    let resp = h.get("/api/search?name=lamp").await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.body, "Error searching gifts");
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_count() {
    let h = TestHarness::with_documents(catalog());
    let resp = h.get("/health").await;
    assert_eq!(resp.status, StatusCode::OK);
    let body = resp.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["gifts"], 4);
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn health_degraded_when_store_down() {
    let h = TestHarness::with_store(Arc::new(UnreachableStore));
    let resp = h.get("/health").await;
    assert_eq!(resp.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(resp.json()["status"], "degraded");
}
