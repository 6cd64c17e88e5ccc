use axum::http::StatusCode;
use http_body_util::BodyExt;
use ledger_core::config::LedgerConfig;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build the app once per test; redb holds an exclusive lock on the database
/// file, so requests clone the router instead of reopening the store.
fn build_app(dir: &TempDir) -> axum::Router {
    ledger_server::build_router(&dir.path().join("ledger.redb"), LedgerConfig::default()).unwrap()
}

/// Send a GET request via `oneshot` and return (status, parsed JSON body).
async fn get(app: &axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Send a POST request with a JSON body via `oneshot` and return (status, parsed JSON body).
async fn post_json(
    app: &axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// POST with an empty body (consume and refill take no payload).
async fn post_empty(app: &axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

// ---------------------------------------------------------------------------
// Credits
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_credits_for_unknown_user_returns_free_default() {
    let dir = TempDir::new().unwrap();
    let app = build_app(&dir);

    let (status, json) = get(&app, "/api/credits/u1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["credits"]["remainingCredits"], 10);
    assert_eq!(json["credits"]["dailyCredits"], 10);
    assert_eq!(json["credits"]["totalUsedCredits"], 0);
}

#[tokio::test]
async fn initialize_paid_plan_seeds_monthly_balance() {
    let dir = TempDir::new().unwrap();
    let app = build_app(&dir);

    let (status, json) = post_json(
        &app,
        "/api/credits/u1/initialize",
        serde_json::json!({"plan": "builder"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["credits"]["monthlyCredits"], 600);
    assert_eq!(json["credits"]["remainingCredits"], 600);
}

#[tokio::test]
async fn initialize_unknown_plan_falls_back_to_free() {
    let dir = TempDir::new().unwrap();
    let app = build_app(&dir);

    let (status, json) = post_json(
        &app,
        "/api/credits/u1/initialize",
        serde_json::json!({"plan": "platinum"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["credits"]["dailyCredits"], 10);
    assert_eq!(json["credits"]["remainingCredits"], 10);
}

#[tokio::test]
async fn consume_decrements_and_reports_balance() {
    let dir = TempDir::new().unwrap();
    let app = build_app(&dir);

    let (status, json) = post_empty(&app, "/api/credits/u1/consume").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["remainingCredits"], 9);
}

#[tokio::test]
async fn consume_on_empty_balance_is_200_with_need_more_credits() {
    let dir = TempDir::new().unwrap();
    let app = build_app(&dir);

    for _ in 0..10 {
        let (status, json) = post_empty(&app, "/api/credits/u1/consume").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
    }

    let (status, json) = post_empty(&app, "/api/credits/u1/consume").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], false);
    assert_eq!(json["needMoreCredits"], true);
    assert_eq!(json["error"], "Insufficient prompt credits");
}

#[tokio::test]
async fn add_credits_requires_existing_record() {
    let dir = TempDir::new().unwrap();
    let app = build_app(&dir);

    let (status, _json) = post_json(
        &app,
        "/api/credits/nobody/add",
        serde_json::json!({"credits": 100}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn add_credits_rejects_oversized_grant() {
    let dir = TempDir::new().unwrap();
    let app = build_app(&dir);
    post_json(
        &app,
        "/api/credits/u1/initialize",
        serde_json::json!({"plan": "free"}),
    )
    .await;

    let (status, _json) = post_json(
        &app,
        "/api/credits/u1/add",
        serde_json::json!({"credits": 5000}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Refill trigger
// ---------------------------------------------------------------------------

#[tokio::test]
async fn refill_trigger_contract() {
    let dir = TempDir::new().unwrap();
    let app = build_app(&dir);

    // Drain one free-tier user so the sweep has work to do.
    post_empty(&app, "/api/credits/u1/consume").await;

    let (status, json) = post_empty(&app, "/api/credits/refill").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["updatedCount"], 1);
    assert!(json["timestamp"].is_i64());

    // Idempotent: a second sweep updates nothing.
    let (status, json) = get(&app, "/api/credits/refill").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["updatedCount"], 0);

    let (_, json) = get(&app, "/api/credits/u1").await;
    assert_eq!(json["credits"]["remainingCredits"], 10);
}

#[tokio::test]
async fn refill_trigger_accepts_get_and_post() {
    let dir = TempDir::new().unwrap();
    let app = build_app(&dir);

    let (status, json) = get(&app, "/api/credits/refill").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["updatedCount"], 0);
}

// ---------------------------------------------------------------------------
// Packs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pack_catalog_lists_defaults() {
    let dir = TempDir::new().unwrap();
    let app = build_app(&dir);

    let (status, json) = get(&app, "/api/packs").await;
    assert_eq!(status, StatusCode::OK);
    let packs = json.as_array().expect("expected JSON array");
    assert_eq!(packs.len(), 3);
    assert_eq!(packs[0]["id"], "pack_300");
    assert_eq!(packs[0]["credits"], 300);
}

#[tokio::test]
async fn pack_purchase_grants_credits_and_records_history() {
    let dir = TempDir::new().unwrap();
    let app = build_app(&dir);
    post_json(
        &app,
        "/api/credits/u1/initialize",
        serde_json::json!({"plan": "free"}),
    )
    .await;

    let (status, json) = post_json(
        &app,
        "/api/packs/pack_300/purchase",
        serde_json::json!({"userId": "u1", "paymentRef": "pi_123"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["purchase"]["credits"], 300);
    assert_eq!(json["purchase"]["status"], "completed");

    let (_, json) = get(&app, "/api/credits/u1").await;
    assert_eq!(json["credits"]["remainingCredits"], 310);

    let (status, json) = get(&app, "/api/credits/u1/purchases").await;
    assert_eq!(status, StatusCode::OK);
    let history = json.as_array().expect("expected JSON array");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["paymentRef"], "pi_123");
}

#[tokio::test]
async fn unknown_pack_purchase_is_404() {
    let dir = TempDir::new().unwrap();
    let app = build_app(&dir);
    post_json(
        &app,
        "/api/credits/u1/initialize",
        serde_json::json!({"plan": "free"}),
    )
    .await;

    let (status, _json) = post_json(
        &app,
        "/api/packs/pack_1200/purchase",
        serde_json::json!({"userId": "u1", "paymentRef": "pi_456"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Rewards
// ---------------------------------------------------------------------------

#[tokio::test]
async fn award_xp_then_repeat_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let app = build_app(&dir);

    let (status, json) = post_json(
        &app,
        "/api/rewards/u1/award",
        serde_json::json!({"step": "product-basics", "amount": 50}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["totalXp"], 50);

    let (status, json) = post_json(
        &app,
        "/api/rewards/u1/award",
        serde_json::json!({"step": "product-basics", "amount": 50}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["totalXp"], 50);
    assert_eq!(json["history"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn rewards_for_unknown_user_is_empty() {
    let dir = TempDir::new().unwrap();
    let app = build_app(&dir);

    let (status, json) = get(&app, "/api/rewards/ghost").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["totalXp"], 0);
    assert!(json["history"].as_array().unwrap().is_empty());
}
