//! HTTP-level tests for the session quota endpoints, run against the
//! in-memory session store.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{
    body_json, build_memory_app, delete_auth, get, get_auth, post_auth, post_json_auth, send,
    set_cookie, token_for, FIREFOX_LINUX_UA,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_credentials_are_rejected() {
    let (app, _store) = build_memory_app();

    let response = get(app, "/api/v1/sessions/count").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn garbage_token_is_rejected() {
    let (app, _store) = build_memory_app();

    let response = get_auth(app, "/api/v1/sessions/count", "not.a.jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn auth_cookie_is_accepted() {
    let (app, store) = build_memory_app();
    store.add_user(1, 2).await;
    let token = token_for(1, "exhibitor", 2);

    let request = Request::post("/api/v1/sessions/heartbeat")
        .header("Cookie", format!("theme=dark; igeco_token={token}"))
        .body(Body::empty())
        .unwrap();
    let response = send(app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["admitted"], true);
}

#[tokio::test]
async fn token_of_deleted_user_is_unauthorized() {
    let (app, _store) = build_memory_app();
    let token = token_for(404, "visitor", 1);

    let response = post_auth(app, "/api/v1/sessions/heartbeat", &token).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Heartbeat and quota poll
// ---------------------------------------------------------------------------

#[tokio::test]
async fn heartbeat_registers_and_count_reflects_it() {
    let (app, store) = build_memory_app();
    store.add_user(1, 2).await;
    let token = token_for(1, "exhibitor", 2);

    let response = post_auth(app.clone(), "/api/v1/sessions/heartbeat", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["admitted"], true);
    assert!(json["session_id"].is_number());

    // A second heartbeat refreshes the same row.
    let again = body_json(post_auth(app.clone(), "/api/v1/sessions/heartbeat", &token).await).await;
    assert_eq!(again["session_id"], json["session_id"]);

    let count = body_json(get_auth(app, "/api/v1/sessions/count", &token).await).await;
    assert_eq!(count["count"], 1);
    assert_eq!(count["max_sessions"], 2);
    assert_eq!(count["allowed"], true);
}

#[tokio::test]
async fn heartbeat_over_quota_lists_sessions_to_close() {
    let (app, store) = build_memory_app();
    store.add_user(1, 1).await;
    let first = token_for(1, "exhibitor", 1);
    let second = token_for(1, "exhibitor", 1);

    post_auth(app.clone(), "/api/v1/sessions/heartbeat", &first).await;
    let response = post_auth(app.clone(), "/api/v1/sessions/heartbeat", &second).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["admitted"], false);
    assert_eq!(json["max_sessions"], 1);
    let to_close = json["sessions_to_close"].as_array().unwrap();
    assert_eq!(to_close.len(), 1);
    assert_eq!(to_close[0]["is_current"], false);
    assert!(to_close[0].get("token_hash").is_none());

    // The refused token was not stored.
    let count = body_json(get_auth(app, "/api/v1/sessions/count", &first).await).await;
    assert_eq!(count["count"], 1);
    assert_eq!(count["allowed"], true);
}

#[tokio::test]
async fn heartbeat_records_client_metadata() {
    let (app, store) = build_memory_app();
    store.add_user(1, 3).await;
    let token = token_for(1, "speaker", 3);

    let request = Request::post("/api/v1/sessions/heartbeat")
        .header("Authorization", format!("Bearer {token}"))
        .header("User-Agent", FIREFOX_LINUX_UA)
        .header("X-Forwarded-For", "198.51.100.4, 10.0.0.2")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(app.clone(), request).await.status(), StatusCode::OK);

    let json = body_json(get_auth(app, "/api/v1/sessions", &token).await).await;
    let session = &json["data"][0];
    assert_eq!(session["ip_address"], "198.51.100.4");
    assert_eq!(session["device_info"], "desktop · Linux · Firefox");
    assert_eq!(session["user_agent"], FIREFOX_LINUX_UA);
    assert_eq!(session["is_current"], true);
}

#[tokio::test]
async fn heartbeat_body_overrides_device_label() {
    let (app, store) = build_memory_app();
    store.add_user(1, 3).await;
    let token = token_for(1, "speaker", 3);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/sessions/heartbeat",
        json!({ "device_info": "Registration desk tablet" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get_auth(app, "/api/v1/sessions", &token).await).await;
    assert_eq!(json["data"][0]["device_info"], "Registration desk tablet");
}

#[tokio::test]
async fn unlimited_quota_admits_everyone() {
    let (app, store) = build_memory_app();
    store.add_user(1, 0).await;

    for _ in 0..5 {
        let token = token_for(1, "admin", 0);
        let json = body_json(post_auth(app.clone(), "/api/v1/sessions/heartbeat", &token).await).await;
        assert_eq!(json["admitted"], true);
    }

    let token = token_for(1, "admin", 0);
    let count = body_json(get_auth(app, "/api/v1/sessions/count", &token).await).await;
    assert_eq!(count["count"], 5);
    assert_eq!(count["allowed"], true);
}

// ---------------------------------------------------------------------------
// Closing sessions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn closing_a_session_frees_a_slot() {
    let (app, store) = build_memory_app();
    store.add_user(1, 1).await;
    let laptop = token_for(1, "exhibitor", 1);
    let phone = token_for(1, "exhibitor", 1);

    post_auth(app.clone(), "/api/v1/sessions/heartbeat", &laptop).await;
    let refused = body_json(post_auth(app.clone(), "/api/v1/sessions/heartbeat", &phone).await).await;
    let victim = refused["sessions_to_close"][0]["id"].as_i64().unwrap();

    let response = delete_auth(app.clone(), &format!("/api/v1/sessions/{victim}"), &phone).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], true);

    let admitted = body_json(post_auth(app, "/api/v1/sessions/heartbeat", &phone).await).await;
    assert_eq!(admitted["admitted"], true);
}

#[tokio::test]
async fn closing_another_users_session_is_not_found() {
    let (app, store) = build_memory_app();
    store.add_user(1, 2).await;
    store.add_user(2, 2).await;
    let owner = token_for(1, "exhibitor", 2);
    let intruder = token_for(2, "exhibitor", 2);

    let json = body_json(post_auth(app.clone(), "/api/v1/sessions/heartbeat", &owner).await).await;
    let session_id = json["session_id"].as_i64().unwrap();

    let response =
        delete_auth(app.clone(), &format!("/api/v1/sessions/{session_id}"), &intruder).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());

    let count = body_json(get_auth(app, "/api/v1/sessions/count", &owner).await).await;
    assert_eq!(count["count"], 1);
}

#[tokio::test]
async fn close_all_expires_cookie() {
    let (app, store) = build_memory_app();
    store.add_user(1, 3).await;
    let a = token_for(1, "visitor", 3);
    let b = token_for(1, "visitor", 3);
    post_auth(app.clone(), "/api/v1/sessions/heartbeat", &a).await;
    post_auth(app.clone(), "/api/v1/sessions/heartbeat", &b).await;

    let response = delete_auth(app.clone(), "/api/v1/sessions", &a).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = set_cookie(&response).expect("auth cookie should be cleared");
    assert!(cookie.starts_with("igeco_token=;"));
    assert!(cookie.contains("Max-Age=0"));
    assert!(!cookie.contains("Secure"));
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["closed"], 2);

    let listed = body_json(get_auth(app, "/api/v1/sessions", &b).await).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 0);
}

// ---------------------------------------------------------------------------
// Slot purchases
// ---------------------------------------------------------------------------

fn purchase(payment_id: &str, slots: i32, status: &str) -> serde_json::Value {
    json!({
        "payment_id": payment_id,
        "slots": slots,
        "amount_paid": "20.00",
        "currency": "eur",
        "status": status,
    })
}

#[tokio::test]
async fn completed_purchase_raises_quota() {
    let (app, store) = build_memory_app();
    store.add_user(1, 1).await;
    let token = token_for(1, "exhibitor", 1);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/sessions/payments",
        purchase("pi_001", 2, "COMPLETED"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["payment"]["previous_limit"], 1);
    assert_eq!(json["payment"]["new_limit"], 3);
    assert_eq!(json["payment"]["amount_cents"], 2000);
    assert_eq!(json["payment"]["currency"], "EUR");
    assert_eq!(json["payment"]["applied"], true);

    let count = body_json(get_auth(app, "/api/v1/sessions/count", &token).await).await;
    assert_eq!(count["max_sessions"], 3);
}

#[tokio::test]
async fn duplicate_purchase_is_conflict() {
    let (app, store) = build_memory_app();
    store.add_user(1, 1).await;
    let token = token_for(1, "exhibitor", 1);
    let body = purchase("pi_dup", 1, "COMPLETED");

    post_json_auth(app.clone(), "/api/v1/sessions/payments", body.clone(), &token).await;
    let response = post_json_auth(app.clone(), "/api/v1/sessions/payments", body, &token).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let count = body_json(get_auth(app, "/api/v1/sessions/count", &token).await).await;
    assert_eq!(count["max_sessions"], 2);
}

#[tokio::test]
async fn invalid_purchase_is_rejected() {
    let (app, store) = build_memory_app();
    store.add_user(1, 1).await;
    let token = token_for(1, "exhibitor", 1);

    let bad_status = post_json_auth(
        app.clone(),
        "/api/v1/sessions/payments",
        purchase("pi_x", 1, "MAYBE"),
        &token,
    )
    .await;
    assert_eq!(bad_status.status(), StatusCode::BAD_REQUEST);

    let no_slots = post_json_auth(
        app.clone(),
        "/api/v1/sessions/payments",
        purchase("pi_y", 0, "COMPLETED"),
        &token,
    )
    .await;
    assert_eq!(no_slots.status(), StatusCode::BAD_REQUEST);

    let empty_id = post_json_auth(
        app,
        "/api/v1/sessions/payments",
        purchase("", 1, "COMPLETED"),
        &token,
    )
    .await;
    assert_eq!(empty_id.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(empty_id).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn pending_purchase_applies_on_admin_confirmation() {
    let (app, store) = build_memory_app();
    store.add_user(1, 1).await;
    let buyer = token_for(1, "exhibitor", 1);
    let admin = token_for(99, "admin", 0);

    let json = body_json(
        post_json_auth(
            app.clone(),
            "/api/v1/sessions/payments",
            purchase("pi_pending", 4, "pending"),
            &buyer,
        )
        .await,
    )
    .await;
    assert_eq!(json["payment"]["status"], "PENDING");
    assert_eq!(json["payment"]["applied"], false);

    let count = body_json(get_auth(app.clone(), "/api/v1/sessions/count", &buyer).await).await;
    assert_eq!(count["max_sessions"], 1);

    // Buyers cannot confirm their own purchases.
    let forbidden =
        post_auth(app.clone(), "/api/v1/sessions/payments/pi_pending/confirm", &buyer).await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let confirmed =
        post_auth(app.clone(), "/api/v1/sessions/payments/pi_pending/confirm", &admin).await;
    assert_eq!(confirmed.status(), StatusCode::OK);
    let json = body_json(confirmed).await;
    assert_eq!(json["payment"]["status"], "COMPLETED");
    assert_eq!(json["payment"]["applied"], true);

    // Confirming again changes nothing.
    let again =
        post_auth(app.clone(), "/api/v1/sessions/payments/pi_pending/confirm", &admin).await;
    assert_eq!(again.status(), StatusCode::OK);

    let count = body_json(get_auth(app.clone(), "/api/v1/sessions/count", &buyer).await).await;
    assert_eq!(count["max_sessions"], 5);

    let listed = body_json(get_auth(app, "/api/v1/sessions/payments", &buyer).await).await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn confirming_unknown_purchase_is_not_found() {
    let (app, _store) = build_memory_app();
    let admin = token_for(99, "admin", 0);

    let response = post_auth(app, "/api/v1/sessions/payments/pi_nope/confirm", &admin).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
