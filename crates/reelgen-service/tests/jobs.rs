//! Job lookup, refresh, and webhook integration tests.

mod common;

use common::{TestHarness, WEBHOOK_SECRET};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use reelgen_service::crypto::hmac_sha256_hex;

/// Submit one video job and return its ID.
async fn submit_job(harness: &TestHarness, provider_job_id: &str) -> String {
    harness.mock_provider_accepts(provider_job_id).await;

    let response = harness
        .server
        .post("/v1/generate/video")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "prompt": "a cat", "model": "wave-v2" }))
        .await;
    response.assert_status(axum::http::StatusCode::ACCEPTED);

    let body: serde_json::Value = response.json();
    body["job_id"].as_str().unwrap().to_string()
}

fn mock_status(provider_job_id: &str, body: serde_json::Value) -> Mock {
    Mock::given(method("GET"))
        .and(path(format!("/v1/generations/{provider_job_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
}

// ============================================================================
// Lookup & listing
// ============================================================================

#[tokio::test]
async fn get_job_returns_the_persisted_job() {
    let harness = TestHarness::new().await;
    let job_id = submit_job(&harness, "prov-1").await;

    let response = harness
        .server
        .get(&format!("/v1/jobs/{job_id}"))
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["id"], job_id.as_str());
    assert_eq!(body["status"], "queued");
    assert_eq!(body["provider_job_id"], "prov-1");
    assert_eq!(body["media_url"], serde_json::Value::Null);
}

#[tokio::test]
async fn foreign_job_is_forbidden() {
    let harness = TestHarness::new().await;
    let job_id = submit_job(&harness, "prov-1").await;

    let response = harness
        .server
        .get(&format!("/v1/jobs/{job_id}"))
        .add_header("authorization", TestHarness::other_user_auth_header())
        .await;

    response.assert_status_forbidden();
}

#[tokio::test]
async fn unknown_job_is_not_found() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .get("/v1/jobs/01ARZ3NDEKTSV4RRFFQ69G5FAV")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn list_jobs_returns_newest_first() {
    let harness = TestHarness::new().await;
    harness.mock_provider_accepts("prov-1").await;
    harness.set_plan("pro", None).await;

    let mut submitted = Vec::new();
    for i in 0..3 {
        let response = harness
            .server
            .post("/v1/generate/video")
            .add_header("authorization", harness.user_auth_header())
            .json(&json!({ "prompt": format!("video {i}"), "model": "wave-v2" }))
            .await;
        response.assert_status(axum::http::StatusCode::ACCEPTED);
        let body: serde_json::Value = response.json();
        submitted.push(body["job_id"].as_str().unwrap().to_string());
    }

    let response = harness
        .server
        .get("/v1/jobs")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let listed: Vec<&str> = body["jobs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["id"].as_str().unwrap())
        .collect();

    submitted.reverse();
    assert_eq!(listed, submitted);
}

#[tokio::test]
async fn list_jobs_excludes_other_users() {
    let harness = TestHarness::new().await;
    submit_job(&harness, "prov-1").await;

    let response = harness
        .server
        .get("/v1/jobs")
        .add_header("authorization", TestHarness::other_user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["jobs"].as_array().unwrap().is_empty());
}

// ============================================================================
// Refresh (poll)
// ============================================================================

#[tokio::test]
async fn refresh_applies_ready_status_from_provider() {
    let harness = TestHarness::new().await;
    let job_id = submit_job(&harness, "prov-1").await;

    mock_status(
        "prov-1",
        json!({
            "job_id": "prov-1",
            "status": "ready",
            "media_url": "https://cdn.example.com/out.mp4",
            "created_at": "2026-08-23T10:00:00Z"
        }),
    )
    .mount(&harness.provider)
    .await;

    let response = harness
        .server
        .post(&format!("/v1/jobs/{job_id}/refresh"))
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["media_url"], "https://cdn.example.com/out.mp4");
}

#[tokio::test]
async fn refresh_of_terminal_job_skips_the_provider() {
    let harness = TestHarness::new().await;
    let job_id = submit_job(&harness, "prov-1").await;

    mock_status(
        "prov-1",
        json!({
            "job_id": "prov-1",
            "status": "failed",
            "media_url": null,
            "created_at": "2026-08-23T10:00:00Z"
        }),
    )
    .expect(1)
    .mount(&harness.provider)
    .await;

    // First refresh lands the terminal state; the second returns from the
    // store without touching the provider (expect(1) above enforces it).
    for _ in 0..2 {
        let response = harness
            .server
            .post(&format!("/v1/jobs/{job_id}/refresh"))
            .add_header("authorization", harness.user_auth_header())
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "failed");
    }
}

// ============================================================================
// Webhooks (push)
// ============================================================================

async fn post_webhook(harness: &TestHarness, body: &serde_json::Value, sign: bool) -> axum_test::TestResponse {
    let raw = body.to_string();

    let mut request = harness
        .server
        .post("/webhooks/provider")
        .text(raw.clone())
        .content_type("application/json");

    if sign {
        let signature = hmac_sha256_hex(WEBHOOK_SECRET, &raw);
        request = request.add_header("x-provider-signature", signature);
    }

    request.await
}

#[tokio::test]
async fn signed_webhook_marks_job_ready() {
    let harness = TestHarness::new().await;
    let job_id = submit_job(&harness, "prov-1").await;

    let response = post_webhook(
        &harness,
        &json!({
            "reference": job_id,
            "status": "ready",
            "media_url": "https://cdn.example.com/out.mp4"
        }),
        true,
    )
    .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["received"], true);

    let response = harness
        .server
        .get(&format!("/v1/jobs/{job_id}"))
        .add_header("authorization", harness.user_auth_header())
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["media_url"], "https://cdn.example.com/out.mp4");
}

#[tokio::test]
async fn unsigned_webhook_is_rejected() {
    let harness = TestHarness::new().await;
    let job_id = submit_job(&harness, "prov-1").await;

    let response = post_webhook(
        &harness,
        &json!({
            "reference": job_id,
            "status": "ready",
            "media_url": "https://cdn.example.com/out.mp4"
        }),
        false,
    )
    .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn webhook_ready_without_media_url_is_rejected() {
    let harness = TestHarness::new().await;
    let job_id = submit_job(&harness, "prov-1").await;

    let response = post_webhook(
        &harness,
        &json!({
            "reference": job_id,
            "status": "ready",
            "media_url": null
        }),
        true,
    )
    .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn webhook_cannot_move_a_terminal_job() {
    let harness = TestHarness::new().await;
    let job_id = submit_job(&harness, "prov-1").await;

    post_webhook(
        &harness,
        &json!({ "reference": job_id, "status": "failed", "media_url": null }),
        true,
    )
    .await
    .assert_status_ok();

    // failed -> ready is not a legal transition.
    let response = post_webhook(
        &harness,
        &json!({
            "reference": job_id,
            "status": "ready",
            "media_url": "https://cdn.example.com/out.mp4"
        }),
        true,
    )
    .await;

    response.assert_status(axum::http::StatusCode::CONFLICT);
}

#[tokio::test]
async fn repeated_terminal_webhook_is_idempotent() {
    let harness = TestHarness::new().await;
    let job_id = submit_job(&harness, "prov-1").await;

    for _ in 0..2 {
        post_webhook(
            &harness,
            &json!({ "reference": job_id, "status": "failed", "media_url": null }),
            true,
        )
        .await
        .assert_status_ok();
    }
}

// ============================================================================
// Admin profiles
// ============================================================================

#[tokio::test]
async fn profile_upsert_requires_admin_key() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .put(&format!("/v1/admin/profiles/{}", harness.test_user_id))
        .json(&json!({ "plan": "pro", "plan_expires_at": null }))
        .await;

    response.assert_status_unauthorized();

    let response = harness
        .server
        .put(&format!("/v1/admin/profiles/{}", harness.test_user_id))
        .add_header("x-admin-key", "wrong-key")
        .json(&json!({ "plan": "pro", "plan_expires_at": null }))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn usage_endpoint_reflects_the_upserted_plan() {
    let harness = TestHarness::new().await;
    harness.set_plan("pro", None).await;

    let response = harness
        .server
        .get("/v1/usage/today")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["plan"], "pro");
    assert_eq!(body["video"]["limit"], 5);
    assert_eq!(body["max_prompt_words"], 200);
}
