mod common;

use axum::http::{header, Request, StatusCode};
use axum::body::Body;
use carelink_core::{ApprovalStatus, ProfileId};
use carelink_repository::ProfileRepository;
use carelink_service::CacheInterface;
use common::{location_of, read_json, request, TestApp};

#[tokio::test]
async fn anonymous_browser_is_sent_to_login() {
    let app = TestApp::new();

    let response = app.get_as("/admin", None).await;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location_of(&response), Some("/login"));
}

#[tokio::test]
async fn anonymous_api_call_is_unauthorized() {
    let app = TestApp::new();

    let response = app.get_as("/api/v1/me", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = read_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"]["code"].is_string());
}

#[tokio::test]
async fn public_pages_need_no_session() {
    let app = TestApp::new();

    assert_eq!(app.get_as("/", None).await.status(), StatusCode::OK);
    assert_eq!(
        app.get_as("/api/v1/master-data/locations", None).await.status(),
        StatusCode::OK
    );
    assert_eq!(app.get_as("/login", None).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pending_user_waits() {
    let app = TestApp::new();

    let response = app.get_as("/admin/referrals", Some("waiting")).await;
    assert_eq!(location_of(&response), Some("/pending-approval"));

    let response = app.get_as("/api/v1/me", Some("waiting")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn rejected_user_is_turned_away() {
    let app = TestApp::new();

    let response = app.get_as("/admin", Some("blocked")).await;

    assert_eq!(location_of(&response), Some("/unauthorized"));
}

#[tokio::test]
async fn role_mismatch_is_blocked() {
    let app = TestApp::new();

    let response = app.get_as("/superadmin", Some("admin")).await;
    assert_eq!(location_of(&response), Some("/unauthorized"));

    let response = app
        .get_as("/api/v1/superadmin/profiles/pending", Some("admin"))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.get_as("/admin", Some("root")).await;
    assert_eq!(location_of(&response), Some("/unauthorized"));
}

#[tokio::test]
async fn signed_in_user_skips_entry_pages() {
    let app = TestApp::new();

    let response = app.get_as("/login", Some("admin")).await;
    assert_eq!(location_of(&response), Some("/admin"));

    let response = app.get_as("/signup", Some("root")).await;
    assert_eq!(location_of(&response), Some("/superadmin"));

    let response = app.get_as("/pending-approval", Some("member")).await;
    assert_eq!(location_of(&response), Some("/"));
}

#[tokio::test]
async fn session_cookie_is_accepted() {
    let app = TestApp::new();
    let cookie = format!("{}={}", app.cookie_name, app.token_for("member"));

    let response = app
        .send(
            Request::builder()
                .uri("/api/v1/me")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["id"], "member");
    assert_eq!(body["data"]["home"], "/");
}

#[tokio::test]
async fn unusable_token_counts_as_anonymous() {
    let app = TestApp::new();

    let response = app
        .send(request("GET", "/api/v1/me", Some("not-a-jwt".to_string()), None))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .send(request("GET", "/", Some("not-a-jwt".to_string()), None))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn identity_without_profile_row_is_anonymous() {
    let app = TestApp::new();

    let response = app.get_as("/admin", Some("stranger")).await;

    assert_eq!(location_of(&response), Some("/login"));
}

#[tokio::test]
async fn gate_fills_the_profile_cache_in_the_background() {
    let app = TestApp::new();

    let response = app.get_as("/api/v1/me", Some("admin")).await;
    assert_eq!(response.status(), StatusCode::OK);
    app.tasks.wait_idle().await;

    let cached = app.cache.get_raw("profile:admin").await.unwrap();
    assert!(cached.is_some_and(|json| json.contains("\"h1\"")));
}

#[tokio::test]
async fn approval_takes_effect_on_the_next_request() {
    let app = TestApp::new();

    let response = app.get_as("/api/v1/me", Some("waiting")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    app.tasks.wait_idle().await;
    assert!(app.cache.get_raw("profile:waiting").await.unwrap().is_some());

    let response = app
        .send_as(
            "POST",
            "/api/v1/superadmin/profiles/waiting/approve",
            "root",
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(app.cache.get_raw("profile:waiting").await.unwrap().is_none());

    let response = app.get_as("/api/v1/me", Some("waiting")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["status"], "approved");
    assert_eq!(body["data"]["home"], "/admin");
}

#[tokio::test]
async fn pending_user_sign_in_refreshes_stale_entry() {
    let app = TestApp::new();

    let response = app.get_as("/api/v1/me", Some("waiting")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    app.tasks.wait_idle().await;

    let mut row = app
        .profiles
        .find_by_id(&ProfileId::new("waiting"))
        .await
        .unwrap()
        .unwrap();
    row.status = ApprovalStatus::Approved;
    app.profiles.update(&row).await.unwrap();

    let response = app
        .send_as("POST", "/api/v1/me/sign-in", "waiting", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["status"], "approved");

    app.tasks.wait_idle().await;
    let cached = app.cache.get_raw("profile:waiting").await.unwrap();
    assert!(cached.is_some_and(|json| json.contains("\"approved\"")));
}

#[tokio::test]
async fn rejected_user_may_still_sign_in() {
    let app = TestApp::new();

    let response = app
        .send_as("POST", "/api/v1/me/sign-in", "blocked", None)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["data"]["status"], "rejected");
}

#[tokio::test]
async fn anonymous_sign_in_is_unauthorized() {
    let app = TestApp::new();

    let response = app
        .send(request("POST", "/api/v1/me/sign-in", None, None))
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
