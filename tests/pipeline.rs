//! End-to-end tests of the request pipeline.

use axum::http::StatusCode;
use quickcreate_web::http::X_REQUEST_ID;

mod common;

const COOKIE_NAME: &str = "quickcreate.auth";

async fn signed_in_cookie(site: &common::TestSite) -> String {
    let res = common::client()
        .post(site.url("/signing"))
        .form(&[("token", common::VALID_TOKEN), ("url", "https://notes.example.com/user")])
        .send()
        .await
        .expect("Site unreachable");
    common::session_cookie(&res, COOKIE_NAME).expect("No session cookie issued")
}

#[tokio::test]
async fn test_root_serves_default_document() {
    let site = common::start_site().await;

    let res = common::client().get(site.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key(X_REQUEST_ID));
    assert_eq!(res.text().await.unwrap(), common::INDEX_HTML);
}

#[tokio::test]
async fn test_static_assets_are_public() {
    let site = common::start_site().await;

    let res = common::client().get(site.url("/scripts/main.js")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), common::MAIN_JS);
}

#[tokio::test]
async fn test_gate_rejects_anonymous_requests() {
    let site = common::start_site().await;
    let client = common::client();

    for path in ["/foo", "/foo/bar", "/does-not-exist"] {
        let res = client.get(site.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "path {path}");
        assert_eq!(res.text().await.unwrap(), "You need to be authenticated");
    }
}

#[tokio::test]
async fn test_user_note_route_runs_before_gate() {
    let site = common::start_site().await;

    let res = common::client()
        .get(site.url("/api/user/42/note/7"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "42");
}

#[tokio::test]
async fn test_signin_route_requires_post() {
    let site = common::start_site().await;

    let res = common::client().get(site.url("/signing")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_mount_reachable_with_session_cookie() {
    let site = common::start_site().await;
    let cookie = signed_in_cookie(&site).await;
    let client = common::client();

    for path in ["/foo", "/foo/bar/baz"] {
        let res = client
            .get(site.url(path))
            .header(reqwest::header::COOKIE, &cookie)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "path {path}");
        assert_eq!(res.text().await.unwrap(), "Only when authed");
    }

    let res = client
        .get(site.url("/nothing-here"))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tampered_cookie_is_anonymous() {
    let site = common::start_site().await;
    let cookie = signed_in_cookie(&site).await;
    let tampered = format!("{cookie}x");

    let res = common::client()
        .get(site.url("/foo"))
        .header(reqwest::header::COOKIE, tampered)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_challenge_redirects_to_login() {
    let mut config = quickcreate_web::AppConfig::default();
    config.auth.challenge = true;
    let site = common::start_site_with(config, std::sync::Arc::new(common::FakeNotes::default())).await;

    let res = common::client().get(site.url("/foo")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()[reqwest::header::LOCATION], "/");
}
