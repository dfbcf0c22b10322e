//! End-to-end admin panel tests against a running server.
//!
//! These need a migrated database and the admin panel listening on
//! `ADMIN_BASE_URL` (default `http://localhost:3001`):
//!
//! ```bash
//! cargo run -p paws-cli -- migrate
//! cargo run -p paws-admin
//! cargo test -p paws-integration-tests --test admin_http -- --ignored
//! ```
//!
//! The logged-in flows additionally expect an account created with
//! `paws-cli admin create` and its credentials in `TEST_ADMIN_EMAIL` /
//! `TEST_ADMIN_PASSWORD`.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;

use paws_integration_tests::{admin_base_url, client};

#[tokio::test]
#[ignore = "requires a running admin server"]
async fn test_health_endpoint() {
    let resp = client()
        .get(format!("{}/health", admin_base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires a running admin server"]
async fn test_pages_redirect_to_login_without_a_session() {
    let resp = client()
        .get(format!("{}/orders", admin_base_url()))
        .send()
        .await
        .unwrap();

    // The redirect is followed; we land on the login form.
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.url().path(), "/auth/login");
}

#[tokio::test]
#[ignore = "requires a running admin server"]
async fn test_api_rejects_without_a_session() {
    let resp = client()
        .patch(format!("{}/api/orders/1", admin_base_url()))
        .json(&serde_json::json!({ "status": "processing" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a running admin server"]
async fn test_wrong_password_bounces_back_with_an_error() {
    let resp = client()
        .post(format!("{}/auth/login", admin_base_url()))
        .form(&[
            ("email", "nobody@pawswhiskers.example"),
            ("password", "definitely-not-the-password"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.url().path(), "/auth/login");
    assert!(resp.text().await.unwrap().contains("Invalid email or password"));
}

#[tokio::test]
#[ignore = "requires a running admin server and TEST_ADMIN_* credentials"]
async fn test_login_reaches_the_dashboard() {
    let (email, password) = test_credentials();
    let client = client();

    let resp = client
        .post(format!("{}/auth/login", admin_base_url()))
        .form(&[("email", email.as_str()), ("password", password.as_str())])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.url().path(), "/");
    assert!(resp.text().await.unwrap().contains("Dashboard"));

    // The session cookie now opens other pages too.
    let orders = client
        .get(format!("{}/orders", admin_base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(orders.url().path(), "/orders");
}

fn test_credentials() -> (String, String) {
    let email =
        std::env::var("TEST_ADMIN_EMAIL").unwrap_or_else(|_| "admin@pawswhiskers.example".into());
    let password = std::env::var("TEST_ADMIN_PASSWORD")
        .unwrap_or_else(|_| "change-me-before-testing".into());
    (email, password)
}
