//! End-to-end storefront tests against a running server.
//!
//! These need a migrated, seeded database and the storefront listening on
//! `STOREFRONT_BASE_URL` (default `http://localhost:3000`):
//!
//! ```bash
//! cargo run -p paws-cli -- migrate
//! cargo run -p paws-cli -- seed
//! cargo run -p paws-storefront
//! cargo test -p paws-integration-tests --test storefront_http -- --ignored
//! ```

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;

use paws_integration_tests::{client, storefront_base_url};

#[tokio::test]
#[ignore = "requires a running storefront server"]
async fn test_health_endpoint() {
    let resp = client()
        .get(format!("{}/health", storefront_base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "requires a running storefront server"]
async fn test_home_page_lists_top_level_categories() {
    let resp = client()
        .get(storefront_base_url())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.unwrap();
    assert!(body.contains("Paws"));
    assert!(body.contains("/categories/dogs"));
    assert!(body.contains("/categories/cats"));
}

#[tokio::test]
#[ignore = "requires a running storefront server"]
async fn test_category_page_shows_seeded_products() {
    let resp = client()
        .get(format!("{}/categories/dog-dry-food", storefront_base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.unwrap();
    assert!(body.contains("Hearty Chicken"));
}

#[tokio::test]
#[ignore = "requires a running storefront server"]
async fn test_unknown_category_is_404() {
    let resp = client()
        .get(format!("{}/categories/no-such-aisle", storefront_base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires a running storefront server"]
async fn test_cart_add_and_show() {
    let base = storefront_base_url();
    let client = client();

    // Find a seeded product id via the JSON API.
    let products: serde_json::Value = client
        .get(format!("{base}/api/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let product_id = products["products"][0]["id"].as_i64().unwrap().to_string();

    // Add it to the cart; the handler answers with the count badge.
    let resp = client
        .post(format!("{base}/cart/add"))
        .form(&[("product_id", product_id.as_str()), ("quantity", "2")])
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());

    // The cart page shows the line.
    let body = client
        .get(format!("{base}/cart"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!body.contains("cart is empty"));
}

#[tokio::test]
#[ignore = "requires a running storefront server"]
async fn test_quick_order_accepts_name_and_phone() {
    let resp = client()
        .post(format!("{}/quick-order", storefront_base_url()))
        .form(&[("customer_name", "Robin"), ("phone", "+1 555 0199")])
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
}
