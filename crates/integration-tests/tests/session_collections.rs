//! Session-backed shopping collections, exercised through a real session
//! store the way the storefront handlers use them.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use rust_decimal::Decimal;
use tower_sessions::{MemoryStore, Session};

use paws_core::collection::{CollectionKind, ItemSnapshot};
use paws_core::{Price, ProductId};
use paws_storefront::collections::{load_collection, save_collection};

fn test_session() -> Session {
    Session::new(None, Arc::new(MemoryStore::default()), None)
}

fn snapshot(id: i32, name: &str, price: &str, weight: Option<&str>) -> ItemSnapshot {
    ItemSnapshot {
        product_id: ProductId::new(id),
        name: name.to_owned(),
        price: Price::new(price.parse::<Decimal>().unwrap()),
        image: None,
        weight: weight.map(|w| w.parse::<Decimal>().unwrap()),
    }
}

#[tokio::test]
async fn test_cart_survives_a_session_round_trip() {
    let session = test_session();

    let mut cart = load_collection(&session, CollectionKind::Cart).await;
    assert!(cart.is_empty());

    cart.add(snapshot(1, "Hearty Chicken & Rice Kibble", "11.90", Some("3")), 1);
    cart.add(snapshot(2, "Braided Rope Tug", "9.90", None), 2);
    save_collection(&session, CollectionKind::Cart, &cart)
        .await
        .unwrap();

    let reloaded = load_collection(&session, CollectionKind::Cart).await;
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.item_count(), 3);
    assert_eq!(reloaded.total().to_string(), "$31.70");
    assert!(reloaded.contains(ProductId::new(1), Some("3".parse().unwrap())));
}

#[tokio::test]
async fn test_cart_tells_weight_variants_apart() {
    let session = test_session();

    let mut cart = load_collection(&session, CollectionKind::Cart).await;
    cart.add(snapshot(1, "Hearty Chicken & Rice Kibble", "11.90", Some("3")), 1);
    cart.add(snapshot(1, "Hearty Chicken & Rice Kibble", "39.90", Some("12")), 1);
    save_collection(&session, CollectionKind::Cart, &cart)
        .await
        .unwrap();

    let mut reloaded = load_collection(&session, CollectionKind::Cart).await;
    assert_eq!(reloaded.len(), 2);

    assert!(reloaded.remove(ProductId::new(1), Some("3".parse().unwrap())));
    save_collection(&session, CollectionKind::Cart, &reloaded)
        .await
        .unwrap();

    let after = load_collection(&session, CollectionKind::Cart).await;
    assert_eq!(after.len(), 1);
    assert!(after.contains(ProductId::new(1), Some("12".parse().unwrap())));
}

#[tokio::test]
async fn test_favorites_toggle_matches_on_product_only() {
    let session = test_session();

    let mut favorites = load_collection(&session, CollectionKind::Favorites).await;
    assert!(favorites.toggle(snapshot(5, "Salmon Crunch Cat Food", "7.90", Some("0.4"))));
    save_collection(&session, CollectionKind::Favorites, &favorites)
        .await
        .unwrap();

    // Same product, different variant: favorites track the product.
    let mut reloaded = load_collection(&session, CollectionKind::Favorites).await;
    assert!(!reloaded.toggle(snapshot(5, "Salmon Crunch Cat Food", "28.90", Some("2"))));
    assert!(reloaded.is_empty());
}

#[tokio::test]
async fn test_collections_use_separate_session_keys() {
    let session = test_session();

    let mut cart = load_collection(&session, CollectionKind::Cart).await;
    cart.add(snapshot(3, "Feather Teaser Wand", "5.90", None), 1);
    save_collection(&session, CollectionKind::Cart, &cart)
        .await
        .unwrap();

    let favorites = load_collection(&session, CollectionKind::Favorites).await;
    let compare = load_collection(&session, CollectionKind::Compare).await;
    assert!(favorites.is_empty());
    assert!(compare.is_empty());
}

#[tokio::test]
async fn test_unreadable_session_value_falls_back_to_empty() {
    let session = test_session();
    session.insert("cart", "woof").await.unwrap();

    let cart = load_collection(&session, CollectionKind::Cart).await;
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_quantity_edits_persist() {
    let session = test_session();

    let mut cart = load_collection(&session, CollectionKind::Cart).await;
    cart.add(snapshot(7, "Clumping Clay Litter", "10.90", Some("5")), 1);
    assert!(cart.set_quantity(ProductId::new(7), Some("5".parse().unwrap()), 4));
    save_collection(&session, CollectionKind::Cart, &cart)
        .await
        .unwrap();

    let mut reloaded = load_collection(&session, CollectionKind::Cart).await;
    assert_eq!(reloaded.item_count(), 4);

    // Quantity zero clears the line.
    assert!(reloaded.set_quantity(ProductId::new(7), Some("5".parse().unwrap()), 0));
    save_collection(&session, CollectionKind::Cart, &reloaded)
        .await
        .unwrap();
    assert!(load_collection(&session, CollectionKind::Cart).await.is_empty());
}
