//! Session storage for the shopping collections.
//!
//! The cart, favorites, and compare lists live in the session as plain
//! item vectors under their own keys. Handlers load them into a
//! [`Collection`] for the duration of one request and write the items
//! back after mutating.

use tower_sessions::Session;

use paws_core::collection::{Collection, CollectionItem, CollectionKind};

/// Load a collection from the session.
///
/// A missing or unreadable session value yields an empty collection, so a
/// stale or tampered cookie never breaks a page.
pub async fn load_collection(session: &Session, kind: CollectionKind) -> Collection {
    let items = session
        .get::<Vec<CollectionItem>>(kind.storage_key())
        .await
        .ok()
        .flatten()
        .unwrap_or_default();

    Collection::with_items(kind.identity(), items)
}

/// Write a collection's items back to the session.
///
/// # Errors
///
/// Returns the session store error if persisting fails.
pub async fn save_collection(
    session: &Session,
    kind: CollectionKind,
    collection: &Collection,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(kind.storage_key(), collection.items()).await
}
