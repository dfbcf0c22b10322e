//! Cart, favorites, and comparison list logic.
//!
//! All three lists share one implementation: an ordered list of line items
//! with a configurable notion of item identity. The cart and the comparison
//! list tell a 2kg bag and a 10kg bag of the same food apart, so their
//! identity is product id plus weight. Favorites track products as a whole,
//! so their identity is product id alone. Every mutation uses the same
//! identity as `add`, which keeps removal symmetric with insertion.
//!
//! The storefront persists the raw item lists in the server-side session
//! under one key per list; this module never does I/O itself.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// How line items are told apart within a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemIdentity {
    /// Product id only; weight is ignored when matching.
    Product,
    /// Product id plus weight variant.
    ProductAndWeight,
}

/// The three customer-facing collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionKind {
    Cart,
    Favorites,
    Compare,
}

impl CollectionKind {
    /// Session key the item list is stored under.
    #[must_use]
    pub const fn storage_key(self) -> &'static str {
        match self {
            Self::Cart => "cart",
            Self::Favorites => "favorites",
            Self::Compare => "compare",
        }
    }

    /// Identity rule for this collection.
    #[must_use]
    pub const fn identity(self) -> ItemIdentity {
        match self {
            Self::Cart | Self::Compare => ItemIdentity::ProductAndWeight,
            Self::Favorites => ItemIdentity::Product,
        }
    }

    /// An empty collection of this kind.
    #[must_use]
    pub const fn empty(self) -> Collection {
        Collection::new(self.identity())
    }
}

/// The product fields copied into a line when it is added.
///
/// Collections snapshot name and price at add time; later catalog edits do
/// not rewrite lines already in a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: Option<String>,
    /// Weight variant in kilograms, `None` for single-unit products.
    pub weight: Option<Decimal>,
}

/// One line of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionItem {
    pub product_id: ProductId,
    pub weight: Option<Decimal>,
    pub name: String,
    pub price: Price,
    pub image: Option<String>,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

impl CollectionItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}

/// An ordered list of line items with identity-aware mutations.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    identity: ItemIdentity,
    items: Vec<CollectionItem>,
}

impl Collection {
    #[must_use]
    pub const fn new(identity: ItemIdentity) -> Self {
        Self {
            identity,
            items: Vec::new(),
        }
    }

    /// Rebuild a collection from items loaded out of session storage.
    #[must_use]
    pub const fn with_items(identity: ItemIdentity, items: Vec<CollectionItem>) -> Self {
        Self { identity, items }
    }

    #[must_use]
    pub fn items(&self) -> &[CollectionItem] {
        &self.items
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of line quantities, the number shown on the header badge.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |count, item| count.saturating_add(item.quantity))
    }

    /// Sum of line totals.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CollectionItem::line_total).sum()
    }

    fn matches(
        &self,
        item: &CollectionItem,
        product_id: ProductId,
        weight: Option<Decimal>,
    ) -> bool {
        match self.identity {
            ItemIdentity::Product => item.product_id == product_id,
            ItemIdentity::ProductAndWeight => {
                item.product_id == product_id && item.weight == weight
            }
        }
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId, weight: Option<Decimal>) -> bool {
        self.items
            .iter()
            .any(|item| self.matches(item, product_id, weight))
    }

    /// Add `quantity` of a product to the collection.
    ///
    /// If a line with the same identity already exists its quantity grows;
    /// otherwise a new line is appended at the end. A requested quantity of
    /// zero counts as one, so "add to cart" always has a visible effect.
    pub fn add(&mut self, snapshot: ItemSnapshot, quantity: u32) {
        let quantity = quantity.max(1);
        let identity = self.identity;
        let existing = self.items.iter_mut().find(|item| match identity {
            ItemIdentity::Product => item.product_id == snapshot.product_id,
            ItemIdentity::ProductAndWeight => {
                item.product_id == snapshot.product_id && item.weight == snapshot.weight
            }
        });

        if let Some(item) = existing {
            item.quantity = item.quantity.saturating_add(quantity);
        } else {
            self.items.push(CollectionItem {
                product_id: snapshot.product_id,
                weight: snapshot.weight,
                name: snapshot.name,
                price: snapshot.price,
                image: snapshot.image,
                quantity,
                added_at: Utc::now(),
            });
        }
    }

    /// Remove every line matching the identity key. Returns whether any
    /// line was removed.
    pub fn remove(&mut self, product_id: ProductId, weight: Option<Decimal>) -> bool {
        let before = self.items.len();
        let identity = self.identity;
        self.items.retain(|item| match identity {
            ItemIdentity::Product => item.product_id != product_id,
            ItemIdentity::ProductAndWeight => {
                !(item.product_id == product_id && item.weight == weight)
            }
        });
        self.items.len() != before
    }

    /// Set the quantity of an existing line. Zero removes the line. Returns
    /// whether a line was affected; setting quantity on a missing line is a
    /// no-op.
    pub fn set_quantity(
        &mut self,
        product_id: ProductId,
        weight: Option<Decimal>,
        quantity: u32,
    ) -> bool {
        if quantity == 0 {
            return self.remove(product_id, weight);
        }
        let identity = self.identity;
        for item in &mut self.items {
            let matched = match identity {
                ItemIdentity::Product => item.product_id == product_id,
                ItemIdentity::ProductAndWeight => {
                    item.product_id == product_id && item.weight == weight
                }
            };
            if matched {
                item.quantity = quantity;
                return true;
            }
        }
        false
    }

    /// Add the product if absent, remove it if present. Returns `true` when
    /// the product was added.
    ///
    /// This is the favorites/compare button behavior; toggling twice always
    /// restores the previous contents.
    pub fn toggle(&mut self, snapshot: ItemSnapshot) -> bool {
        if self.contains(snapshot.product_id, snapshot.weight) {
            self.remove(snapshot.product_id, snapshot.weight);
            false
        } else {
            self.add(snapshot, 1);
            true
        }
    }

}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn snapshot(id: i32, weight: Option<&str>, cents: i64) -> ItemSnapshot {
        ItemSnapshot {
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            price: Price::from_cents(cents),
            image: None,
            weight: weight.map(|w| w.parse::<Decimal>().unwrap()),
        }
    }

    #[test]
    fn test_add_merges_same_product_and_weight() {
        let mut cart = CollectionKind::Cart.empty();
        cart.add(snapshot(1, Some("2"), 1000), 2);
        cart.add(snapshot(1, Some("2"), 1000), 3);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
    }

    #[test]
    fn test_add_same_product_different_weight_makes_new_line() {
        let mut cart = CollectionKind::Cart.empty();
        cart.add(snapshot(1, Some("2"), 1000), 1);
        cart.add(snapshot(1, Some("10"), 4200), 1);

        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_product_identity_ignores_weight() {
        let mut favorites = CollectionKind::Favorites.empty();
        favorites.add(snapshot(1, Some("2"), 1000), 1);
        favorites.add(snapshot(1, Some("10"), 4200), 1);

        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites.items()[0].quantity, 2);
    }

    #[test]
    fn test_add_zero_quantity_counts_as_one() {
        let mut cart = CollectionKind::Cart.empty();
        cart.add(snapshot(1, None, 500), 0);

        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn test_remove_uses_same_identity_as_add() {
        let mut cart = CollectionKind::Cart.empty();
        cart.add(snapshot(1, Some("2"), 1000), 1);
        cart.add(snapshot(1, Some("10"), 4200), 1);

        assert!(cart.remove(ProductId::new(1), Some(Decimal::from(2))));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].weight, Some(Decimal::from(10)));

        assert!(!cart.remove(ProductId::new(1), Some(Decimal::from(2))));
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = CollectionKind::Cart.empty();
        cart.add(snapshot(1, None, 500), 1);

        assert!(cart.set_quantity(ProductId::new(1), None, 7));
        assert_eq!(cart.items()[0].quantity, 7);
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = CollectionKind::Cart.empty();
        cart.add(snapshot(1, None, 500), 2);

        assert!(cart.set_quantity(ProductId::new(1), None, 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_on_missing_line_is_noop() {
        let mut cart = CollectionKind::Cart.empty();
        cart.add(snapshot(1, None, 500), 2);

        assert!(!cart.set_quantity(ProductId::new(9), None, 3));
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_toggle_twice_restores_contents() {
        let mut favorites = CollectionKind::Favorites.empty();
        favorites.add(snapshot(1, None, 500), 1);
        let before = favorites.items().to_vec();

        assert!(favorites.toggle(snapshot(2, None, 900)));
        assert!(favorites.contains(ProductId::new(2), None));
        assert!(!favorites.toggle(snapshot(2, None, 900)));

        assert_eq!(favorites.items(), before.as_slice());
    }

    #[test]
    fn test_totals() {
        let mut cart = CollectionKind::Cart.empty();
        cart.add(snapshot(1, Some("2"), 1050), 2); // $21.00
        cart.add(snapshot(2, None, 399), 3); // $11.97

        assert_eq!(cart.item_count(), 5);
        assert_eq!(cart.total(), Price::from_cents(3297));
    }

    #[test]
    fn test_new_lines_append_in_order() {
        let mut cart = CollectionKind::Cart.empty();
        cart.add(snapshot(3, None, 100), 1);
        cart.add(snapshot(1, None, 100), 1);
        cart.add(snapshot(2, None, 100), 1);

        let ids: Vec<i32> = cart
            .items()
            .iter()
            .map(|item| item.product_id.as_i32())
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_storage_keys() {
        assert_eq!(CollectionKind::Cart.storage_key(), "cart");
        assert_eq!(CollectionKind::Favorites.storage_key(), "favorites");
        assert_eq!(CollectionKind::Compare.storage_key(), "compare");
    }

    #[test]
    fn test_kind_identities() {
        assert_eq!(
            CollectionKind::Cart.identity(),
            ItemIdentity::ProductAndWeight
        );
        assert_eq!(
            CollectionKind::Compare.identity(),
            ItemIdentity::ProductAndWeight
        );
        assert_eq!(CollectionKind::Favorites.identity(), ItemIdentity::Product);
    }
}
