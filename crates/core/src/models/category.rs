//! Product category entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::CategoryId;

/// A product category, one row of the `shop.categories` table.
///
/// Categories form a tree through `parent_id`. The database stores the flat
/// adjacency list; [`crate::catalog::CategoryTree`] assembles the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    /// URL path segment, unique across all categories.
    pub slug: String,
    /// `None` for top-level categories.
    pub parent_id: Option<CategoryId>,
    /// Sort key among siblings, smallest first.
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
