//! Category tree assembly and flattening.
//!
//! Categories live in the database as a flat adjacency list (`parent_id`
//! pointing at another row, or `NULL` for roots). This module turns that
//! list into a nested tree for navigation menus and back into an annotated
//! flat list for admin tables and select menus.
//!
//! Assembly is a single pass over the rows: each row is bucketed under its
//! parent id, then the tree is stitched together by walking down from the
//! roots. Rows whose parent chain never reaches a root (the parent row was
//! deleted, or the rows form a cycle) are excluded from the tree and
//! reported in [`CategoryTree::orphans`] so callers can log them. They are
//! never silently reattached as roots.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::Category;
use crate::types::CategoryId;

/// A category with its nested subcategories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub subcategories: Vec<CategoryNode>,
}

impl CategoryNode {
    fn count(&self) -> usize {
        1 + self
            .subcategories
            .iter()
            .map(CategoryNode::count)
            .sum::<usize>()
    }

    fn find(&self, id: CategoryId) -> Option<&Self> {
        if self.category.id == id {
            return Some(self);
        }
        self.subcategories.iter().find_map(|child| child.find(id))
    }

    fn find_by_slug(&self, slug: &str) -> Option<&Self> {
        if self.category.slug == slug {
            return Some(self);
        }
        self.subcategories
            .iter()
            .find_map(|child| child.find_by_slug(slug))
    }

    fn collect_ids(&self, ids: &mut Vec<CategoryId>) {
        ids.push(self.category.id);
        for child in &self.subcategories {
            child.collect_ids(ids);
        }
    }

    fn flatten_into(&self, level: usize, flat: &mut Vec<FlatCategory>) {
        flat.push(FlatCategory {
            id: self.category.id,
            name: self.category.name.clone(),
            slug: self.category.slug.clone(),
            parent_id: self.category.parent_id,
            level,
        });
        for child in &self.subcategories {
            child.flatten_into(level + 1, flat);
        }
    }
}

/// One row of a flattened tree, annotated with its depth.
///
/// `level` is 0 for roots and grows by one per nesting step. Admin tables
/// indent names by level so the hierarchy stays readable in a flat list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatCategory {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<CategoryId>,
    pub level: usize,
}

/// The assembled category hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryTree {
    /// Top-level categories with their subtrees, in input order.
    pub roots: Vec<CategoryNode>,
    /// Ids of rows excluded because their parent chain is broken, sorted.
    pub orphans: Vec<CategoryId>,
}

impl CategoryTree {
    /// Assemble a tree from flat rows.
    ///
    /// Rows are grouped by `parent_id` in one pass, so assembly is O(n) in
    /// the number of rows regardless of nesting depth. Sibling order
    /// follows input order; callers that want positional ordering sort the
    /// rows before building.
    #[must_use]
    pub fn build(records: Vec<Category>) -> Self {
        let mut buckets: HashMap<Option<CategoryId>, Vec<Category>> = HashMap::new();
        for record in records {
            buckets.entry(record.parent_id).or_default().push(record);
        }

        let roots = Self::attach(None, &mut buckets);

        // Whatever is still bucketed was never reached from a root: its
        // parent row is missing, or it sits on a cycle.
        let mut orphans: Vec<CategoryId> = buckets
            .into_values()
            .flatten()
            .map(|record| record.id)
            .collect();
        orphans.sort_unstable();

        Self { roots, orphans }
    }

    fn attach(
        parent: Option<CategoryId>,
        buckets: &mut HashMap<Option<CategoryId>, Vec<Category>>,
    ) -> Vec<CategoryNode> {
        buckets.remove(&parent).map_or_else(Vec::new, |records| {
            records
                .into_iter()
                .map(|category| {
                    let subcategories = Self::attach(Some(category.id), buckets);
                    CategoryNode {
                        category,
                        subcategories,
                    }
                })
                .collect()
        })
    }

    /// Number of categories in the tree (orphans excluded).
    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.iter().map(CategoryNode::count).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Find a node anywhere in the tree by id.
    #[must_use]
    pub fn find(&self, id: CategoryId) -> Option<&CategoryNode> {
        self.roots.iter().find_map(|root| root.find(id))
    }

    /// Find a node anywhere in the tree by slug.
    #[must_use]
    pub fn find_by_slug(&self, slug: &str) -> Option<&CategoryNode> {
        self.roots.iter().find_map(|root| root.find_by_slug(slug))
    }

    /// Ids of a category and all its descendants, in depth-first order.
    ///
    /// Used to widen a category page query to products in subcategories.
    /// Returns an empty list for ids not in the tree.
    #[must_use]
    pub fn subtree_ids(&self, id: CategoryId) -> Vec<CategoryId> {
        self.find(id).map_or_else(Vec::new, |node| {
            let mut ids = Vec::new();
            node.collect_ids(&mut ids);
            ids
        })
    }

    /// Chain of categories from a root down to the given id, for breadcrumbs.
    ///
    /// Empty when the id is not in the tree.
    #[must_use]
    pub fn path_to(&self, id: CategoryId) -> Vec<&Category> {
        fn walk<'a>(node: &'a CategoryNode, id: CategoryId, trail: &mut Vec<&'a Category>) -> bool {
            trail.push(&node.category);
            if node.category.id == id {
                return true;
            }
            for child in &node.subcategories {
                if walk(child, id, trail) {
                    return true;
                }
            }
            trail.pop();
            false
        }

        let mut trail = Vec::new();
        for root in &self.roots {
            if walk(root, id, &mut trail) {
                return trail;
            }
            trail.clear();
        }
        trail
    }

    /// Depth-first flattening with level annotations.
    ///
    /// Every category in the tree appears exactly once, parents before
    /// their children, siblings in tree order.
    #[must_use]
    pub fn flatten(&self) -> Vec<FlatCategory> {
        let mut flat = Vec::with_capacity(self.len());
        for root in &self.roots {
            root.flatten_into(0, &mut flat);
        }
        flat
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn category(id: i32, parent: Option<i32>, name: &str) -> Category {
        let at = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
        Category {
            id: CategoryId::new(id),
            name: name.to_owned(),
            slug: name.to_lowercase().replace(' ', "-"),
            parent_id: parent.map(CategoryId::new),
            position: id,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_build_nests_children_under_parents() {
        let tree = CategoryTree::build(vec![
            category(1, None, "Dogs"),
            category(2, Some(1), "Dog Food"),
            category(3, Some(1), "Dog Toys"),
        ]);

        assert_eq!(tree.roots.len(), 1);
        assert_eq!(tree.roots[0].category.name, "Dogs");
        assert_eq!(tree.roots[0].subcategories.len(), 2);
        assert_eq!(tree.roots[0].subcategories[0].category.name, "Dog Food");
        assert_eq!(tree.roots[0].subcategories[1].category.name, "Dog Toys");
        assert!(tree.orphans.is_empty());
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_flatten_levels_and_order() {
        let tree = CategoryTree::build(vec![
            category(1, None, "Dogs"),
            category(2, Some(1), "Dog Food"),
            category(3, Some(2), "Dry Food"),
            category(4, None, "Cats"),
        ]);

        let flat = tree.flatten();
        let summary: Vec<(i32, usize)> = flat
            .iter()
            .map(|entry| (entry.id.as_i32(), entry.level))
            .collect();
        assert_eq!(summary, vec![(1, 0), (2, 1), (3, 2), (4, 0)]);
    }

    #[test]
    fn test_flatten_returns_every_built_category_once() {
        let input = vec![
            category(1, None, "Dogs"),
            category(2, Some(1), "Dog Food"),
            category(3, Some(1), "Dog Toys"),
            category(4, Some(2), "Dry Food"),
            category(5, None, "Cats"),
        ];
        let mut expected: Vec<(i32, Option<i32>)> = input
            .iter()
            .map(|c| (c.id.as_i32(), c.parent_id.map(|p| p.as_i32())))
            .collect();

        let tree = CategoryTree::build(input);
        let mut seen: Vec<(i32, Option<i32>)> = tree
            .flatten()
            .iter()
            .map(|entry| (entry.id.as_i32(), entry.parent_id.map(|p| p.as_i32())))
            .collect();

        expected.sort_unstable();
        seen.sort_unstable();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_orphan_is_excluded_and_reported() {
        let tree = CategoryTree::build(vec![
            category(1, None, "Dogs"),
            category(7, Some(99), "Lost"),
        ]);

        assert_eq!(tree.len(), 1);
        assert!(tree.find(CategoryId::new(7)).is_none());
        assert_eq!(tree.orphans, vec![CategoryId::new(7)]);
    }

    #[test]
    fn test_orphan_descendants_are_excluded_too() {
        // 7's parent is missing; 8 hangs off 7, so it is unreachable as well.
        let tree = CategoryTree::build(vec![
            category(1, None, "Dogs"),
            category(7, Some(99), "Lost"),
            category(8, Some(7), "Lost Child"),
        ]);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.orphans, vec![CategoryId::new(7), CategoryId::new(8)]);
    }

    #[test]
    fn test_cycle_terminates_and_reports_members() {
        let tree = CategoryTree::build(vec![
            category(1, None, "Dogs"),
            category(2, Some(3), "A"),
            category(3, Some(2), "B"),
        ]);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.orphans, vec![CategoryId::new(2), CategoryId::new(3)]);
    }

    #[test]
    fn test_sibling_order_follows_input_order() {
        let tree = CategoryTree::build(vec![
            category(5, None, "Birds"),
            category(2, None, "Cats"),
            category(9, None, "Dogs"),
        ]);

        let names: Vec<&str> = tree
            .roots
            .iter()
            .map(|node| node.category.name.as_str())
            .collect();
        assert_eq!(names, vec!["Birds", "Cats", "Dogs"]);
    }

    #[test]
    fn test_empty_input() {
        let tree = CategoryTree::build(Vec::new());
        assert!(tree.is_empty());
        assert!(tree.flatten().is_empty());
        assert!(tree.orphans.is_empty());
    }

    #[test]
    fn test_subtree_ids() {
        let tree = CategoryTree::build(vec![
            category(1, None, "Dogs"),
            category(2, Some(1), "Dog Food"),
            category(3, Some(2), "Dry Food"),
            category(4, None, "Cats"),
        ]);

        let ids: Vec<i32> = tree
            .subtree_ids(CategoryId::new(1))
            .iter()
            .map(CategoryId::as_i32)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(tree.subtree_ids(CategoryId::new(42)).is_empty());
    }

    #[test]
    fn test_path_to_builds_breadcrumb_chain() {
        let tree = CategoryTree::build(vec![
            category(1, None, "Dogs"),
            category(2, Some(1), "Dog Food"),
            category(3, Some(2), "Dry Food"),
        ]);

        let names: Vec<&str> = tree
            .path_to(CategoryId::new(3))
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Dogs", "Dog Food", "Dry Food"]);
        assert!(tree.path_to(CategoryId::new(42)).is_empty());
    }

    #[test]
    fn test_find_by_slug() {
        let tree = CategoryTree::build(vec![
            category(1, None, "Dogs"),
            category(2, Some(1), "Dog Food"),
        ]);

        let node = tree.find_by_slug("dog-food").unwrap();
        assert_eq!(node.category.id, CategoryId::new(2));
        assert!(tree.find_by_slug("hamsters").is_none());
    }
}
