//! Application state shared across handlers.

use std::sync::Arc;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::warn;

use paws_core::catalog::CategoryTree;

use crate::config::StorefrontConfig;
use crate::db::{CategoryRepository, RepositoryError};

const CATEGORY_TREE_KEY: &str = "category_tree";

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    catalog_cache: Cache<&'static str, Arc<CategoryTree>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let catalog_cache = Cache::builder()
            .max_capacity(8)
            .time_to_live(config.catalog_cache_ttl)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                catalog_cache,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// The category tree, cached until the TTL expires.
    ///
    /// Admin edits show up here after at most
    /// [`StorefrontConfig::catalog_cache_ttl`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if loading categories fails on a
    /// cache miss.
    pub async fn category_tree(&self) -> Result<Arc<CategoryTree>, RepositoryError> {
        // Check cache
        if let Some(tree) = self.inner.catalog_cache.get(CATEGORY_TREE_KEY).await {
            return Ok(tree);
        }

        let categories = CategoryRepository::new(self.pool()).list_all().await?;
        let tree = Arc::new(CategoryTree::build(categories));

        if !tree.orphans.is_empty() {
            warn!(
                orphans = ?tree.orphans,
                "categories with unreachable parents excluded from tree"
            );
        }

        self.inner
            .catalog_cache
            .insert(CATEGORY_TREE_KEY, Arc::clone(&tree))
            .await;

        Ok(tree)
    }
}
