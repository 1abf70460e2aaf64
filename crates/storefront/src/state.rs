//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::debug;

use crate::config::StorefrontConfig;
use crate::db::{CatalogRepository, RepositoryError};

/// How long facet lists stay cached.
const FACET_TTL: Duration = Duration::from_secs(5 * 60);

/// A cached list of distinct filter values.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
enum FacetKind {
    Categories,
    Brands,
}

/// Distinct values offered as search filters.
#[derive(Debug, Clone, Default)]
pub struct Facets {
    pub categories: Arc<Vec<String>>,
    pub brands: Arc<Vec<String>>,
}

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
    facets: Cache<FacetKind, Arc<Vec<String>>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let facets = Cache::builder()
            .max_capacity(16)
            .time_to_live(FACET_TTL)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                facets,
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

    /// Category and brand lists, cached for five minutes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if a list has to be loaded and the query fails.
    pub async fn facets(&self) -> Result<Facets, RepositoryError> {
        let (categories, brands) = tokio::try_join!(
            self.facet(FacetKind::Categories),
            self.facet(FacetKind::Brands),
        )?;
        Ok(Facets { categories, brands })
    }

    async fn facet(&self, kind: FacetKind) -> Result<Arc<Vec<String>>, RepositoryError> {
        if let Some(values) = self.inner.facets.get(&kind).await {
            debug!(?kind, "Cache hit for facet");
            return Ok(values);
        }

        let repo = CatalogRepository::new(self.pool());
        let values = Arc::new(match kind {
            FacetKind::Categories => repo.categories().await?,
            FacetKind::Brands => repo.brands().await?,
        });

        self.inner.facets.insert(kind, Arc::clone(&values)).await;
        Ok(values)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sqlx::postgres::PgPoolOptions;

    use super::*;
    use crate::config::tests::test_config;

    #[tokio::test]
    async fn test_cached_facets_skip_the_database() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/boutique_test")
            .unwrap();
        let state = AppState::new(test_config(), pool);

        let categories = Arc::new(vec!["Bags".to_string(), "Shoes".to_string()]);
        let brands = Arc::new(vec!["Field Co".to_string()]);
        state
            .inner
            .facets
            .insert(FacetKind::Categories, Arc::clone(&categories))
            .await;
        state
            .inner
            .facets
            .insert(FacetKind::Brands, Arc::clone(&brands))
            .await;

        let facets = state.facets().await.unwrap();
        assert_eq!(facets.categories, categories);
        assert_eq!(facets.brands, brands);
    }
}
