//! Read-only catalog queries for the storefront.

use boutique_core::catalog::Product;
use boutique_core::pagination::Paginated;
use boutique_core::search::{SearchFilter, SortOrder, like_pattern};
use boutique_core::Slug;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use super::RepositoryError;

const PRODUCT_COLUMNS: &str = "id, name, slug, category, sub_category, brand, image, images, \
     price, count_in_stock, description, rating, num_reviews, delivery_time, weight, \
     is_featured, created_at, updated_at";

/// Repository for storefront catalog reads.
pub struct CatalogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Run a product search and count the unpaged matches.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either query fails.
    #[instrument(skip(self))]
    pub async fn search(&self, filter: &SearchFilter) -> Result<Paginated<Product>, RepositoryError> {
        let mut select = QueryBuilder::<Postgres>::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM catalog.product WHERE TRUE"
        ));
        push_filters(&mut select, filter);
        select
            .push(" ORDER BY ")
            .push(order_by(filter.sort))
            .push(" LIMIT ")
            .push_bind(filter.page.limit())
            .push(" OFFSET ")
            .push_bind(filter.page.offset());

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM catalog.product WHERE TRUE");
        push_filters(&mut count, filter);

        let (products, total) = tokio::try_join!(
            select.build_query_as::<Product>().fetch_all(self.pool),
            count.build_query_scalar::<i64>().fetch_one(self.pool),
        )?;

        Ok(Paginated::new(products, filter.page, total))
    }

    /// Distinct non-empty categories, sorted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<String>, RepositoryError> {
        let categories = sqlx::query_scalar::<_, String>(
            r"
            SELECT DISTINCT category
            FROM catalog.product
            WHERE category <> ''
            ORDER BY category
            ",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(categories)
    }

    /// Distinct non-empty brands, sorted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn brands(&self) -> Result<Vec<String>, RepositoryError> {
        let brands = sqlx::query_scalar::<_, String>(
            r"
            SELECT DISTINCT brand
            FROM catalog.product
            WHERE brand IS NOT NULL AND brand <> ''
            ORDER BY brand
            ",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(brands)
    }

    /// Look a product up by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM catalog.product WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;
        Ok(product)
    }
}

/// Append the `AND ...` clauses for every active filter.
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &SearchFilter) {
    if let Some(query) = &filter.query {
        builder.push(" AND name ILIKE ").push_bind(like_pattern(query));
    }
    if let Some(category) = &filter.category {
        builder.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(brand) = &filter.brand {
        builder.push(" AND brand = ").push_bind(brand.clone());
    }
    if let Some(range) = filter.price {
        builder
            .push(" AND price BETWEEN ")
            .push_bind(range.min)
            .push(" AND ")
            .push_bind(range.max);
    }
    if let Some(rating) = filter.min_rating {
        builder.push(" AND rating >= ").push_bind(rating);
    }
}

/// `ORDER BY` clause for a sort order. `id` breaks ties so paging is stable.
const fn order_by(sort: SortOrder) -> &'static str {
    match sort {
        SortOrder::Featured => "is_featured DESC, created_at DESC, id DESC",
        SortOrder::Lowest => "price ASC, id ASC",
        SortOrder::Highest => "price DESC, id DESC",
        SortOrder::TopRated => "rating DESC, num_reviews DESC, id DESC",
        SortOrder::Newest => "created_at DESC, id DESC",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use boutique_core::search::SearchParams;

    use super::*;

    fn filter(params: SearchParams) -> SearchFilter {
        params.normalized().to_filter(9)
    }

    #[test]
    fn test_unfiltered_query_has_no_clauses() {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT 1 WHERE TRUE");
        push_filters(&mut builder, &filter(SearchParams::default()));
        assert_eq!(builder.sql(), "SELECT 1 WHERE TRUE");
    }

    #[test]
    fn test_filters_are_anded_with_placeholders() {
        let params = SearchParams {
            q: "linen".to_string(),
            category: "Shirts".to_string(),
            brand: "Atelier".to_string(),
            price: "1-50".to_string(),
            rating: "4".to_string(),
            ..SearchParams::default()
        };
        let mut builder = QueryBuilder::<Postgres>::new("SELECT 1 WHERE TRUE");
        push_filters(&mut builder, &filter(params));
        assert_eq!(
            builder.sql(),
            "SELECT 1 WHERE TRUE AND name ILIKE $1 AND category = $2 AND brand = $3 \
             AND price BETWEEN $4 AND $5 AND rating >= $6"
        );
    }

    #[test]
    fn test_every_sort_has_a_tiebreak() {
        for order in SortOrder::ALL {
            assert!(order_by(order).contains("id "), "{order:?}");
        }
    }
}
