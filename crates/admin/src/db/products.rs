//! Product repository for catalog administration.

use boutique_core::catalog::{NewProduct, Product, ProductUpdate, SlugUpdate};
use boutique_core::pagination::{PageRequest, Paginated};
use boutique_core::{ProductId, Slug};
use sqlx::PgPool;
use tracing::instrument;

use super::{RepositoryError, conflict_or};

const PRODUCT_COLUMNS: &str = "id, name, slug, category, sub_category, brand, image, images, \
     price, count_in_stock, description, rating, num_reviews, delivery_time, weight, \
     is_featured, created_at, updated_at";

fn slug_taken(slug: &Slug) -> impl FnOnce() -> String + '_ {
    move || format!("A product with slug '{slug}' already exists")
}

/// Repository for product CRUD.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// One page of products, newest first, with the total count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either query fails.
    #[instrument(skip(self))]
    pub async fn list(&self, page: PageRequest) -> Result<Paginated<Product>, RepositoryError> {
        let select = format!(
            "SELECT {PRODUCT_COLUMNS} FROM catalog.product \
             ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );

        let (products, total) = tokio::try_join!(
            sqlx::query_as::<_, Product>(&select)
                .bind(page.limit())
                .bind(page.offset())
                .fetch_all(self.pool),
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM catalog.product")
                .fetch_one(self.pool),
        )?;

        Ok(Paginated::new(products, page, total))
    }

    /// Insert a product under the given slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is already taken.
    /// Returns `RepositoryError::Database` if the insert fails otherwise.
    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create(&self, product: &NewProduct, slug: &Slug) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(&format!(
            r"
            INSERT INTO catalog.product (
                name, slug, category, sub_category, brand, image, images, price,
                count_in_stock, description, rating, num_reviews, delivery_time,
                weight, is_featured
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(product.name.trim())
        .bind(slug)
        .bind(product.category.trim())
        .bind(product.sub_category.as_deref())
        .bind(product.brand.as_deref())
        .bind(product.image.as_deref())
        .bind(&product.images)
        .bind(product.price)
        .bind(product.count_in_stock)
        .bind(product.description.as_deref())
        .bind(product.rating)
        .bind(product.num_reviews)
        .bind(product.delivery_time.as_deref())
        .bind(product.weight.as_deref())
        .bind(product.is_featured)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_or(e, slug_taken(slug)))
    }

    /// Apply a partial update. Absent fields keep their stored values, and
    /// a name-derived slug is only written when the stored name changes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    /// Returns `RepositoryError::Conflict` if the new slug is already taken.
    /// Returns `RepositoryError::Database` if the update fails otherwise.
    #[instrument(skip(self, update, slug_update))]
    pub async fn update(
        &self,
        id: ProductId,
        update: &ProductUpdate,
        slug_update: &SlugUpdate,
    ) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Lock the row so the rename check and the write see the same name
        let stored_name = sqlx::query_scalar::<_, String>(
            "SELECT name FROM catalog.product WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;
        let slug = slug_update.resolve(&stored_name);

        let product = sqlx::query_as::<_, Product>(&format!(
            r"
            UPDATE catalog.product SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                category = COALESCE($4, category),
                sub_category = COALESCE($5, sub_category),
                brand = COALESCE($6, brand),
                image = COALESCE($7, image),
                images = COALESCE($8, images),
                price = COALESCE($9, price),
                count_in_stock = COALESCE($10, count_in_stock),
                description = COALESCE($11, description),
                rating = COALESCE($12, rating),
                num_reviews = COALESCE($13, num_reviews),
                delivery_time = COALESCE($14, delivery_time),
                weight = COALESCE($15, weight),
                is_featured = COALESCE($16, is_featured),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(update.name.as_deref().map(str::trim))
        .bind(slug.map(Slug::as_str))
        .bind(update.category.as_deref().map(str::trim))
        .bind(update.sub_category.as_deref())
        .bind(update.brand.as_deref())
        .bind(update.image.as_deref())
        .bind(update.images.as_deref())
        .bind(update.price)
        .bind(update.count_in_stock)
        .bind(update.description.as_deref())
        .bind(update.rating)
        .bind(update.num_reviews)
        .bind(update.delivery_time.as_deref())
        .bind(update.weight.as_deref())
        .bind(update.is_featured)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match slug {
            Some(slug) => conflict_or(e, slug_taken(slug)),
            None => RepositoryError::Database(e),
        })?;

        tx.commit().await?;
        Ok(product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    /// Returns `RepositoryError::Database` if the delete fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM catalog.product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
