//! Subcategory repository.
//!
//! Subcategories are managed records, while the registry page groups products
//! by the free-text `sub_category` they carry.

use boutique_core::catalog::{NewSubCategory, SubCategory, SubCategorySummary, SubCategoryUpdate};
use boutique_core::{Slug, SubCategoryId};
use sqlx::PgPool;
use tracing::instrument;

use super::{RepositoryError, conflict_or};

const SUB_CATEGORY_COLUMNS: &str =
    "id, name, slug, parent_category, description, created_at, updated_at";

/// Repository for subcategory CRUD and product grouping.
pub struct SubCategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SubCategoryRepository<'a> {
    /// Create a new subcategory repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All subcategories, by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<SubCategory>, RepositoryError> {
        let rows = sqlx::query_as::<_, SubCategory>(&format!(
            "SELECT {SUB_CATEGORY_COLUMNS} FROM catalog.sub_category ORDER BY name, id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Products grouped by their subcategory name, with the parent
    /// categories each appears under.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn summaries(&self) -> Result<Vec<SubCategorySummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, SubCategorySummary>(
            r"
            SELECT sub_category AS name,
                   COUNT(*) AS product_count,
                   ARRAY_AGG(DISTINCT category ORDER BY category) AS categories
            FROM catalog.product
            WHERE sub_category IS NOT NULL AND sub_category <> ''
            GROUP BY sub_category
            ORDER BY sub_category
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Insert a subcategory.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is already taken.
    /// Returns `RepositoryError::Database` if the insert fails otherwise.
    #[instrument(skip(self, sub_category), fields(name = %sub_category.name))]
    pub async fn create(
        &self,
        sub_category: &NewSubCategory,
        slug: &Slug,
    ) -> Result<SubCategory, RepositoryError> {
        sqlx::query_as::<_, SubCategory>(&format!(
            r"
            INSERT INTO catalog.sub_category (name, slug, parent_category, description)
            VALUES ($1, $2, $3, $4)
            RETURNING {SUB_CATEGORY_COLUMNS}
            "
        ))
        .bind(sub_category.name.trim())
        .bind(slug)
        .bind(sub_category.parent_category.trim())
        .bind(sub_category.description.as_deref())
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_or(e, || format!("Subcategory '{slug}' already exists")))
    }

    /// Apply a partial update; a new name brings a new slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no subcategory has this ID.
    /// Returns `RepositoryError::Conflict` if the new slug is already taken.
    /// Returns `RepositoryError::Database` if the update fails otherwise.
    #[instrument(skip(self, update))]
    pub async fn update(
        &self,
        id: SubCategoryId,
        update: &SubCategoryUpdate,
        slug: Option<&Slug>,
    ) -> Result<SubCategory, RepositoryError> {
        sqlx::query_as::<_, SubCategory>(&format!(
            r"
            UPDATE catalog.sub_category SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                parent_category = COALESCE($4, parent_category),
                description = COALESCE($5, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SUB_CATEGORY_COLUMNS}
            "
        ))
        .bind(id)
        .bind(update.name.as_deref().map(str::trim))
        .bind(slug.map(Slug::as_str))
        .bind(update.parent_category.as_deref().map(str::trim))
        .bind(update.description.as_deref())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            conflict_or(e, || {
                format!(
                    "Subcategory '{}' already exists",
                    slug.map_or("", Slug::as_str)
                )
            })
        })?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete a subcategory. Products keep their `sub_category` text.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no subcategory has this ID.
    /// Returns `RepositoryError::Database` if the delete fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: SubCategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM catalog.sub_category WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
