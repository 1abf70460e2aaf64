//! Catalog records: products, subcategories, and users.
//!
//! Each record mirrors one stored document. JSON field names are camelCase
//! (`countInStock`, `subCategory`, `parentCategory`) so the REST payloads keep
//! the shape the storefront and admin clients already consume.
//!
//! Input bodies (`New*` for creation, `*Update` for partial updates) carry
//! their own `validate()` so handlers can reject bad input before any
//! database work happens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    Email, EmailError, Price, PriceError, ProductId, Slug, SlugError, StockCount, SubCategoryId,
    UserId,
};

/// Image served when a product has no image of its own.
pub const PLACEHOLDER_IMAGE: &str = "/static/images/placeholder.svg";

/// Stock photo used when no category-specific fallback exists.
const DEFAULT_FALLBACK_PHOTO: &str = "1515886657613-9f3515b0c78f";

/// Category-specific fallback photos for broken product images.
const CATEGORY_FALLBACK_PHOTOS: &[(&str, &str)] = &[
    ("Jackets", "1551006917-0624bb7c3cfd"),
    ("Accessories", "1523275335684-37898b6baf30"),
    ("Shoes", "1549298916-b41d501d3772"),
    ("Pants", "1541099649105-f69ad21f3246"),
    ("Home", "1513519245088-0e12902e5a38"),
    ("Electronics", "1498050108023-c5249f4df085"),
    ("Shirts", "1523381235312-3c1a403824ae"),
];

/// Highest allowed product rating.
pub const MAX_RATING: f64 = 5.0;

/// Errors raised by input validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A numeric field is below zero.
    #[error("{0} cannot be negative")]
    Negative(&'static str),

    /// The rating is outside `0..=5`.
    #[error("rating must be between 0 and 5 (got {0})")]
    RatingOutOfRange(f64),

    /// The slug could not be derived or is malformed.
    #[error("invalid slug: {0}")]
    Slug(#[from] SlugError),

    /// The email address is malformed.
    #[error("invalid email: {0}")]
    Email(#[from] EmailError),

    /// The price cannot be stored as given.
    #[error("invalid price: {0}")]
    Price(#[from] PriceError),
}

/// Reject blank strings for required fields.
fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

/// Reject blank strings for optional fields that were provided.
fn require_if_present(value: Option<&str>, field: &'static str) -> Result<(), ValidationError> {
    value.map_or(Ok(()), |v| require(v, field))
}

fn check_rating(rating: f64) -> Result<(), ValidationError> {
    if !(0.0..=MAX_RATING).contains(&rating) {
        return Err(ValidationError::RatingOutOfRange(rating));
    }
    Ok(())
}

// =============================================================================
// Products
// =============================================================================

/// A catalog item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: Slug,
    pub category: String,
    pub sub_category: Option<String>,
    pub brand: Option<String>,
    /// Primary image shown in grids.
    pub image: Option<String>,
    /// Additional gallery images.
    pub images: Vec<String>,
    pub price: Price,
    pub count_in_stock: StockCount,
    pub description: Option<String>,
    pub rating: f64,
    pub num_reviews: i32,
    /// Delivery estimate shown under the name, e.g. "2-4 days".
    pub delivery_time: Option<String>,
    pub weight: Option<String>,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Primary image URL, or the placeholder when none is set.
    #[must_use]
    pub fn image_url(&self) -> &str {
        self.image
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(PLACEHOLDER_IMAGE)
    }

    /// Stock photo to swap in when the primary image fails to load.
    #[must_use]
    pub fn fallback_image_url(&self) -> String {
        fallback_image_url(&self.category)
    }

    /// Whether at least one unit is available.
    #[must_use]
    pub const fn is_in_stock(&self) -> bool {
        self.count_in_stock.is_available()
    }
}

/// Category-keyed stock photo URL.
#[must_use]
pub fn fallback_image_url(category: &str) -> String {
    let photo_id = CATEGORY_FALLBACK_PHOTOS
        .iter()
        .find(|(name, _)| *name == category)
        .map_or(DEFAULT_FALLBACK_PHOTO, |&(_, id)| id);
    format!("https://images.unsplash.com/photo-{photo_id}?q=80&w=1020&auto=format&fit=crop")
}

/// Body for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    /// Explicit slug; derived from `name` when absent.
    #[serde(default)]
    pub slug: Option<String>,
    pub category: String,
    #[serde(default)]
    pub sub_category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub price: Price,
    #[serde(default)]
    pub count_in_stock: StockCount,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub num_reviews: i32,
    #[serde(default)]
    pub delivery_time: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
}

impl NewProduct {
    /// Check required fields and ranges.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.name, "name")?;
        require(&self.category, "category")?;
        self.price.check_storable()?;
        check_rating(self.rating)?;
        if self.num_reviews < 0 {
            return Err(ValidationError::Negative("numReviews"));
        }
        self.resolved_slug()?;
        Ok(())
    }

    /// The slug to store: the explicit one if given, else derived from the name.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Slug`] if the slug is malformed or cannot
    /// be derived.
    pub fn resolved_slug(&self) -> Result<Slug, ValidationError> {
        match self.slug.as_deref().filter(|s| !s.is_empty()) {
            Some(explicit) => Ok(Slug::parse(explicit)?),
            None => Ok(Slug::from_name(&self.name)?),
        }
    }
}

/// Body for a partial product update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub brand: Option<String>,
    pub image: Option<String>,
    pub images: Option<Vec<String>>,
    pub price: Option<Price>,
    pub count_in_stock: Option<StockCount>,
    pub description: Option<String>,
    pub rating: Option<f64>,
    pub num_reviews: Option<i32>,
    pub delivery_time: Option<String>,
    pub weight: Option<String>,
    pub is_featured: Option<bool>,
}

impl ProductUpdate {
    /// Check the provided fields.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_if_present(self.name.as_deref(), "name")?;
        require_if_present(self.category.as_deref(), "category")?;
        if let Some(price) = self.price {
            price.check_storable()?;
        }
        if let Some(rating) = self.rating {
            check_rating(rating)?;
        }
        if self.num_reviews.is_some_and(|n| n < 0) {
            return Err(ValidationError::Negative("numReviews"));
        }
        self.slug_update()?;
        Ok(())
    }

    /// How this update changes the slug: an explicit slug wins, otherwise a
    /// name in the body carries its derived slug.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Slug`] if the slug is malformed or cannot
    /// be derived from the name.
    pub fn slug_update(&self) -> Result<SlugUpdate, ValidationError> {
        if let Some(explicit) = self.slug.as_deref().filter(|s| !s.is_empty()) {
            return Ok(SlugUpdate::Set(Slug::parse(explicit)?));
        }
        match &self.name {
            Some(name) => Ok(SlugUpdate::FollowName {
                name: name.trim().to_owned(),
                slug: Slug::from_name(name)?,
            }),
            None => Ok(SlugUpdate::Keep),
        }
    }
}

/// The slug side of a product update.
///
/// Edit forms resend the whole record, so a name in the body is not by
/// itself a rename. [`SlugUpdate::FollowName`] only applies when the stored
/// name actually differs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugUpdate {
    /// Leave the stored slug alone.
    Keep,
    /// Store this slug.
    Set(Slug),
    /// Store `slug` if the product is renamed to `name`.
    FollowName { name: String, slug: Slug },
}

impl SlugUpdate {
    /// The slug to write, given the product's stored name.
    #[must_use]
    pub fn resolve(&self, stored_name: &str) -> Option<&Slug> {
        match self {
            Self::Keep => None,
            Self::Set(slug) => Some(slug),
            Self::FollowName { name, slug } => (name != stored_name).then_some(slug),
        }
    }
}

// =============================================================================
// Subcategories
// =============================================================================

/// A grouping under a parent category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct SubCategory {
    pub id: SubCategoryId,
    pub name: String,
    pub slug: Slug,
    pub parent_category: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for creating a subcategory. The slug is always derived from the name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubCategory {
    pub name: String,
    pub parent_category: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewSubCategory {
    /// Check required fields and derive the slug.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for blank fields or an underivable slug.
    pub fn validate(&self) -> Result<Slug, ValidationError> {
        require(&self.name, "name")?;
        require(&self.parent_category, "parentCategory")?;
        Ok(Slug::from_name(&self.name)?)
    }
}

/// Body for a partial subcategory update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubCategoryUpdate {
    pub name: Option<String>,
    pub parent_category: Option<String>,
    pub description: Option<String>,
}

impl SubCategoryUpdate {
    /// Check provided fields; returns the new slug when the name changes.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for blank fields or an underivable slug.
    pub fn validate(&self) -> Result<Option<Slug>, ValidationError> {
        require_if_present(self.parent_category.as_deref(), "parentCategory")?;
        match &self.name {
            Some(name) => {
                require(name, "name")?;
                Ok(Some(Slug::from_name(name)?))
            }
            None => Ok(None),
        }
    }
}

/// Products grouped by subcategory, as shown on the subcategory registry page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct SubCategorySummary {
    /// The subcategory name as written on products.
    pub name: String,
    /// Number of products carrying this subcategory.
    pub product_count: i64,
    /// Distinct parent categories the subcategory appears under, sorted.
    pub categories: Vec<String>,
}

// =============================================================================
// Users
// =============================================================================

/// A registered customer or staff member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for creating a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl NewUser {
    /// Check required fields; returns the parsed email.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for a blank name or malformed email.
    pub fn validate(&self) -> Result<Email, ValidationError> {
        require(&self.name, "name")?;
        Ok(Email::parse(&self.email)?)
    }
}

/// Body for a partial user update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub is_admin: Option<bool>,
}

impl UserUpdate {
    /// Check provided fields; returns the parsed email when one was given.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for a blank name or malformed email.
    pub fn validate(&self) -> Result<Option<Email>, ValidationError> {
        require_if_present(self.name.as_deref(), "name")?;
        self.email
            .as_deref()
            .map(Email::parse)
            .transpose()
            .map_err(ValidationError::from)
    }
}
