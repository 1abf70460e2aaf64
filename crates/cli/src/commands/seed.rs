//! Seed the catalog with sample data.
//!
//! Rows are keyed by slug (products, subcategories) or email (users) and
//! inserted with `ON CONFLICT DO NOTHING`, so running the seed twice leaves
//! the first run's data untouched.

use boutique_core::catalog::ValidationError;
use boutique_core::{Email, Price, Slug};
use sqlx::PgPool;
use tracing::info;

use super::CommandError;

/// A sample product.
struct SeedProduct {
    name: &'static str,
    category: &'static str,
    sub_category: &'static str,
    brand: &'static str,
    price_cents: i64,
    stock: i32,
    rating: f64,
    num_reviews: i32,
    delivery_time: &'static str,
    description: &'static str,
}

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Linen Camp Shirt",
        category: "Shirts",
        sub_category: "Casual",
        brand: "Atelier Nord",
        price_cents: 8_900,
        stock: 14,
        rating: 4.5,
        num_reviews: 38,
        delivery_time: "2-3 days",
        description: "Relaxed camp collar shirt in washed Belgian linen.",
    },
    SeedProduct {
        name: "Oxford Button Down",
        category: "Shirts",
        sub_category: "Formal",
        brand: "Hollis & Vane",
        price_cents: 11_500,
        stock: 22,
        rating: 4.2,
        num_reviews: 51,
        delivery_time: "2-3 days",
        description: "Heavyweight oxford cloth with a soft roll collar.",
    },
    SeedProduct {
        name: "Flannel Overshirt",
        category: "Shirts",
        sub_category: "Casual",
        brand: "Field Co",
        price_cents: 12_800,
        stock: 0,
        rating: 4.7,
        num_reviews: 19,
        delivery_time: "5-7 days",
        description: "Brushed cotton flannel with chest pockets.",
    },
    SeedProduct {
        name: "Wool Overcoat",
        category: "Coats",
        sub_category: "Outerwear",
        brand: "Hollis & Vane",
        price_cents: 42_000,
        stock: 6,
        rating: 4.8,
        num_reviews: 12,
        delivery_time: "3-5 days",
        description: "Double-faced wool overcoat, unlined, knee length.",
    },
    SeedProduct {
        name: "Waxed Field Jacket",
        category: "Coats",
        sub_category: "Outerwear",
        brand: "Field Co",
        price_cents: 29_500,
        stock: 9,
        rating: 4.4,
        num_reviews: 27,
        delivery_time: "3-5 days",
        description: "Waxed cotton with a corduroy collar and four pockets.",
    },
    SeedProduct {
        name: "Quilted Liner Vest",
        category: "Coats",
        sub_category: "Layering",
        brand: "Atelier Nord",
        price_cents: 9_800,
        stock: 17,
        rating: 3.9,
        num_reviews: 8,
        delivery_time: "2-3 days",
        description: "Lightweight quilted vest that layers under a coat.",
    },
    SeedProduct {
        name: "Canvas Tote",
        category: "Bags",
        sub_category: "Totes",
        brand: "Field Co",
        price_cents: 4_500,
        stock: 40,
        rating: 4.6,
        num_reviews: 64,
        delivery_time: "1-2 days",
        description: "Heavy canvas tote with leather handles.",
    },
    SeedProduct {
        name: "Leather Weekender",
        category: "Bags",
        sub_category: "Travel",
        brand: "Hollis & Vane",
        price_cents: 38_000,
        stock: 3,
        rating: 4.9,
        num_reviews: 15,
        delivery_time: "5-7 days",
        description: "Full-grain leather duffel sized for carry-on.",
    },
    SeedProduct {
        name: "Roll Top Backpack",
        category: "Bags",
        sub_category: "Travel",
        brand: "Atelier Nord",
        price_cents: 16_500,
        stock: 11,
        rating: 4.3,
        num_reviews: 33,
        delivery_time: "2-3 days",
        description: "Water-resistant roll top with a padded laptop sleeve.",
    },
    SeedProduct {
        name: "Suede Chukka Boot",
        category: "Shoes",
        sub_category: "Boots",
        brand: "Hollis & Vane",
        price_cents: 21_000,
        stock: 8,
        rating: 4.1,
        num_reviews: 22,
        delivery_time: "3-5 days",
        description: "Unlined suede chukka on a crepe sole.",
    },
    SeedProduct {
        name: "Canvas Low Sneaker",
        category: "Shoes",
        sub_category: "Sneakers",
        brand: "Field Co",
        price_cents: 7_500,
        stock: 26,
        rating: 4.0,
        num_reviews: 47,
        delivery_time: "1-2 days",
        description: "Vulcanised canvas sneaker in natural ecru.",
    },
    SeedProduct {
        name: "Leather Card Holder",
        category: "Accessories",
        sub_category: "Totes",
        brand: "Atelier Nord",
        price_cents: 3_900,
        stock: 55,
        rating: 4.4,
        num_reviews: 71,
        delivery_time: "1-2 days",
        description: "Four-slot card holder in vegetable-tanned leather.",
    },
];

/// `(name, parent category, description)`
const SUB_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Casual", "Shirts", "Everyday shirts"),
    ("Formal", "Shirts", "Collared shirts for work"),
    ("Outerwear", "Coats", "Coats and jackets"),
    ("Layering", "Coats", "Vests and liners"),
    ("Totes", "Bags", "Open carry bags"),
    ("Travel", "Bags", "Bags for trips"),
    ("Boots", "Shoes", "Ankle and chukka boots"),
    ("Sneakers", "Shoes", "Casual sneakers"),
];

/// `(name, email, is_admin)`
const USERS: &[(&str, &str, bool)] = &[
    ("Store Admin", "admin@boutique.test", true),
    ("Sample Customer", "customer@boutique.test", false),
];

/// Counts from a seed run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub inserted: u64,
    pub skipped: u64,
}

impl SeedSummary {
    fn record(&mut self, rows_affected: u64) {
        if rows_affected == 0 {
            self.skipped += 1;
        } else {
            self.inserted += rows_affected;
        }
    }
}

/// Insert the sample catalog.
///
/// # Errors
///
/// Returns `CommandError::Validation` or `CommandError::InvalidSeed` if seed
/// data is malformed, or `CommandError::Database` if an insert fails.
pub async fn run(pool: &PgPool) -> Result<SeedSummary, CommandError> {
    let mut summary = SeedSummary::default();

    for &(name, parent_category, description) in SUB_CATEGORIES {
        let slug = Slug::from_name(name).map_err(ValidationError::from)?;
        let result = sqlx::query(
            r"
            INSERT INTO catalog.sub_category (name, slug, parent_category, description)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (slug) DO NOTHING
            ",
        )
        .bind(name)
        .bind(&slug)
        .bind(parent_category)
        .bind(description)
        .execute(pool)
        .await?;
        summary.record(result.rows_affected());
    }

    for product in PRODUCTS {
        let slug = Slug::from_name(product.name).map_err(ValidationError::from)?;
        let price = Price::from_cents(product.price_cents)
            .map_err(|e| CommandError::InvalidSeed(format!("{}: {e}", product.name)))?;
        let result = sqlx::query(
            r"
            INSERT INTO catalog.product (
                name, slug, category, sub_category, brand, price, count_in_stock,
                rating, num_reviews, delivery_time, description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (slug) DO NOTHING
            ",
        )
        .bind(product.name)
        .bind(&slug)
        .bind(product.category)
        .bind(product.sub_category)
        .bind(product.brand)
        .bind(price)
        .bind(product.stock)
        .bind(product.rating)
        .bind(product.num_reviews)
        .bind(product.delivery_time)
        .bind(product.description)
        .execute(pool)
        .await?;
        summary.record(result.rows_affected());
    }

    for &(name, email, is_admin) in USERS {
        let email = Email::parse(email).map_err(ValidationError::from)?;
        let result = sqlx::query(
            r#"
            INSERT INTO catalog."user" (name, email, is_admin)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(name)
        .bind(email.as_str())
        .bind(is_admin)
        .execute(pool)
        .await?;
        summary.record(result.rows_affected());
    }

    info!(
        inserted = summary.inserted,
        skipped = summary.skipped,
        "Seeding complete!"
    );

    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_seed_products_are_valid() {
        let mut slugs = HashSet::new();
        for product in PRODUCTS {
            let slug = Slug::from_name(product.name).unwrap();
            assert!(slugs.insert(slug), "duplicate slug for {}", product.name);
            assert!(Price::from_cents(product.price_cents).is_ok());
            assert!(product.stock >= 0);
            assert!((0.0..=5.0).contains(&product.rating));
        }
    }

    #[test]
    fn test_seed_sub_categories_cover_products() {
        let names: HashSet<&str> = SUB_CATEGORIES.iter().map(|&(name, _, _)| name).collect();
        for product in PRODUCTS {
            assert!(names.contains(product.sub_category), "{}", product.sub_category);
        }
    }

    #[test]
    fn test_seed_users_have_valid_emails() {
        for &(_, email, _) in USERS {
            assert!(Email::parse(email).is_ok(), "{email}");
        }
    }

    #[test]
    fn test_summary_counts_skips() {
        let mut summary = SeedSummary::default();
        summary.record(1);
        summary.record(0);
        summary.record(1);
        assert_eq!(
            summary,
            SeedSummary {
                inserted: 2,
                skipped: 1
            }
        );
    }
}
