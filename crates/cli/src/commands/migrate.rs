//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! # Run all migrations (catalog schema, then session table)
//! boutique migrate
//!
//! # Run one set
//! boutique migrate admin
//! boutique migrate storefront
//! ```
//!
//! # Migration Files
//!
//! - Catalog schema: `crates/admin/migrations/`
//! - Session table: `crates/storefront/migrations/`
//!
//! Both sets share one database and one `_sqlx_migrations` table, so each
//! migrator ignores versions applied by the other.

use sqlx::PgPool;
use sqlx::migrate::Migrator;

use super::CommandError;

/// Run the catalog schema migrations.
///
/// # Errors
///
/// Returns `CommandError::Migration` if a migration fails.
pub async fn admin(pool: &PgPool) -> Result<(), CommandError> {
    tracing::info!("Running admin migrations...");
    run(sqlx::migrate!("../admin/migrations"), pool).await?;
    tracing::info!("Admin migrations complete!");
    Ok(())
}

/// Run the session table migrations.
///
/// # Errors
///
/// Returns `CommandError::Migration` if a migration fails.
pub async fn storefront(pool: &PgPool) -> Result<(), CommandError> {
    tracing::info!("Running storefront migrations...");
    run(sqlx::migrate!("../storefront/migrations"), pool).await?;
    tracing::info!("Storefront migrations complete!");
    Ok(())
}

async fn run(mut migrator: Migrator, pool: &PgPool) -> Result<(), CommandError> {
    migrator.set_ignore_missing(true);
    migrator.run(pool).await?;
    Ok(())
}
