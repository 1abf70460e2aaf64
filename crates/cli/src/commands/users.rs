//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! boutique user create -e admin@example.com -n "Admin Name" --admin
//! ```

use boutique_admin::db::UserRepository;
use boutique_core::UserId;
use boutique_core::catalog::NewUser;
use sqlx::PgPool;

use super::CommandError;

/// Create a user.
///
/// # Errors
///
/// Returns `CommandError::Validation` for a blank name or malformed email,
/// or `CommandError::Repository` if the email is taken or the insert fails.
pub async fn create(
    pool: &PgPool,
    email: &str,
    name: &str,
    is_admin: bool,
) -> Result<UserId, CommandError> {
    let user = NewUser {
        name: name.to_owned(),
        email: email.to_owned(),
        is_admin,
    };
    let email = user.validate()?;

    tracing::info!("Creating user: {} (admin: {})", email, is_admin);
    let created = UserRepository::new(pool).create(&user, &email).await?;

    tracing::info!(
        "User created successfully! ID: {}, Email: {}",
        created.id,
        created.email
    );

    Ok(created.id)
}
