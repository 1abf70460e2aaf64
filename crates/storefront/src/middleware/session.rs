//! Session middleware configuration.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions. The visitor's
//! cart lives in the session under [`CART_KEY`].

use secrecy::ExposeSecret;
use sqlx::PgPool;
use tower_sessions::cookie::Key;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "boutique_session";

/// Session key holding the serialized cart.
pub const CART_KEY: &str = "cart";

/// Session expiry time in seconds (30 days).
const SESSION_EXPIRY_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Errors building the session layer.
#[derive(Debug, thiserror::Error)]
pub enum SessionConfigError {
    /// The session secret cannot be used as a signing key.
    #[error("invalid session key: {0}")]
    InvalidKey(#[from] tower_sessions::cookie::KeyError),
}

/// Create the session layer with `PostgreSQL` store and signed cookies.
///
/// # Errors
///
/// Returns `SessionConfigError::InvalidKey` if the session secret is shorter
/// than 64 bytes.
pub fn create_session_layer(
    pool: &PgPool,
    config: &StorefrontConfig,
) -> Result<SessionManagerLayer<PostgresStore, tower_sessions::service::SignedCookie>, SessionConfigError>
{
    // The session table is created by the storefront migrations
    let store = PostgresStore::new(pool.clone());
    let key = Key::try_from(config.session_secret.expose_secret().as_bytes())?;

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key))
}
