//! Integration tests for Boutique.
//!
//! The tests drive running servers over HTTP, so they are `#[ignore]`d by
//! default.
//!
//! # Running Tests
//!
//! ```bash
//! # Prepare the database
//! cargo run -p boutique-cli -- migrate
//! cargo run -p boutique-cli -- seed
//!
//! # Start both servers, then
//! cargo test -p boutique-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_BASE_URL` - admin server (default `http://localhost:3001`)
//! - `STOREFRONT_BASE_URL` - storefront server (default `http://localhost:3000`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;

pub use boutique_core::catalog::{Product, SubCategory, User};

/// Base URL for the admin server.
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Base URL for the storefront server.
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// HTTP client that keeps cookies between requests and does not follow
/// redirects, so session-backed flows and redirect targets can be asserted.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
#[allow(clippy::expect_used)]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// A name unique to one test run, for rows the test creates and removes.
#[must_use]
pub fn unique_name(prefix: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix} {}", suffix.get(..8).unwrap_or(&suffix))
}
