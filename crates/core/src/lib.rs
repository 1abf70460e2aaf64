//! Boutique Core - Shared domain library.
//!
//! This crate provides the domain types and logic used by every Boutique
//! component:
//! - `storefront` - Public search, product pages, and the session cart
//! - `admin` - Catalog and user administration (REST + HTML tables)
//! - `cli` - Migrations and seed data
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP. Catalog records optionally derive `sqlx::FromRow` behind
//! the `postgres` feature so the binaries can decode rows directly into them.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, slugs, prices, stock counts, emails
//! - [`catalog`] - Product, subcategory, and user records plus their input bodies
//! - [`search`] - Query-string search parameters and filter URL construction
//! - [`pagination`] - Page requests, page counts, and page-link windows
//! - [`cart`] - Visitor cart with stock-bounded quantities

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod pagination;
pub mod search;
pub mod types;

pub use types::*;
