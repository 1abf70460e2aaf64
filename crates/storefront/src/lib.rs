//! Boutique storefront library.
//!
//! Product search, product pages, and the session-held cart, served by the
//! `boutique-storefront` binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod state;
