//! Boutique Admin library.
//!
//! Catalog and user administration: a JSON CRUD API under `/api/admin` and
//! server-rendered list pages under `/admin`. Exposed as a library so the
//! router can be exercised in tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod components;
pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod state;
