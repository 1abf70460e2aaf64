//! Core types for Boutique.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod slug;
pub mod stock;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
pub use slug::{Slug, SlugError};
pub use stock::{StockCount, StockError};
