//! Reusable UI building blocks for admin templates.

pub mod data_table;
