//! Sample table catalog and fixture records for dbmcp.
//!
//! Both adapters expose the same three demonstration tables (users, products,
//! orders). This crate owns their names, key layout, DDL, and seed rows so the
//! key-value and warehouse sides stay in agreement.

pub mod models;
pub mod schema;

pub use models::*;
