//! MCP tool modules.
//!
//! Key-value tools are split into string, hash, and catalog routers; the
//! warehouse tools share one router.

pub mod kv;
pub mod warehouse;
