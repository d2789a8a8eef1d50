//! Core types and services for dbmcp.
//!
//! This crate owns the database clients behind the key-value and warehouse
//! adapters, the control planes that the MCP layer calls into, and the
//! normalizer that turns their outcomes into response text.

pub mod control;
pub mod render;
pub mod seed;
pub mod store;
