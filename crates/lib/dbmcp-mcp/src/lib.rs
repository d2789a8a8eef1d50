//! MCP servers for the dbmcp adapters.
//!
//! This crate wires the key-value and warehouse control planes into rmcp tool
//! handlers and resources, and provides the stdio and streamable HTTP runners.

mod helpers;
mod kv;
mod tools;
mod warehouse;
pub mod server;

pub use helpers::response_text;
pub use kv::RedisMcp;
pub use rmcp::handler::server::wrapper::Parameters;
pub use tools::kv::{HashSetParams, KeyParams, KeysParams, QueryTableParams, SetParams};
pub use tools::warehouse::{DescribeTableParams, ListTablesParams, QueryParams, SampleDataParams};
pub use warehouse::WarehouseMcp;

/// Resource URIs served by the key-value adapter.
pub mod kv_resources {
    pub use crate::kv::{STATUS_URI, TABLES_URI};
}

/// Resource URIs served by the warehouse adapter.
pub mod warehouse_resources {
    pub use crate::warehouse::{STATUS_URI, TABLES_URI};
}
