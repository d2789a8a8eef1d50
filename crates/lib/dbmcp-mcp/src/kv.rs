//! Key-value adapter server.

use dbmcp_core::control::KvControlPlane;
use dbmcp_core::render;
use dbmcp_core::store::KeyValueStore;
use rmcp::model::{
    Implementation, ListResourcesResult, PaginatedRequestParams, ReadResourceRequestParams,
    ReadResourceResult, Resource, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler, handler::server::tool::ToolRouter, tool_handler};

use crate::helpers;

pub const TABLES_URI: &str = "redis://tables";
pub const STATUS_URI: &str = "redis://status";

const SERVER_INSTRUCTIONS: &str = r"redis-mcp-server exposes a Redis database as MCP tools.

Strings:
- `redis_get`, `redis_set` (optional `expire_seconds`; 0 or absent means no expiry), `redis_delete`.

Hashes:
- `redis_hgetall` returns every field as a JSON object; `redis_hset` sets one field.

Keys:
- `redis_keys` lists keys matching a glob pattern (default `*`). It scans the whole keyspace.

Sample tables:
- `redis_list_tables` describes the `users`, `products`, and `orders` tables stored as hashes
  (`user:<id>`, `product:<id>`, `order:<id>`).
- `redis_query_table` returns every row of one table sorted by key, with the key in `_key`.

Status:
- `redis_connection_status` pings the server and reports `connected` or `disconnected`.
- Resources `redis://tables` and `redis://status` mirror the catalog and status tools.";

/// MCP server over a key-value store.
pub struct RedisMcp<S: KeyValueStore> {
    pub(crate) tool_router: ToolRouter<Self>,
    control: KvControlPlane<S>,
}

impl<S: KeyValueStore> Clone for RedisMcp<S> {
    fn clone(&self) -> Self {
        Self {
            tool_router: self.tool_router.clone(),
            control: self.control.clone(),
        }
    }
}

impl<S: KeyValueStore> RedisMcp<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_control(KvControlPlane::new(store))
    }

    #[must_use]
    pub fn with_control(control: KvControlPlane<S>) -> Self {
        let tool_router = Self::tool_router_strings()
            + Self::tool_router_hashes()
            + Self::tool_router_catalog();
        Self {
            tool_router,
            control,
        }
    }

    pub const fn control(&self) -> &KvControlPlane<S> {
        &self.control
    }

    #[must_use]
    pub fn resources() -> Vec<Resource> {
        vec![
            helpers::json_resource(
                TABLES_URI,
                "Sample tables",
                "Logical tables stored as hashes, with key patterns",
            ),
            helpers::json_resource(STATUS_URI, "Connection status", "Current Redis connection status"),
        ]
    }

    /// Renders a resource body.
    ///
    /// # Errors
    /// Returns a resource-not-found error for URIs this server does not serve.
    pub async fn read(&self, uri: &str) -> Result<ReadResourceResult, ErrorData> {
        let text = match uri {
            TABLES_URI => render::kv_tables(&self.control.list_tables()),
            STATUS_URI => render::status(&self.control.connection_status().await),
            _ => return Err(helpers::unknown_resource(uri)),
        };
        Ok(helpers::resource_text(uri, text))
    }
}

#[tool_handler]
impl<S: KeyValueStore> ServerHandler for RedisMcp<S> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "redis-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        Ok(ListResourcesResult::with_all_items(Self::resources()))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        self.read(&request.uri).await
    }
}
