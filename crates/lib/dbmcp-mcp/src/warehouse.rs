//! Analytic-warehouse adapter server.

use dbmcp_core::control::WarehouseControlPlane;
use dbmcp_core::render;
use dbmcp_core::store::Warehouse;
use rmcp::model::{
    Implementation, ListResourcesResult, PaginatedRequestParams, ReadResourceRequestParams,
    ReadResourceResult, Resource, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData, RoleServer, ServerHandler, handler::server::tool::ToolRouter, tool_handler};

use crate::helpers;

pub const TABLES_URI: &str = "redshift://tables";
pub const STATUS_URI: &str = "redshift://status";

pub(crate) const DEFAULT_SCHEMA: &str = "public";

const SERVER_INSTRUCTIONS: &str = r"redshift-mcp-server exposes an Amazon Redshift (or PostgreSQL) warehouse as MCP tools.

Queries:
- `redshift_query` runs SQL verbatim and returns every row as a JSON array of objects.

Catalog (schema defaults to `public`):
- `redshift_list_tables` lists base tables of a schema.
- `redshift_describe_table` returns column name, data type, nullability, and default.
- `redshift_get_sample_data` returns up to `limit` rows (default 5) of a table.

Status:
- `redshift_connection_status` opens a connection and reports `connected` or `disconnected`.
- Resources `redshift://tables` and `redshift://status` mirror the table list and status tools.

Failures come back as text starting with `Error executing query:`.";

/// MCP server over an analytic warehouse.
pub struct WarehouseMcp<W: Warehouse> {
    pub(crate) tool_router: ToolRouter<Self>,
    control: WarehouseControlPlane<W>,
}

impl<W: Warehouse> Clone for WarehouseMcp<W> {
    fn clone(&self) -> Self {
        Self {
            tool_router: self.tool_router.clone(),
            control: self.control.clone(),
        }
    }
}

impl<W: Warehouse> WarehouseMcp<W> {
    #[must_use]
    pub fn new(warehouse: W) -> Self {
        Self::with_control(WarehouseControlPlane::new(warehouse))
    }

    #[must_use]
    pub fn with_control(control: WarehouseControlPlane<W>) -> Self {
        Self {
            tool_router: Self::tool_router_warehouse(),
            control,
        }
    }

    pub const fn control(&self) -> &WarehouseControlPlane<W> {
        &self.control
    }

    #[must_use]
    pub fn resources() -> Vec<Resource> {
        vec![
            helpers::json_resource(
                TABLES_URI,
                "Tables",
                "Base tables in the public schema",
            ),
            helpers::json_resource(
                STATUS_URI,
                "Connection status",
                "Current warehouse connection status",
            ),
        ]
    }

    /// Renders a resource body.
    ///
    /// # Errors
    /// Returns a resource-not-found error for URIs this server does not serve.
    pub async fn read(&self, uri: &str) -> Result<ReadResourceResult, ErrorData> {
        let text = match uri {
            TABLES_URI => match self.control.list_tables(DEFAULT_SCHEMA).await {
                Ok(rows) => render::warehouse_rows(&rows),
                Err(err) => render::warehouse_error(&err),
            },
            STATUS_URI => render::status(&self.control.connection_status().await),
            _ => return Err(helpers::unknown_resource(uri)),
        };
        Ok(helpers::resource_text(uri, text))
    }
}

#[tool_handler]
impl<W: Warehouse> ServerHandler for WarehouseMcp<W> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: "redshift-mcp-server".to_string(),
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
