#![allow(clippy::missing_errors_doc)]

use dbmcp_core::control::ControlError;
use dbmcp_core::render;
use dbmcp_core::store::{Row, Warehouse};
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::warehouse::DEFAULT_SCHEMA;
use crate::{WarehouseMcp, helpers};

const DEFAULT_SAMPLE_LIMIT: u32 = 5;

/// Parameters for running raw SQL.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct QueryParams {
    /// The SQL query to execute.
    pub sql: String,
}

/// Parameters for listing tables.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListTablesParams {
    /// Schema name; defaults to `public`.
    pub schema: Option<String>,
}

/// Parameters for describing a table.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct DescribeTableParams {
    pub table_name: String,
    /// Schema name; defaults to `public`.
    pub schema: Option<String>,
}

/// Parameters for sampling rows.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SampleDataParams {
    pub table_name: String,
    /// Number of rows to return; defaults to 5.
    pub limit: Option<u32>,
    /// Schema name; defaults to `public`.
    pub schema: Option<String>,
}

fn rows_text(outcome: Result<Vec<Row>, ControlError>) -> CallToolResult {
    helpers::tool_text(
        outcome
            .map(|rows| render::warehouse_rows(&rows))
            .map_err(|err| render::warehouse_error(&err)),
    )
}

fn schema_or_default(schema: Option<&str>) -> &str {
    schema.unwrap_or(DEFAULT_SCHEMA)
}

#[tool_router(router = tool_router_warehouse, vis = "pub")]
impl<W: Warehouse> WarehouseMcp<W> {
    #[tool(description = "Execute a SQL query on Redshift and return results as JSON.")]
    pub async fn redshift_query(
        &self,
        Parameters(params): Parameters<QueryParams>,
    ) -> Result<CallToolResult, ErrorData> {
        Ok(rows_text(self.control().query(&params.sql).await))
    }

    #[tool(description = "List all tables in a schema (default 'public').")]
    pub async fn redshift_list_tables(
        &self,
        Parameters(params): Parameters<ListTablesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let schema = schema_or_default(params.schema.as_deref());
        Ok(rows_text(self.control().list_tables(schema).await))
    }

    #[tool(description = "Get the column definitions for a table.")]
    pub async fn redshift_describe_table(
        &self,
        Parameters(params): Parameters<DescribeTableParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let schema = schema_or_default(params.schema.as_deref());
        Ok(rows_text(
            self.control().describe_table(&params.table_name, schema).await,
        ))
    }

    #[tool(description = "Get sample rows from a table (default limit 5).")]
    pub async fn redshift_get_sample_data(
        &self,
        Parameters(params): Parameters<SampleDataParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let schema = schema_or_default(params.schema.as_deref());
        let limit = params.limit.unwrap_or(DEFAULT_SAMPLE_LIMIT);
        Ok(rows_text(
            self.control()
                .get_sample_data(&params.table_name, limit, schema)
                .await,
        ))
    }

    #[tool(description = "Check the Redshift connection status.")]
    pub async fn redshift_connection_status(&self) -> Result<CallToolResult, ErrorData> {
        let status = self.control().connection_status().await;
        Ok(helpers::tool_text(Ok(render::status(&status))))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use dbmcp_core::store::{WarehouseEndpoint, WarehouseError, WarehouseResult};
    use serde_json::json;

    use super::*;
    use crate::helpers::{response_text, resource_body};
    use crate::warehouse::{STATUS_URI, TABLES_URI};

    /// Answers every query with the same rows and records the SQL it saw.
    struct EchoWarehouse {
        endpoint: WarehouseEndpoint,
        rows: Vec<Row>,
        seen: Mutex<Vec<String>>,
    }

    impl EchoWarehouse {
        fn new(rows: Vec<Row>) -> Self {
            Self {
                endpoint: WarehouseEndpoint {
                    host: "localhost".to_string(),
                    port: 5439,
                    database: "dev".to_string(),
                },
                rows,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn last_sql(&self) -> String {
            self.seen.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    impl Warehouse for EchoWarehouse {
        fn endpoint(&self) -> &WarehouseEndpoint {
            &self.endpoint
        }

        async fn ping(&self) -> WarehouseResult<()> {
            Ok(())
        }

        async fn fetch_rows(&self, sql: &str) -> WarehouseResult<Vec<Row>> {
            self.seen.lock().unwrap().push(sql.to_string());
            if sql.contains("nonsense") {
                return Err(WarehouseError::InvalidInput("syntax error".to_string()));
            }
            Ok(self.rows.clone())
        }

        async fn execute(&self, sql: &str) -> WarehouseResult<u64> {
            self.seen.lock().unwrap().push(sql.to_string());
            Ok(0)
        }
    }

    fn table_row(name: &str) -> Row {
        let mut row = Row::new();
        row.insert("table_name".to_string(), json!(name));
        row
    }

    #[test]
    fn router_exposes_every_tool() {
        let server = WarehouseMcp::new(EchoWarehouse::new(Vec::new()));
        let names: Vec<_> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        assert_eq!(
            names,
            [
                "redshift_connection_status",
                "redshift_describe_table",
                "redshift_get_sample_data",
                "redshift_list_tables",
                "redshift_query",
            ]
        );
    }

    #[tokio::test]
    async fn query_returns_indented_rows() {
        let server = WarehouseMcp::new(EchoWarehouse::new(vec![table_row("users")]));
        let result = server
            .redshift_query(Parameters(QueryParams {
                sql: "SELECT table_name FROM t".to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(response_text(&result), "[\n  {\n    \"table_name\": \"users\"\n  }\n]");
    }

    #[tokio::test]
    async fn failures_carry_the_query_prefix() {
        let server = WarehouseMcp::new(EchoWarehouse::new(Vec::new()));
        let result = server
            .redshift_query(Parameters(QueryParams {
                sql: "nonsense".to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(true));
        assert!(response_text(&result).starts_with("Error executing query:"));
    }

    #[tokio::test]
    async fn list_tables_defaults_to_public() {
        let server = WarehouseMcp::new(EchoWarehouse::new(Vec::new()));
        let result = server
            .redshift_list_tables(Parameters(ListTablesParams { schema: None }))
            .await
            .unwrap();
        assert_eq!(response_text(&result), "[]");
        assert!(server.control().warehouse().last_sql().contains("table_schema = 'public'"));
    }

    #[tokio::test]
    async fn sample_data_defaults_to_five_rows() {
        let mut resolved = table_row("products");
        resolved.insert("table_schema".to_string(), json!("public"));
        let server = WarehouseMcp::new(EchoWarehouse::new(vec![resolved]));
        server
            .redshift_get_sample_data(Parameters(SampleDataParams {
                table_name: "products".to_string(),
                limit: None,
                schema: None,
            }))
            .await
            .unwrap();
        assert_eq!(
            server.control().warehouse().last_sql(),
            "SELECT * FROM \"public\".\"products\" LIMIT 5"
        );
    }

    #[tokio::test]
    async fn resources_mirror_tools() {
        let server = WarehouseMcp::new(EchoWarehouse::new(vec![table_row("orders")]));
        let tables = server.read(TABLES_URI).await.unwrap();
        assert!(resource_body(&tables).contains("\"table_name\": \"orders\""));

        let status = server.read(STATUS_URI).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(resource_body(&status)).unwrap();
        assert_eq!(value["status"], "connected");
        assert_eq!(value["database"], "dev");

        assert!(server.read("redshift://nope").await.is_err());
    }
}
