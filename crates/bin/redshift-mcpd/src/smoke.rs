use dbmcp_core::store::Warehouse;
use dbmcp_mcp::{
    DescribeTableParams, ListTablesParams, Parameters, QueryParams, SampleDataParams,
    WarehouseMcp, response_text,
};
use rmcp::ErrorData;

const GROUPED_QUERY: &str = "SELECT category, COUNT(*) as count FROM products GROUP BY category";

fn section(title: &str) {
    let rule = "=".repeat(50);
    println!("\n{rule}\n {title}\n{rule}");
}

/// Runs the catalog tools and one query; `false` when the warehouse is unreachable.
pub async fn run<W: Warehouse>(server: &WarehouseMcp<W>) -> Result<bool, ErrorData> {
    println!("\n[TEST] Redshift MCP Server - smoke test\n");

    section("1. Connection Status");
    let status = server.redshift_connection_status().await?;
    println!("{}", response_text(&status));
    if response_text(&status).contains("disconnected") {
        return Ok(false);
    }

    section("2. List Tables");
    let tables = server
        .redshift_list_tables(Parameters(ListTablesParams { schema: None }))
        .await?;
    println!("{}", response_text(&tables));

    section("3. Describe Users Table");
    let columns = server
        .redshift_describe_table(Parameters(DescribeTableParams {
            table_name: "users".to_string(),
            schema: None,
        }))
        .await?;
    println!("{}", response_text(&columns));

    section("4. Sample Data from Products");
    let sample = server
        .redshift_get_sample_data(Parameters(SampleDataParams {
            table_name: "products".to_string(),
            limit: None,
            schema: None,
        }))
        .await?;
    println!("{}", response_text(&sample));

    section("5. Custom SQL Query");
    let grouped = server
        .redshift_query(Parameters(QueryParams {
            sql: GROUPED_QUERY.to_string(),
        }))
        .await?;
    println!("{}", response_text(&grouped));

    println!("\n[SUCCESS] All steps completed!\n");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use dbmcp_core::store::{Row, WarehouseEndpoint, WarehouseResult};

    use super::*;

    /// Records every call; knows only `public.products`.
    struct ScriptedWarehouse {
        endpoint: WarehouseEndpoint,
        reachable: bool,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedWarehouse {
        fn new(reachable: bool) -> Self {
            Self {
                endpoint: WarehouseEndpoint {
                    host: "warehouse.test".to_string(),
                    port: 5439,
                    database: "dev".to_string(),
                },
                reachable,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("call log poisoned").clone()
        }

        fn record(&self, call: &str) -> WarehouseResult<()> {
            self.calls.lock().expect("call log poisoned").push(call.to_string());
            if self.reachable {
                Ok(())
            } else {
                let refused =
                    std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
                Err(sqlx::Error::Io(refused).into())
            }
        }
    }

    impl Warehouse for ScriptedWarehouse {
        fn endpoint(&self) -> &WarehouseEndpoint {
            &self.endpoint
        }

        async fn ping(&self) -> WarehouseResult<()> {
            self.record("ping")
        }

        async fn fetch_rows(&self, sql: &str) -> WarehouseResult<Vec<Row>> {
            self.record(sql)?;
            if sql.contains("table_schema IN") {
                let mut relation = Row::new();
                relation.insert("table_schema".to_string(), "public".into());
                relation.insert("table_name".to_string(), "products".into());
                return Ok(vec![relation]);
            }
            Ok(Vec::new())
        }

        async fn execute(&self, sql: &str) -> WarehouseResult<u64> {
            self.record(sql)?;
            Ok(0)
        }
    }

    #[tokio::test]
    async fn reachable_warehouse_runs_every_step() {
        let server = WarehouseMcp::new(ScriptedWarehouse::new(true));

        assert!(run(&server).await.expect("smoke run should not fail"));

        let calls = server.control().warehouse().calls();
        assert_eq!(calls.first().map(String::as_str), Some("ping"));
        assert!(calls.iter().any(|sql| sql == "SELECT * FROM \"public\".\"products\" LIMIT 5"));
        assert_eq!(calls.last().map(String::as_str), Some(GROUPED_QUERY));
        assert_eq!(calls.len(), 6);
    }

    #[tokio::test]
    async fn unreachable_warehouse_stops_after_status() {
        let server = WarehouseMcp::new(ScriptedWarehouse::new(false));

        assert!(!run(&server).await.expect("smoke run should not fail"));

        assert_eq!(server.control().warehouse().calls(), ["ping"]);
    }
}
