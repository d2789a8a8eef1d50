use std::sync::Arc;

use tracing::debug;

use super::{ConnectionStatus, ControlError, sql};
use crate::store::{Row, Warehouse, WarehouseEndpoint, WarehouseError};

/// Typed operations of the warehouse adapter.
pub struct WarehouseControlPlane<W: Warehouse> {
    warehouse: Arc<W>,
}

impl<W: Warehouse> Clone for WarehouseControlPlane<W> {
    fn clone(&self) -> Self {
        Self {
            warehouse: Arc::clone(&self.warehouse),
        }
    }
}

impl<W: Warehouse> WarehouseControlPlane<W> {
    pub fn new(warehouse: W) -> Self {
        Self {
            warehouse: Arc::new(warehouse),
        }
    }

    pub fn warehouse(&self) -> &W {
        &self.warehouse
    }

    /// Runs caller SQL verbatim.
    ///
    /// # Errors
    /// Returns `ControlError` if connecting or executing fails.
    pub async fn query(&self, sql: &str) -> Result<Vec<Row>, ControlError> {
        Ok(self.warehouse.fetch_rows(sql).await?)
    }

    /// Base tables of a schema.
    ///
    /// # Errors
    /// Returns `ControlError` if the schema name is rejected or the catalog query fails.
    pub async fn list_tables(&self, schema: &str) -> Result<Vec<Row>, ControlError> {
        let sql = sql::list_tables_sql(schema)?;
        self.query(&sql).await
    }

    /// Column definitions of a table in ordinal order.
    ///
    /// # Errors
    /// Returns `ControlError` if a name is rejected or the catalog query fails.
    pub async fn describe_table(&self, table: &str, schema: &str) -> Result<Vec<Row>, ControlError> {
        let sql = sql::describe_table_sql(schema, table)?;
        self.query(&sql).await
    }

    /// Up to `limit` rows of a table that exists in the catalog.
    ///
    /// # Errors
    /// Returns `ControlError` with a `NotFound` warehouse error when the
    /// relation cannot be resolved, or any query failure.
    pub async fn get_sample_data(
        &self,
        table: &str,
        limit: u32,
        schema: &str,
    ) -> Result<Vec<Row>, ControlError> {
        let (resolved_schema, resolved_table) = self.resolve_relation(schema, table).await?;
        debug!(schema = %resolved_schema, table = %resolved_table, limit, "sampling table");
        let sql = sql::sample_data_sql(&resolved_schema, &resolved_table, limit)?;
        self.query(&sql).await
    }

    async fn resolve_relation(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<(String, String), ControlError> {
        let sql = sql::resolve_relation_sql(schema, table)?;
        let candidates: Vec<(String, String)> = self
            .query(&sql)
            .await?
            .iter()
            .filter_map(|row| {
                let found_schema = row.get("table_schema")?.as_str()?;
                let found_table = row.get("table_name")?.as_str()?;
                Some((found_schema.to_string(), found_table.to_string()))
            })
            .collect();

        let folded = (schema.to_lowercase(), table.to_lowercase());
        candidates
            .iter()
            .find(|(found_schema, found_table)| found_schema == schema && found_table == table)
            .or_else(|| candidates.iter().find(|candidate| **candidate == folded))
            .or_else(|| candidates.first())
            .cloned()
            .ok_or_else(|| {
                WarehouseError::NotFound(format!("relation \"{schema}.{table}\" does not exist"))
                    .into()
            })
    }

    /// Opens and closes a connection; failures are reported in the status.
    pub async fn connection_status(&self) -> ConnectionStatus<WarehouseEndpoint> {
        match self.warehouse.ping().await {
            Ok(()) => ConnectionStatus::Connected(self.warehouse.endpoint().clone()),
            Err(err) => ConnectionStatus::Disconnected {
                error: err.to_string(),
            },
        }
    }
}
