use std::{fmt, str::FromStr};

use serde_json::{Number, Value};
use sqlx::postgres::{PgConnectOptions, PgConnection, PgRow, PgSslMode};
use sqlx::{Column, Connection, Executor, Row as _, TypeInfo};
use tracing::{debug, warn};

use super::warehouse::{Row, Warehouse, WarehouseEndpoint, WarehouseError, WarehouseResult};

/// Which server sits behind the Postgres wire protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WarehouseBackend {
    #[default]
    Redshift,
    Postgres,
}

impl WarehouseBackend {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Redshift => "redshift",
            Self::Postgres => "postgres",
        }
    }
}

impl fmt::Display for WarehouseBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WarehouseBackend {
    type Err = WarehouseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "redshift" => Ok(Self::Redshift),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(WarehouseError::InvalidInput(format!(
                "unknown warehouse backend '{other}' (expected redshift or postgres)"
            ))),
        }
    }
}

/// Connection settings for a warehouse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub backend: WarehouseBackend,
}

impl WarehouseConfig {
    #[must_use]
    pub fn endpoint(&self) -> WarehouseEndpoint {
        WarehouseEndpoint {
            host: self.host.clone(),
            port: self.port,
            database: self.database.clone(),
        }
    }

    /// Driver options for this config.
    ///
    /// Redshift gets mandatory TLS and no prepared statement cache; Postgres
    /// keeps the driver defaults.
    #[must_use]
    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new_without_pgpass()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database)
            .application_name("dbmcp");
        let options = if self.password.is_empty() {
            options
        } else {
            options.password(&self.password)
        };
        match self.backend {
            WarehouseBackend::Redshift => options
                .ssl_mode(PgSslMode::Require)
                .statement_cache_capacity(0),
            WarehouseBackend::Postgres => options.ssl_mode(PgSslMode::Prefer),
        }
    }
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5439,
            database: "dev".to_string(),
            user: "awsuser".to_string(),
            password: String::new(),
            backend: WarehouseBackend::Redshift,
        }
    }
}

/// Warehouse over the Postgres wire protocol with one connection per call.
pub struct PgWarehouse {
    options: PgConnectOptions,
    endpoint: WarehouseEndpoint,
    backend: WarehouseBackend,
}

impl PgWarehouse {
    #[must_use]
    pub fn new(config: &WarehouseConfig) -> Self {
        Self {
            options: config.connect_options(),
            endpoint: config.endpoint(),
            backend: config.backend,
        }
    }

    #[must_use]
    pub const fn backend(&self) -> WarehouseBackend {
        self.backend
    }

    async fn connect(&self) -> WarehouseResult<PgConnection> {
        debug!(
            host = %self.endpoint.host,
            port = self.endpoint.port,
            backend = %self.backend,
            "opening warehouse connection"
        );
        PgConnection::connect_with(&self.options).await.map_err(|err| {
            warn!(error = %err, "warehouse connection failed");
            WarehouseError::from(err)
        })
    }
}

async fn close(conn: PgConnection) {
    if let Err(err) = conn.close().await {
        debug!(error = %err, "closing warehouse connection failed");
    }
}

impl Warehouse for PgWarehouse {
    fn endpoint(&self) -> &WarehouseEndpoint {
        &self.endpoint
    }

    async fn ping(&self) -> WarehouseResult<()> {
        let conn = self.connect().await?;
        close(conn).await;
        Ok(())
    }

    async fn fetch_rows(&self, sql: &str) -> WarehouseResult<Vec<Row>> {
        let mut conn = self.connect().await?;
        debug!(sql, "fetching rows");
        let result = Executor::fetch_all(&mut conn, sqlx::raw_sql(sql)).await;
        close(conn).await;
        result?.iter().map(row_to_json).collect()
    }

    async fn execute(&self, sql: &str) -> WarehouseResult<u64> {
        let mut conn = self.connect().await?;
        debug!(sql, "executing statement");
        let result = Executor::execute(&mut conn, sqlx::raw_sql(sql)).await;
        close(conn).await;
        Ok(result?.rows_affected())
    }
}

/// Maps a simple-protocol row, whose values all arrive as text, to JSON.
fn row_to_json(row: &PgRow) -> WarehouseResult<Row> {
    let mut out = Row::new();
    for (index, column) in row.columns().iter().enumerate() {
        let text: Option<String> = row.try_get_unchecked(index)?;
        out.insert(
            column.name().to_string(),
            text_to_json(column.type_info().name(), text),
        );
    }
    Ok(out)
}

fn text_to_json(type_name: &str, text: Option<String>) -> Value {
    let Some(text) = text else {
        return Value::Null;
    };
    match type_name {
        "BOOL" => match text.as_str() {
            "t" | "true" => Value::Bool(true),
            "f" | "false" => Value::Bool(false),
            _ => Value::String(text),
        },
        "INT2" | "INT4" | "INT8" | "OID" => text
            .parse::<i64>()
            .map_or_else(|_| Value::String(text.clone()), Value::from),
        "FLOAT4" | "FLOAT8" | "NUMERIC" => text
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map_or_else(|| Value::String(text.clone()), Value::Number),
        "JSON" | "JSONB" => {
            serde_json::from_str(&text).unwrap_or_else(|_| Value::String(text.clone()))
        }
        _ => Value::String(text),
    }
}
