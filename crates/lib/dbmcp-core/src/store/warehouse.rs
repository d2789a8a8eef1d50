use std::{error::Error, fmt, future::Future};

use serde::Serialize;
use serde_json::{Map, Value};

/// One result row: column name to JSON value, in column order.
pub type Row = Map<String, Value>;

#[derive(Debug)]
pub enum WarehouseError {
    Sqlx(Box<sqlx::Error>),
    InvalidInput(String),
    NotFound(String),
}

impl WarehouseError {
    /// Whether the failure happened before a statement could run.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        match self {
            Self::Sqlx(err) => matches!(
                err.as_ref(),
                sqlx::Error::Io(_)
                    | sqlx::Error::Tls(_)
                    | sqlx::Error::Configuration(_)
                    | sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
            ),
            Self::InvalidInput(_) | Self::NotFound(_) => false,
        }
    }
}

impl fmt::Display for WarehouseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlx(err) => match err.as_database_error() {
                Some(db_err) => f.write_str(db_err.message()),
                None => write!(f, "{err}"),
            },
            Self::InvalidInput(message) => write!(f, "Invalid input: {message}"),
            Self::NotFound(message) => f.write_str(message),
        }
    }
}

impl Error for WarehouseError {}

impl From<sqlx::Error> for WarehouseError {
    fn from(err: sqlx::Error) -> Self {
        Self::Sqlx(Box::new(err))
    }
}

pub type WarehouseResult<T> = Result<T, WarehouseError>;

/// Where a warehouse lives, as reported by the status tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WarehouseEndpoint {
    pub host: String,
    pub port: u16,
    pub database: String,
}

/// SQL execution against an analytic warehouse.
///
/// Each call runs on its own scoped connection; nothing is pooled.
pub trait Warehouse: Send + Sync + 'static {
    fn endpoint(&self) -> &WarehouseEndpoint;

    /// Opens and closes a connection without running a statement.
    fn ping(&self) -> impl Future<Output = WarehouseResult<()>> + Send;

    /// Runs `sql` verbatim and returns every row.
    fn fetch_rows(&self, sql: &str) -> impl Future<Output = WarehouseResult<Vec<Row>>> + Send;

    /// Runs `sql` (possibly several `;`-separated statements) and returns the
    /// total number of rows affected.
    fn execute(&self, sql: &str) -> impl Future<Output = WarehouseResult<u64>> + Send;
}
