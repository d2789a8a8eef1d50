use std::{error::Error, fmt};

use serde::Serialize;

use crate::store::{StoreError, WarehouseError};

pub mod kv;
pub mod sql;
pub mod warehouse;

pub use kv::{KvControlPlane, TableInfo};
pub use warehouse::WarehouseControlPlane;

/// Machine-readable category of a control-plane failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connection,
    Command,
    UnknownTable,
    InvalidInput,
    NotFound,
}

#[derive(Debug)]
pub enum ControlError {
    Store(StoreError),
    Warehouse(WarehouseError),
    UnknownTable(String),
    InvalidInput(String),
}

impl ControlError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Store(err) if err.is_connection() => ErrorKind::Connection,
            Self::Store(_) => ErrorKind::Command,
            Self::Warehouse(err) if err.is_connection() => ErrorKind::Connection,
            Self::Warehouse(WarehouseError::InvalidInput(_)) | Self::InvalidInput(_) => {
                ErrorKind::InvalidInput
            }
            Self::Warehouse(WarehouseError::NotFound(_)) => ErrorKind::NotFound,
            Self::Warehouse(WarehouseError::Sqlx(_)) => ErrorKind::Command,
            Self::UnknownTable(_) => ErrorKind::UnknownTable,
        }
    }
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Warehouse(err) => write!(f, "{err}"),
            Self::UnknownTable(name) => write!(
                f,
                "Unknown table '{name}'. Available tables: {}",
                dbmcp_store::schema::table_names()
            ),
            Self::InvalidInput(message) => write!(f, "Invalid input: {message}"),
        }
    }
}

impl Error for ControlError {}

impl From<StoreError> for ControlError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<WarehouseError> for ControlError {
    fn from(err: WarehouseError) -> Self {
        Self::Warehouse(err)
    }
}

/// Outcome of a connectivity check.
///
/// Serializes as `{"status": "connected", ...endpoint}` or
/// `{"status": "disconnected", "error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ConnectionStatus<E> {
    Connected(E),
    Disconnected { error: String },
}

impl<E> ConnectionStatus<E> {
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }
}
