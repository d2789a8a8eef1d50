use std::{collections::BTreeMap, num::NonZeroU64, sync::Arc};

use dbmcp_store::schema::{self, SampleTable};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{ConnectionStatus, ControlError};
use crate::store::{KeyValueStore, KvEndpoint, Row};

/// Catalog entry for one logical table stored as hashes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableInfo {
    #[serde(skip)]
    pub name: &'static str,
    pub description: &'static str,
    pub key_pattern: String,
    pub sample_key: String,
}

impl From<&SampleTable> for TableInfo {
    fn from(table: &SampleTable) -> Self {
        Self {
            name: table.name,
            description: table.description,
            key_pattern: table.key_pattern(),
            sample_key: table.sample_key(),
        }
    }
}

/// Typed operations of the key-value adapter.
pub struct KvControlPlane<S: KeyValueStore> {
    store: Arc<S>,
}

impl<S: KeyValueStore> Clone for KvControlPlane<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore> KvControlPlane<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads a string value.
    ///
    /// # Errors
    /// Returns `ControlError` if the store call fails or the key holds a hash.
    pub async fn get(&self, key: &str) -> Result<Option<String>, ControlError> {
        Ok(self.store.get(key).await?)
    }

    /// Writes a string value. An expiry of zero seconds means no expiry.
    ///
    /// # Errors
    /// Returns `ControlError` if the store call fails.
    pub async fn set(
        &self,
        key: &str,
        value: &str,
        expire_seconds: Option<u64>,
    ) -> Result<(), ControlError> {
        let ttl = expire_seconds.and_then(NonZeroU64::new);
        Ok(self.store.set(key, value, ttl).await?)
    }

    /// Deletes a key; `false` when nothing was removed.
    ///
    /// # Errors
    /// Returns `ControlError` if the store call fails.
    pub async fn delete(&self, key: &str) -> Result<bool, ControlError> {
        Ok(self.store.delete(key).await? > 0)
    }

    /// Reads every field of a hash. Absent and empty hashes both come back empty.
    ///
    /// # Errors
    /// Returns `ControlError` if the store call fails or the key holds a string.
    pub async fn hash_get_all(&self, key: &str) -> Result<BTreeMap<String, String>, ControlError> {
        Ok(self.store.hash_get_all(key).await?)
    }

    /// Sets a single hash field.
    ///
    /// # Errors
    /// Returns `ControlError` if the store call fails or the key holds a string.
    pub async fn hash_set(&self, key: &str, field: &str, value: &str) -> Result<(), ControlError> {
        let fields = [(field.to_string(), value.to_string())];
        Ok(self.store.hash_set(key, &fields).await?)
    }

    /// Lists keys matching a glob pattern, in store order.
    ///
    /// # Errors
    /// Returns `ControlError` if the store call fails.
    pub async fn keys(&self, pattern: &str) -> Result<Vec<String>, ControlError> {
        Ok(self.store.keys(pattern).await?)
    }

    /// Static catalog of the logical tables.
    #[must_use]
    pub fn list_tables(&self) -> Vec<TableInfo> {
        schema::SAMPLE_TABLES.iter().map(TableInfo::from).collect()
    }

    /// Loads every hash of a logical table, sorted by key, with the key
    /// appended as `_key`.
    ///
    /// # Errors
    /// Returns `ControlError::UnknownTable` before touching the store when the
    /// name is not in the catalog, or a store error.
    pub async fn query_table(&self, table_name: &str) -> Result<Vec<Row>, ControlError> {
        let table = schema::find_table(table_name)
            .ok_or_else(|| ControlError::UnknownTable(table_name.to_string()))?;
        let mut keys = self.store.keys(&table.key_pattern()).await?;
        keys.sort();
        debug!(table = table.name, keys = keys.len(), "querying table");

        let mut rows = Vec::with_capacity(keys.len());
        for key in keys {
            let fields = self.store.hash_get_all(&key).await?;
            let mut row: Row = fields
                .into_iter()
                .map(|(field, value)| (field, Value::String(value)))
                .collect();
            row.insert("_key".to_string(), Value::String(key));
            rows.push(row);
        }
        Ok(rows)
    }

    /// Probes the store; failures are reported in the status, not as errors.
    pub async fn connection_status(&self) -> ConnectionStatus<KvEndpoint> {
        match self.store.ping().await {
            Ok(()) => ConnectionStatus::Connected(self.store.endpoint().clone()),
            Err(err) => ConnectionStatus::Disconnected {
                error: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn catalog_follows_sample_tables() {
        let control = KvControlPlane::new(MemoryStore::new());
        let tables = control.list_tables();
        let names: Vec<_> = tables.iter().map(|table| table.name).collect();
        assert_eq!(names, ["users", "products", "orders"]);
        assert_eq!(tables[2].key_pattern, "order:*");
        assert_eq!(tables[2].sample_key, "order:1");
    }

    #[tokio::test]
    async fn zero_expiry_means_persistent() {
        let control = KvControlPlane::new(MemoryStore::new());
        control.set("k", "v", Some(0)).await.unwrap();
        assert_eq!(control.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn memory_store_reports_connected() {
        let control = KvControlPlane::new(MemoryStore::new());
        assert!(control.connection_status().await.is_connected());
    }
}
