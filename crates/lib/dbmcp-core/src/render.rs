//! Response text for every adapter outcome.
//!
//! Successes and failures both end up as one string; JSON payloads use a
//! two-space indent.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::control::{ConnectionStatus, ControlError, ErrorKind, TableInfo};
use crate::store::Row;

/// Pretty-prints any serializable value.
pub fn json_text<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|err| format!("Error: {err}"))
}

#[must_use]
pub fn kv_get(key: &str, value: Option<String>) -> String {
    value.unwrap_or_else(|| missing_key(key))
}

#[must_use]
pub fn kv_set(key: &str) -> String {
    format!("Successfully set key '{key}'")
}

#[must_use]
pub fn kv_delete(key: &str, removed: bool) -> String {
    if removed {
        format!("Successfully deleted key '{key}'")
    } else {
        missing_key(key)
    }
}

#[must_use]
pub fn kv_hash(key: &str, fields: &BTreeMap<String, String>) -> String {
    if fields.is_empty() {
        format!("Hash '{key}' does not exist or is empty")
    } else {
        json_text(fields)
    }
}

#[must_use]
pub fn kv_hash_set(key: &str, field: &str) -> String {
    format!("Successfully set field '{field}' in hash '{key}'")
}

#[must_use]
pub fn kv_keys(keys: &[String]) -> String {
    json_text(keys)
}

/// Catalog as an object keyed by table name, in catalog order.
#[must_use]
pub fn kv_tables(tables: &[TableInfo]) -> String {
    let catalog: Map<String, Value> = tables
        .iter()
        .map(|table| {
            let entry = json!({
                "description": table.description,
                "key_pattern": table.key_pattern,
                "sample_key": table.sample_key,
            });
            (table.name.to_string(), entry)
        })
        .collect();
    json_text(&catalog)
}

#[must_use]
pub fn kv_query_table(table_name: &str, rows: &[Row]) -> String {
    if rows.is_empty() {
        format!(
            "No entries found in table '{table_name}'. Run the seed command to populate sample data."
        )
    } else {
        json_text(rows)
    }
}

#[must_use]
pub fn kv_error(err: &ControlError) -> String {
    match err.kind() {
        ErrorKind::UnknownTable => err.to_string(),
        _ => format!("Error: {err}"),
    }
}

pub fn status<E: Serialize>(status: &ConnectionStatus<E>) -> String {
    json_text(status)
}

#[must_use]
pub fn warehouse_rows(rows: &[Row]) -> String {
    json_text(rows)
}

#[must_use]
pub fn warehouse_error(err: &ControlError) -> String {
    format!("Error executing query: {err}")
}

fn missing_key(key: &str) -> String {
    format!("Key '{key}' does not exist")
}
