#![allow(clippy::missing_errors_doc)]

use dbmcp_core::render;
use dbmcp_core::store::KeyValueStore;
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::{RedisMcp, helpers};

/// Parameters naming a single key.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct KeyParams {
    /// The Redis key.
    pub key: String,
}

/// Parameters for writing a string value.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SetParams {
    pub key: String,
    pub value: String,
    /// Time to live in seconds; omitted or 0 keeps the key forever.
    pub expire_seconds: Option<u64>,
}

/// Parameters for setting one hash field.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct HashSetParams {
    pub key: String,
    pub field: String,
    pub value: String,
}

/// Parameters for listing keys.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct KeysParams {
    /// Glob pattern; defaults to `*`.
    pub pattern: Option<String>,
}

/// Parameters naming a sample table.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct QueryTableParams {
    /// One of `users`, `products`, `orders`.
    pub table_name: String,
}

#[tool_router(router = tool_router_strings, vis = "pub")]
impl<S: KeyValueStore> RedisMcp<S> {
    #[tool(description = "Get the value of a key from Redis.")]
    pub async fn redis_get(
        &self,
        Parameters(params): Parameters<KeyParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let outcome = self
            .control()
            .get(&params.key)
            .await
            .map(|value| render::kv_get(&params.key, value))
            .map_err(|err| render::kv_error(&err));
        Ok(helpers::tool_text(outcome))
    }

    #[tool(description = "Set a key-value pair in Redis, optionally expiring after expire_seconds.")]
    pub async fn redis_set(
        &self,
        Parameters(params): Parameters<SetParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let outcome = self
            .control()
            .set(&params.key, &params.value, params.expire_seconds)
            .await
            .map(|()| render::kv_set(&params.key))
            .map_err(|err| render::kv_error(&err));
        Ok(helpers::tool_text(outcome))
    }

    #[tool(description = "Delete a key from Redis.")]
    pub async fn redis_delete(
        &self,
        Parameters(params): Parameters<KeyParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let outcome = self
            .control()
            .delete(&params.key)
            .await
            .map(|removed| render::kv_delete(&params.key, removed))
            .map_err(|err| render::kv_error(&err));
        Ok(helpers::tool_text(outcome))
    }

    #[tool(description = "List keys matching a glob pattern (default '*'). Scans the whole keyspace.")]
    pub async fn redis_keys(
        &self,
        Parameters(params): Parameters<KeysParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let pattern = params.pattern.as_deref().unwrap_or("*");
        let outcome = self
            .control()
            .keys(pattern)
            .await
            .map(|keys| render::kv_keys(&keys))
            .map_err(|err| render::kv_error(&err));
        Ok(helpers::tool_text(outcome))
    }
}

#[tool_router(router = tool_router_hashes, vis = "pub")]
impl<S: KeyValueStore> RedisMcp<S> {
    #[tool(description = "Get all fields and values of a Redis hash as JSON.")]
    pub async fn redis_hgetall(
        &self,
        Parameters(params): Parameters<KeyParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let outcome = self
            .control()
            .hash_get_all(&params.key)
            .await
            .map(|fields| render::kv_hash(&params.key, &fields))
            .map_err(|err| render::kv_error(&err));
        Ok(helpers::tool_text(outcome))
    }

    #[tool(description = "Set a field in a Redis hash.")]
    pub async fn redis_hset(
        &self,
        Parameters(params): Parameters<HashSetParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let outcome = self
            .control()
            .hash_set(&params.key, &params.field, &params.value)
            .await
            .map(|()| render::kv_hash_set(&params.key, &params.field))
            .map_err(|err| render::kv_error(&err));
        Ok(helpers::tool_text(outcome))
    }
}

#[tool_router(router = tool_router_catalog, vis = "pub")]
impl<S: KeyValueStore> RedisMcp<S> {
    #[tool(description = "List all available sample tables (users, products, orders).")]
    pub async fn redis_list_tables(&self) -> Result<CallToolResult, ErrorData> {
        let tables = self.control().list_tables();
        Ok(helpers::tool_text(Ok(render::kv_tables(&tables))))
    }

    #[tool(description = "Query all entries from a sample table (users, products, or orders), sorted by key.")]
    pub async fn redis_query_table(
        &self,
        Parameters(params): Parameters<QueryTableParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let outcome = self
            .control()
            .query_table(&params.table_name)
            .await
            .map(|rows| render::kv_query_table(&params.table_name, &rows))
            .map_err(|err| render::kv_error(&err));
        Ok(helpers::tool_text(outcome))
    }

    #[tool(description = "Check the Redis connection status.")]
    pub async fn redis_connection_status(&self) -> Result<CallToolResult, ErrorData> {
        let status = self.control().connection_status().await;
        Ok(helpers::tool_text(Ok(render::status(&status))))
    }
}
