use std::{collections::BTreeMap, num::NonZeroU64};

use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, ConnectionAddr, ConnectionInfo, RedisConnectionInfo};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use super::kv::{KeyValueStore, KvEndpoint, StoreResult};

/// Connection settings for a Redis server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub db: i64,
}

impl RedisConfig {
    #[must_use]
    pub fn endpoint(&self) -> KvEndpoint {
        KvEndpoint {
            host: self.host.clone(),
            port: self.port,
            db: self.db,
        }
    }

    #[must_use]
    pub fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            addr: ConnectionAddr::Tcp(self.host.clone(), self.port),
            redis: RedisConnectionInfo {
                db: self.db,
                password: self.password.clone(),
                ..RedisConnectionInfo::default()
            },
        }
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            password: None,
            db: 0,
        }
    }
}

/// Redis-backed store holding one multiplexed connection for its lifetime.
///
/// The connection is opened on first use, so the server starts (and can
/// report `disconnected`) while Redis is down. A failed attempt leaves the
/// slot empty; an established connection is never replaced.
pub struct RedisStore {
    client: Client,
    endpoint: KvEndpoint,
    connection: OnceCell<MultiplexedConnection>,
}

impl RedisStore {
    /// Builds the client without connecting.
    ///
    /// # Errors
    /// Returns `StoreError` if the connection settings are rejected by the driver.
    pub fn open(config: &RedisConfig) -> StoreResult<Self> {
        let client = Client::open(config.connection_info())?;
        Ok(Self {
            client,
            endpoint: config.endpoint(),
            connection: OnceCell::new(),
        })
    }

    async fn connection(&self) -> StoreResult<MultiplexedConnection> {
        let connection = self
            .connection
            .get_or_try_init(|| async {
                debug!(host = %self.endpoint.host, port = self.endpoint.port, "opening redis connection");
                self.client
                    .get_multiplexed_async_connection()
                    .await
                    .inspect_err(|err| warn!(error = %err, "redis connection failed"))
            })
            .await?;
        Ok(connection.clone())
    }
}

impl KeyValueStore for RedisStore {
    fn endpoint(&self) -> &KvEndpoint {
        &self.endpoint
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        debug!(key, "GET");
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: Option<NonZeroU64>) -> StoreResult<()> {
        debug!(key, ttl_secs = ttl_secs.map(NonZeroU64::get), "SET");
        let mut conn = self.connection().await?;
        match ttl_secs {
            Some(ttl) => {
                redis::cmd("SETEX")
                    .arg(key)
                    .arg(ttl.get())
                    .arg(value)
                    .exec_async(&mut conn)
                    .await?;
            }
            None => {
                redis::cmd("SET").arg(key).arg(value).exec_async(&mut conn).await?;
            }
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<u64> {
        debug!(key, "DEL");
        let mut conn = self.connection().await?;
        let removed: u64 = conn.del(key).await?;
        Ok(removed)
    }

    async fn hash_get_all(&self, key: &str) -> StoreResult<BTreeMap<String, String>> {
        debug!(key, "HGETALL");
        let mut conn = self.connection().await?;
        let fields: BTreeMap<String, String> = conn.hgetall(key).await?;
        Ok(fields)
    }

    async fn hash_set(&self, key: &str, fields: &[(String, String)]) -> StoreResult<()> {
        if fields.is_empty() {
            return Ok(());
        }
        debug!(key, fields = fields.len(), "HSET");
        let mut conn = self.connection().await?;
        redis::cmd("HSET").arg(key).arg(fields).exec_async(&mut conn).await?;
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        debug!(pattern, "KEYS");
        let mut conn = self.connection().await?;
        let keys: Vec<String> = conn.keys(pattern).await?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_info_carries_db_and_password() {
        let config = RedisConfig {
            host: "cache.internal".to_string(),
            port: 6380,
            password: Some("secret".to_string()),
            db: 3,
        };
        let info = config.connection_info();
        assert_eq!(info.addr, ConnectionAddr::Tcp("cache.internal".to_string(), 6380));
        assert_eq!(info.redis.db, 3);
        assert_eq!(info.redis.password.as_deref(), Some("secret"));
    }

    #[test]
    fn open_does_not_connect() {
        let config = RedisConfig {
            port: 1,
            ..RedisConfig::default()
        };
        let store = RedisStore::open(&config).expect("client should build without connecting");
        assert_eq!(store.endpoint().port, 1);
    }
}
