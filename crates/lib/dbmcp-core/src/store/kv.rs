use std::{collections::BTreeMap, error::Error, fmt, future::Future, num::NonZeroU64};

use serde::Serialize;

#[derive(Debug)]
pub enum StoreError {
    Redis(Box<redis::RedisError>),
    WrongType,
}

impl StoreError {
    /// Whether the failure means the store could not be reached at all.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        match self {
            Self::Redis(err) => {
                err.is_io_error()
                    || err.is_connection_refusal()
                    || err.is_connection_dropped()
                    || err.is_timeout()
            }
            Self::WrongType => false,
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redis(err) => write!(f, "{err}"),
            Self::WrongType => {
                f.write_str("WRONGTYPE Operation against a key holding the wrong kind of value")
            }
        }
    }
}

impl Error for StoreError {}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        Self::Redis(Box::new(err))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Where a key-value store lives, as reported by the status tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KvEndpoint {
    pub host: String,
    pub port: u16,
    pub db: i64,
}

/// Primitive operations of a Redis-like key-value store.
///
/// Every method maps onto exactly one server command. Implementations share
/// one connection across callers and never retry.
pub trait KeyValueStore: Send + Sync + 'static {
    fn endpoint(&self) -> &KvEndpoint;

    /// Liveness check (`PING`).
    fn ping(&self) -> impl Future<Output = StoreResult<()>> + Send;

    /// `GET`; `None` when the key is absent.
    fn get(&self, key: &str) -> impl Future<Output = StoreResult<Option<String>>> + Send;

    /// `SET`, or `SETEX` when a time-to-live is given.
    fn set(
        &self,
        key: &str,
        value: &str,
        ttl_secs: Option<NonZeroU64>,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    /// `DEL`; returns the number of keys removed.
    fn delete(&self, key: &str) -> impl Future<Output = StoreResult<u64>> + Send;

    /// `HGETALL`; an absent hash yields an empty map.
    fn hash_get_all(
        &self,
        key: &str,
    ) -> impl Future<Output = StoreResult<BTreeMap<String, String>>> + Send;

    /// `HSET` with one or more field/value pairs.
    fn hash_set(
        &self,
        key: &str,
        fields: &[(String, String)],
    ) -> impl Future<Output = StoreResult<()>> + Send;

    /// `KEYS`; full keyspace scan with a glob pattern.
    fn keys(&self, pattern: &str) -> impl Future<Output = StoreResult<Vec<String>>> + Send;
}
