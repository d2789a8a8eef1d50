//! Store interfaces and their implementations.
//!
//! The key-value side has a Redis client and an in-process store; the
//! warehouse side speaks the Postgres wire protocol to Redshift or Postgres.

pub mod kv;
pub mod memory;
pub mod pg;
pub mod remote;
pub mod warehouse;

pub use kv::{KeyValueStore, KvEndpoint, StoreError, StoreResult};
pub use memory::MemoryStore;
pub use pg::{PgWarehouse, WarehouseBackend, WarehouseConfig};
pub use remote::{RedisConfig, RedisStore};
pub use warehouse::{Row, Warehouse, WarehouseEndpoint, WarehouseError, WarehouseResult};
