//! Daemon entry point for the Redis MCP server.
//!
//! Loads configuration from `.env`, the environment, and CLI flags, then
//! serves MCP, seeds sample data, or runs the smoke sequence.

mod config;
mod smoke;

use std::error::Error;

use dbmcp_core::seed::seed_store;
use dbmcp_core::store::{KeyValueStore, MemoryStore, RedisStore};
use dbmcp_mcp::RedisMcp;
use dbmcp_mcp::server::{McpHttpServerConfig, serve_stdio, serve_streamable_http};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{Command, RedisDaemonConfig};

type BoxError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = RedisDaemonConfig::from_args()?;
    if config.in_memory {
        info!("using in-memory key-value store");
        run(&config, MemoryStore::new()).await
    } else {
        info!(host = %config.redis.host, port = config.redis.port, db = config.redis.db, "using redis");
        run(&config, RedisStore::open(&config.redis)?).await
    }
}

/// Logs go to stderr; stdout carries the stdio transport.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run<S: KeyValueStore>(config: &RedisDaemonConfig, store: S) -> Result<(), BoxError> {
    match config.command {
        Command::Serve => {
            let server = RedisMcp::new(store);
            match config.http_addr {
                Some(addr) => serve_streamable_http(server, McpHttpServerConfig::new(addr)).await?,
                None => serve_stdio(server).await?,
            }
        }
        Command::Seed => {
            let report = seed_store(&store).await?;
            for count in &report.tables {
                println!("[SEED] {}: {} keys", count.table, count.rows);
            }
            println!("[DONE] Seeded {} keys", report.total());
        }
        Command::Smoke => {
            if !smoke::run(&RedisMcp::new(store)).await? {
                return Err("cannot connect to Redis; is it running on the configured host and port?".into());
            }
        }
    }
    Ok(())
}
