//! Daemon entry point for the Redshift MCP server.
//!
//! Loads configuration from `.env`, the environment, and CLI flags, then
//! serves MCP, seeds sample tables, or runs the smoke sequence.

mod config;
mod smoke;

use std::error::Error;

use dbmcp_core::seed::seed_warehouse;
use dbmcp_core::store::PgWarehouse;
use dbmcp_mcp::WarehouseMcp;
use dbmcp_mcp::server::{McpHttpServerConfig, serve_stdio, serve_streamable_http};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{Command, RedshiftDaemonConfig};

type BoxError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = RedshiftDaemonConfig::from_args()?;
    let settings = &config.warehouse;
    info!(
        host = %settings.host,
        port = settings.port,
        database = %settings.database,
        backend = %settings.backend,
        "using warehouse"
    );
    let warehouse = PgWarehouse::new(settings);

    match config.command {
        Command::Serve => {
            let server = WarehouseMcp::new(warehouse);
            match config.http_addr {
                Some(addr) => serve_streamable_http(server, McpHttpServerConfig::new(addr)).await?,
                None => serve_stdio(server).await?,
            }
        }
        Command::Seed => {
            println!("[SEED] Connecting to {}:{}...", settings.host, settings.port);
            let report = seed_warehouse(&warehouse).await?;
            for count in &report.tables {
                println!("[SEED] {}: {} rows", count.table, count.rows);
            }
            println!("[DONE] Seeded {} rows", report.total());
        }
        Command::Smoke => {
            if !smoke::run(&WarehouseMcp::new(warehouse)).await? {
                return Err("cannot connect to the warehouse; check host, port, and credentials".into());
            }
        }
    }
    Ok(())
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
