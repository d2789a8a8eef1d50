use clap::{Parser, Subcommand};
use dbmcp_core::store::{WarehouseBackend, WarehouseConfig};
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 5439;
const DEFAULT_DATABASE: &str = "dev";
const DEFAULT_USER: &str = "awsuser";
const DEFAULT_BACKEND: &str = "redshift";

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Serve MCP over stdio, or streamable HTTP when an address is set.
    #[default]
    Serve,
    /// Drop, recreate, and fill the users, products, and orders tables.
    Seed,
    /// Run the catalog tools and a grouped query, printing each result.
    Smoke,
}

#[derive(Parser, Debug)]
#[command(name = "redshift-mcpd", version, about = "Redshift MCP daemon.")]
struct CliArgs {
    #[command(subcommand)]
    command: Option<Command>,

    #[arg(long, env = "REDSHIFT_HOST", default_value = DEFAULT_HOST, global = true)]
    host: String,

    #[arg(long, env = "REDSHIFT_PORT", default_value_t = DEFAULT_PORT, global = true)]
    port: u16,

    #[arg(long, env = "REDSHIFT_DATABASE", default_value = DEFAULT_DATABASE, global = true)]
    database: String,

    #[arg(long, env = "REDSHIFT_USER", default_value = DEFAULT_USER, global = true)]
    user: String,

    #[arg(long, env = "REDSHIFT_PASSWORD", default_value = "", hide_env_values = true, global = true)]
    password: String,

    /// `redshift` (TLS required) or `postgres`.
    #[arg(long, env = "REDSHIFT_BACKEND", default_value = DEFAULT_BACKEND, global = true)]
    backend: String,

    #[arg(long, env = "REDSHIFT_MCP_HTTP_ADDR", global = true)]
    http_addr: Option<SocketAddr>,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Debug, Clone)]
pub struct RedshiftDaemonConfig {
    pub command: Command,
    pub warehouse: WarehouseConfig,
    pub http_addr: Option<SocketAddr>,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingSetting(&'static str),
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting(name) => write!(f, "missing required setting: {name}"),
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl RedshiftDaemonConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }
}

impl TryFrom<CliArgs> for RedshiftDaemonConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.host.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "REDSHIFT_HOST",
                value: args.host,
            });
        }
        if args.port == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "REDSHIFT_PORT",
                value: args.port.to_string(),
            });
        }
        if args.database.trim().is_empty() {
            return Err(ConfigError::MissingSetting("REDSHIFT_DATABASE"));
        }
        if args.user.trim().is_empty() {
            return Err(ConfigError::MissingSetting("REDSHIFT_USER"));
        }
        let backend: WarehouseBackend =
            args.backend.parse().map_err(|_| ConfigError::InvalidSetting {
                name: "REDSHIFT_BACKEND",
                value: args.backend.clone(),
            })?;

        Ok(Self {
            command: args.command.unwrap_or_default(),
            warehouse: WarehouseConfig {
                host: args.host,
                port: args.port,
                database: args.database,
                user: args.user,
                password: args.password,
                backend,
            },
            http_addr: args.http_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> CliArgs {
        CliArgs {
            command: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database: DEFAULT_DATABASE.to_string(),
            user: DEFAULT_USER.to_string(),
            password: String::new(),
            backend: DEFAULT_BACKEND.to_string(),
            http_addr: None,
        }
    }

    #[test]
    fn defaults_match_a_local_redshift() {
        let config = RedshiftDaemonConfig::try_from(base_args()).expect("config should parse");

        assert_eq!(config.command, Command::Serve);
        assert_eq!(config.warehouse, WarehouseConfig::default());
    }

    #[test]
    fn postgres_backend_is_explicit() {
        let mut args = base_args();
        args.port = 5432;
        args.backend = "postgres".to_string();

        let config = RedshiftDaemonConfig::try_from(args).expect("config should parse");

        assert_eq!(config.warehouse.backend, WarehouseBackend::Postgres);
        assert_eq!(config.warehouse.port, 5432);
    }

    #[test]
    fn port_5432_alone_does_not_switch_backend() {
        let mut args = base_args();
        args.port = 5432;

        let config = RedshiftDaemonConfig::try_from(args).expect("config should parse");

        assert_eq!(config.warehouse.backend, WarehouseBackend::Redshift);
    }

    #[test]
    fn rejects_invalid_settings() {
        let mut args = base_args();
        args.backend = "mysql".to_string();
        let err = RedshiftDaemonConfig::try_from(args).expect_err("unknown backend");
        assert_eq!(err.to_string(), "invalid REDSHIFT_BACKEND value: mysql");

        let mut args = base_args();
        args.database = String::new();
        let err = RedshiftDaemonConfig::try_from(args).expect_err("empty database");
        assert_eq!(err.to_string(), "missing required setting: REDSHIFT_DATABASE");

        let mut args = base_args();
        args.user = " ".to_string();
        assert!(RedshiftDaemonConfig::try_from(args).is_err());
    }

    #[test]
    fn help_never_shows_the_password() {
        use clap::CommandFactory;

        let command = CliArgs::command();
        let password = command
            .get_arguments()
            .find(|arg| arg.get_id() == "password")
            .expect("password argument");
        assert!(password.is_hide_env_values_set());
    }
}
