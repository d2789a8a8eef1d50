use clap::{Parser, Subcommand, builder::BoolishValueParser};
use dbmcp_core::store::RedisConfig;
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;

const DEFAULT_REDIS_HOST: &str = "localhost";
const DEFAULT_REDIS_PORT: u16 = 6379;
const DEFAULT_REDIS_DB: i64 = 0;

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Serve MCP over stdio, or streamable HTTP when an address is set.
    #[default]
    Serve,
    /// Load the users, products, and orders sample hashes.
    Seed,
    /// Run every tool once against the configured store and print the results.
    Smoke,
}

#[derive(Parser, Debug)]
#[command(name = "redis-mcpd", version, about = "Redis MCP daemon.")]
struct CliArgs {
    #[command(subcommand)]
    command: Option<Command>,

    #[arg(long, env = "REDIS_HOST", default_value = DEFAULT_REDIS_HOST, global = true)]
    redis_host: String,

    #[arg(long, env = "REDIS_PORT", default_value_t = DEFAULT_REDIS_PORT, global = true)]
    redis_port: u16,

    #[arg(long, env = "REDIS_PASSWORD", hide_env_values = true, global = true)]
    redis_password: Option<String>,

    #[arg(long, env = "REDIS_DB", default_value_t = DEFAULT_REDIS_DB, global = true)]
    redis_db: i64,

    #[arg(
        long = "memory",
        env = "REDIS_IN_MEMORY",
        default_value_t = false,
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    in_memory: bool,

    #[arg(long, env = "REDIS_MCP_HTTP_ADDR", global = true)]
    http_addr: Option<SocketAddr>,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Debug, Clone)]
pub struct RedisDaemonConfig {
    pub command: Command,
    pub redis: RedisConfig,
    pub in_memory: bool,
    pub http_addr: Option<SocketAddr>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl RedisDaemonConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }
}

impl TryFrom<CliArgs> for RedisDaemonConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.redis_host.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                name: "REDIS_HOST",
                value: args.redis_host,
            });
        }
        if args.redis_port == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "REDIS_PORT",
                value: args.redis_port.to_string(),
            });
        }
        if args.redis_db < 0 {
            return Err(ConfigError::InvalidSetting {
                name: "REDIS_DB",
                value: args.redis_db.to_string(),
            });
        }

        let password = args.redis_password.filter(|value| !value.is_empty());

        Ok(Self {
            command: args.command.unwrap_or_default(),
            redis: RedisConfig {
                host: args.redis_host,
                port: args.redis_port,
                password,
                db: args.redis_db,
            },
            in_memory: args.in_memory,
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
            redis_host: DEFAULT_REDIS_HOST.to_string(),
            redis_port: DEFAULT_REDIS_PORT,
            redis_password: None,
            redis_db: DEFAULT_REDIS_DB,
            in_memory: false,
            http_addr: None,
        }
    }

    #[test]
    fn defaults_to_serving_local_redis() {
        let config = RedisDaemonConfig::try_from(base_args()).expect("config should parse");

        assert_eq!(config.command, Command::Serve);
        assert_eq!(config.redis, RedisConfig::default());
        assert!(!config.in_memory);
        assert!(config.http_addr.is_none());
    }

    #[test]
    fn empty_password_means_no_password() {
        let mut args = base_args();
        args.redis_password = Some(String::new());

        let config = RedisDaemonConfig::try_from(args).expect("config should parse");

        assert!(config.redis.password.is_none());
    }

    #[test]
    fn rejects_blank_host_and_zero_port() {
        let mut args = base_args();
        args.redis_host = "  ".to_string();
        assert!(RedisDaemonConfig::try_from(args).is_err());

        let mut args = base_args();
        args.redis_port = 0;
        let err = RedisDaemonConfig::try_from(args).expect_err("port 0 is invalid");
        assert_eq!(err.to_string(), "invalid REDIS_PORT value: 0");
    }

    #[test]
    fn parses_subcommand_and_flags() {
        let args = CliArgs::try_parse_from([
            "redis-mcpd",
            "seed",
            "--redis-host",
            "cache",
            "--redis-db",
            "2",
            "--memory",
        ])
        .expect("arguments should parse");

        let config = RedisDaemonConfig::try_from(args).expect("config should parse");

        assert_eq!(config.command, Command::Seed);
        assert_eq!(config.redis.host, "cache");
        assert_eq!(config.redis.db, 2);
        assert!(config.in_memory);
    }

    #[test]
    fn help_never_shows_the_password() {
        use clap::CommandFactory;

        let command = CliArgs::command();
        let password = command
            .get_arguments()
            .find(|arg| arg.get_id() == "redis_password")
            .expect("password argument");
        assert!(password.is_hide_env_values_set());
    }
}
