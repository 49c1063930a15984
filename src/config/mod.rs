/// Configuration management for remote-trigger
///
/// Handles command-line flags (with environment fallbacks for container
/// deployment), listen address, log verbosity and runner parameters.

use clap::{Parser, ValueEnum};
use std::{path::PathBuf, time::Duration};

/// Default listen port
pub const DEFAULT_PORT: u16 = 5138;

/// Default location of the trigger definition file
pub const DEFAULT_CONFIG_PATH: &str = "remote-trigger.conf";

/// Command-line flags
#[derive(Debug, Clone, Parser)]
#[command(name = "remote-trigger")]
#[command(version, about = "Expose local commands as HTTP trigger endpoints")]
pub struct Args {
    /// Port to use (<1024 needs according privileges)
    #[arg(short, long, env = "REMOTE_TRIGGER_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "REMOTE_TRIGGER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Log level
    #[arg(short, long, env = "REMOTE_TRIGGER_LOG_LEVEL", value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Path to the trigger config file (JSON array)
    #[arg(short, long, env = "REMOTE_TRIGGER_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Kill a triggered command after this many seconds (default: wait forever)
    #[arg(long, env = "REMOTE_TRIGGER_COMMAND_TIMEOUT")]
    pub command_timeout: Option<u64>,
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Where trigger definitions come from
    pub triggers: TriggersConfig,
    /// Log output configuration
    pub logging: LoggingConfig,
    /// Process runner configuration
    pub runner: RunnerConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
}

/// Trigger definition source
#[derive(Debug, Clone)]
pub struct TriggersConfig {
    /// Path to the JSON trigger file, relative to the working directory
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

/// Process runner configuration
#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    /// Optional per-command timeout in seconds. `None` keeps the
    /// wait-forever behaviour.
    pub command_timeout_secs: Option<u64>,
}

impl RunnerConfig {
    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }
}

/// Log verbosity accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Only fatal conditions; tracing has no separate fatal level so this
    /// behaves like `error`
    Fatal,
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    /// Maximum tracing level to enable for this verbosity
    pub fn as_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Fatal | LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            server: ServerConfig {
                host: args.host,
                port: args.port,
            },
            triggers: TriggersConfig { path: args.config },
            logging: LoggingConfig {
                level: args.log_level,
            },
            runner: RunnerConfig {
                command_timeout_secs: args.command_timeout,
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: DEFAULT_PORT,
            },
            triggers: TriggersConfig {
                path: PathBuf::from(DEFAULT_CONFIG_PATH),
            },
            logging: LoggingConfig {
                level: LogLevel::Info,
            },
            runner: RunnerConfig::default(),
        }
    }
}
