use std::{fmt::Display, fs::File, str::FromStr, sync::Mutex};

use chrono::Local;
use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::writer::MakeWriterExt;

use crate::config::LoggerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn colored_tag(&self) -> ColoredString {
        match self {
            LogLevel::Debug => "DBG".bright_cyan(),
            LogLevel::Info => "INF".bright_green(),
            LogLevel::Warn => "WAR".yellow(),
            LogLevel::Error => "ERR".bright_red(),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "info" | "inf" => Ok(LogLevel::Info),
            "warn" | "warning" | "war" => Ok(LogLevel::Warn),
            "error" | "err" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "Debug"),
            LogLevel::Info => write!(f, "Info"),
            LogLevel::Warn => write!(f, "Warn"),
            LogLevel::Error => write!(f, "Error"),
        }
    }
}

/// Path of the log file for a run started now.
pub fn log_file_path(name: &str) -> String {
    format!(
        "./logs/{}_run_{}.txt",
        name,
        Local::now().format("%Y-%m-%d_%H-%M-%S")
    )
}

/// Installs a global `tracing` subscriber according to `config`.
///
/// Does nothing when logging is disabled. Events go to stderr and, with
/// `log_file` set, also to a timestamped file below `./logs`.
pub fn init_tracing(config: &LoggerConfig, name: &str) -> anyhow::Result<()> {
    if !*config.get_enabled() {
        return Ok(());
    }

    let level = tracing::Level::from(*config.get_log_level());
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    let res = if *config.get_log_file() {
        std::fs::create_dir_all("./logs")?;
        let file = File::create(log_file_path(name))?;
        builder
            .with_ansi(false)
            .with_writer(std::io::stderr.and(Mutex::new(file)))
            .try_init()
    } else {
        builder.with_writer(std::io::stderr).try_init()
    };

    res.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))
}

#[test]
fn test_log_level_from_str() {
    assert_eq!("dbg".parse::<LogLevel>().unwrap(), LogLevel::Debug);
    assert_eq!("Warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
    assert_eq!("ERR".parse::<LogLevel>().unwrap(), LogLevel::Error);
    assert!("loud".parse::<LogLevel>().is_err());
}

#[test]
fn test_disabled_logger_installs_nothing() {
    assert!(init_tracing(&LoggerConfig::default(), "test").is_ok());
}
