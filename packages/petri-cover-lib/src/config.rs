use petri_cover_macros::config;
use serde::{Deserialize, Serialize};

use crate::logger::LogLevel;

pub trait IntoOr<T> {
    fn into_or(self, or: T) -> T;
}

impl<T> IntoOr<Option<T>> for Option<T> {
    fn into_or(self, or: Option<T>) -> Option<T> {
        self.or(or)
    }
}

impl<T> IntoOr<T> for Option<T> {
    fn into_or(self, or: T) -> T {
        self.unwrap_or(or)
    }
}

pub trait GeneralConfig {
    fn logger(&self) -> &LoggerConfig;
}

config! {
    pub struct LoggerConfig {
        enabled: bool = false,
        /// Also write the log to `./logs/<name>_run_<timestamp>.txt`.
        log_file: bool = false,
        log_level: LogLevel = LogLevel::Warn,
    }
}

/// Which dominated ancestor a new marking is accelerated against when more
/// than one is dominated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccelerationStrategy {
    /// The first dominated ancestor found walking from the parent towards
    /// the root.
    ClosestAncestor,
    /// The first dominated ancestor found walking from the root downwards.
    FarthestAncestor,
}

config! {
    pub struct CoverabilityConfig {
        /// Upper bound on the number of nodes in the tree.
        max_nodes: Option<u64> = None,
        /// Upper bound on the depth of any node, the root has depth 0.
        max_depth: Option<u64> = None,
        acceleration: AccelerationStrategy = AccelerationStrategy::ClosestAncestor,
        logger: LoggerConfig (Option<PartialLoggerConfig> = LoggerConfig::default()),
    }
}

impl GeneralConfig for CoverabilityConfig {
    fn logger(&self) -> &LoggerConfig {
        &self.logger
    }
}

#[test]
fn test_partial_config() {
    let config = CoverabilityConfig::from_toml_str(
        r#"
        max_nodes = 500
        acceleration = "FarthestAncestor"

        [logger]
        enabled = true
        log_level = "Debug"
        "#,
    )
    .unwrap();

    assert_eq!(*config.get_max_nodes(), Some(500));
    assert_eq!(*config.get_max_depth(), None);
    assert_eq!(
        *config.get_acceleration(),
        AccelerationStrategy::FarthestAncestor
    );
    assert!(*config.logger().get_enabled());
    assert!(!*config.logger().get_log_file());
    assert_eq!(*config.logger().get_log_level(), LogLevel::Debug);
}

#[test]
fn test_empty_config_is_default() {
    let config = CoverabilityConfig::from_toml_str("").unwrap();
    assert_eq!(config, CoverabilityConfig::default());
}

#[test]
fn test_unknown_key_is_rejected() {
    assert!(CoverabilityConfig::from_toml_str("max_notes = 3").is_err());
}
