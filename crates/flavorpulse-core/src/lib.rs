//! Shared contract and configuration for FlavorPulse.
//!
//! Holds the input types handed to the demand pipeline by its collaborators
//! (`ContentItem`, `TrendSignal`), env-driven application configuration, and
//! the alias-file loader that extends the built-in ingredient alias table.

pub mod aliases;
pub mod app_config;
pub mod config;
pub mod content;

use thiserror::Error;

pub use aliases::{load_aliases, parse_aliases, AliasEntry, AliasFile};
pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use content::{ContentItem, TrendSignal};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read alias file {path}: {source}")]
    AliasFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse alias file: {0}")]
    AliasFileParse(#[from] serde_yaml::Error),

    #[error("alias validation failed: {0}")]
    Validation(String),
}
