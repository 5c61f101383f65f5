use thiserror::Error;

use fintrack_config::ConfigError;
use fintrack_core::CoreError;
use fintrack_domain::DomainError;

/// Error type surfaced by the application facade and the CLI.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
