//! CLI error types.

use thiserror::Error;

use crate::config::ConfigError;

/// CLI errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Configuration is invalid or could not be read.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// A query failed somewhere in the pipeline.
    #[error(transparent)]
    Runtime(#[from] runtime::Error),

    /// The gateway could not be reached or rejected a request.
    #[error(transparent)]
    Gateway(#[from] gateway::Error),

    #[error(transparent)]
    Calculator(#[from] runtime::CalculatorError),

    #[error("failed to render output: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
