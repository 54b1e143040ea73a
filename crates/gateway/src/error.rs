//! Gateway error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid gateway configuration: {0}")]
    Config(String),

    #[error("gateway unavailable: {0}")]
    Unavailable(String),

    #[error("tool not found: {0}")]
    ToolNotFound(String),

    #[error("error executing tool: {message}")]
    Execution {
        code: Option<String>,
        message: String,
    },
}

impl Error {
    pub(crate) fn execution(code: Option<String>, message: impl Into<String>) -> Self {
        Self::Execution {
            code,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
