use crate::llm::LlmError;
use thiserror::Error;

/// Failure to turn a query into an interpretation.
#[derive(Debug, Error)]
pub enum InterpretError {
    /// The model replied, but not with a usable interpretation.
    #[error("could not interpret the LLM response: {0}")]
    Parse(String),

    /// The provider call itself failed.
    #[error("LLM provider error: {0}")]
    Upstream(#[from] LlmError),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("query must not be empty")]
    EmptyQuery,

    #[error("tool '{0}' is not offered by the gateway")]
    UnknownTool(String),

    #[error(transparent)]
    Gateway(#[from] gateway::Error),

    #[error(transparent)]
    Interpret(#[from] InterpretError),
}

pub type Result<T> = std::result::Result<T, Error>;
