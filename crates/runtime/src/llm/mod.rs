//! LLM chat backends.

pub mod errors;
mod openai;
pub mod types;

pub use errors::LlmError;
pub use openai::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT, OpenAiBackend,
    OpenAiBackendBuilder, PLACEHOLDER_API_KEY, resolve_api_key,
};
pub use types::{ChatRequest, ChatResponse, LlmBackend, Message, Role, Usage};
