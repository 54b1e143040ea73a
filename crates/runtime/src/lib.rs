//! Toolproxy runtime: query interpretation and tool dispatch.
//!
//! This crate turns a free-text query into exactly one gateway tool call.
//!
//! # Overview
//!
//! - **prompt**: renders the tool catalog into the system prompt.
//! - **Interpreter**: asks an [`LlmBackend`] which tool to use, or falls back
//!   to a deterministic simulated answer when no model is configured.
//! - **QueryOrchestrator**: fetches the catalog, interprets the query, invokes
//!   the chosen tool and assembles a [`ResponseEnvelope`].
//! - **Calculator**: a small typed client for the gateway's calculator tool.
//!
//! # Example
//!
//! ```no_run
//! use gateway::{GatewayClient, GatewayConfig};
//! use runtime::{Interpreter, OpenAiBackend, QueryOrchestrator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = GatewayClient::new(GatewayConfig::default())?;
//! let backend = OpenAiBackend::builder("sk-...", "gpt-3.5-turbo").build()?;
//! let orchestrator = QueryOrchestrator::new(gateway, Interpreter::new(Some(backend)));
//!
//! let envelope = orchestrator.handle("add 2 and 3").await?;
//! println!("{} -> {}", envelope.tool, envelope.result);
//! # Ok(())
//! # }
//! ```

mod calculator;
mod error;
mod interpret;
pub mod llm;
mod orchestrator;
pub mod prompt;

pub use calculator::{CALCULATOR_TOOL, Calculator, CalculatorError, Operation, ParseOperationError};
pub use error::{Error, InterpretError, Result};
pub use interpret::{Interpretation, Interpreter, UNKNOWN_TOOL, parse_reply};
pub use llm::{LlmBackend, LlmError, OpenAiBackend};
pub use orchestrator::{FAILURE_MESSAGE, QueryFailure, QueryOrchestrator, ResponseEnvelope};
