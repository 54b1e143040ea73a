//! End-to-end handling of a single query.

use gateway::{ToolCatalog, ToolInvoker};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::interpret::Interpreter;
use crate::llm::LlmBackend;

/// User-facing summary for every failed query.
pub const FAILURE_MESSAGE: &str = "Could not process your query";

/// Successful answer to a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub query: String,
    pub tool: String,
    pub parameters: Map<String, Value>,
    pub result: Value,
    pub explanation: String,
}

/// Uniform failure body returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryFailure {
    pub error: String,
    pub message: String,
}

impl From<&Error> for QueryFailure {
    fn from(err: &Error) -> Self {
        Self {
            error: FAILURE_MESSAGE.to_string(),
            message: err.to_string(),
        }
    }
}

/// Resolves a query to a tool call and executes it.
///
/// The catalog is fetched on every call. Exactly one tool is invoked per
/// successful query, and none when an earlier step fails.
#[derive(Debug)]
pub struct QueryOrchestrator<G, B> {
    gateway: G,
    interpreter: Interpreter<B>,
}

impl<G, B> QueryOrchestrator<G, B>
where
    G: ToolCatalog + ToolInvoker,
    B: LlmBackend,
{
    pub fn new(gateway: G, interpreter: Interpreter<B>) -> Self {
        Self {
            gateway,
            interpreter,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn interpreter(&self) -> &Interpreter<B> {
        &self.interpreter
    }

    pub async fn handle(&self, query: &str) -> Result<ResponseEnvelope> {
        if query.trim().is_empty() {
            return Err(Error::EmptyQuery);
        }
        info!(query, "processing query");

        let tools = self.gateway.list_tools().await?;
        debug!(count = tools.len(), "fetched tool catalog");

        let interpretation = self.interpreter.interpret(query, &tools).await?;
        if !tools.iter().any(|t| t.name == interpretation.tool) {
            return Err(Error::UnknownTool(interpretation.tool));
        }
        info!(tool = %interpretation.tool, "selected tool");
        debug!(parameters = ?interpretation.parameters, "tool parameters");

        let result = self
            .gateway
            .invoke(&interpretation.tool, &interpretation.parameters)
            .await?;

        Ok(ResponseEnvelope {
            query: query.to_string(),
            tool: interpretation.tool,
            parameters: interpretation.parameters,
            result,
            explanation: interpretation.explanation,
        })
    }
}
