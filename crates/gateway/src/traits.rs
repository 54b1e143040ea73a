//! Tool source and tool execution traits.

use crate::{Result, Tool};
use serde_json::{Map, Value};
use std::future::Future;

/// Source of tool descriptors.
///
/// The catalog is read fresh on every call; implementations must not cache.
pub trait ToolCatalog: Send + Sync {
    /// List every tool currently advertised.
    fn list_tools(&self) -> impl Future<Output = Result<Vec<Tool>>> + Send;

    /// Look a single tool up by name.
    fn get_tool(&self, name: &str) -> impl Future<Output = Result<Tool>> + Send;

    /// Whether the catalog source is reachable. Never fails.
    fn is_healthy(&self) -> impl Future<Output = bool> + Send;
}

/// Executes resolved tool calls.
///
/// This is the boundary between query resolution and side effects.
pub trait ToolInvoker: Send + Sync {
    /// Execute `tool_name` with `parameters` and return its raw result.
    fn invoke(
        &self,
        tool_name: &str,
        parameters: &Map<String, Value>,
    ) -> impl Future<Output = Result<Value>> + Send;
}
