//! Tool gateway client library.
//!
//! This crate talks to a remote tool gateway over REST: it lists the tools the
//! gateway advertises, looks a single tool up, executes tool calls and probes
//! the gateway's health. Every gateway response is wrapped in a
//! [`GatewayResponse`] envelope which this crate unwraps into typed results.
//!
//! # Example
//!
//! ```no_run
//! use gateway::{GatewayClient, GatewayConfig, ToolCatalog, ToolInvoker};
//!
//! # async fn example() -> gateway::Result<()> {
//! let config = GatewayConfig::new("http://localhost:8080/mcp/api");
//! let client = GatewayClient::new(config)?;
//!
//! for tool in client.list_tools().await? {
//!     println!("Tool: {}", tool.name);
//! }
//!
//! let mut parameters = serde_json::Map::new();
//! parameters.insert("operation".into(), "add".into());
//! parameters.insert("a".into(), 2.into());
//! parameters.insert("b".into(), 3.into());
//! let result = client.invoke("calculator", &parameters).await?;
//! println!("{result}");
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod protocol;
mod traits;

pub use client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, GatewayClient, GatewayConfig};
pub use error::{Error, Result};
pub use protocol::{ErrorDetails, ExecuteRequest, GatewayResponse, Tool, ToolParameter, ToolReturn};
pub use traits::{ToolCatalog, ToolInvoker};
