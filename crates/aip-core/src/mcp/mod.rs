//! MCP tool integration — the seam where a real tool-server transport plugs in.
//!
//! Today there is exactly one client, [`StubToolClient`], which performs no
//! I/O and echoes its inputs. The interpreter only sees the [`ToolClient`]
//! trait, so a stdio or socket transport can replace the stub without
//! touching the workflow loop.

pub mod config;

use serde_json::{Map, Value};

pub use config::{McpConfig, McpServerConfig, McpTransport, SERVERS_ENV};

/// A synchronous tool invocation capability.
///
/// Implementations may block; callers must not assume the call is cheap.
pub trait ToolClient {
    fn invoke(&self, server: &str, tool: &str, params: &Map<String, Value>) -> String;
}

/// Placeholder client that formats its inputs instead of calling a server.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubToolClient;

impl StubToolClient {
    pub fn new() -> Self {
        Self
    }
}

impl ToolClient for StubToolClient {
    fn invoke(&self, server: &str, tool: &str, params: &Map<String, Value>) -> String {
        tracing::debug!("[MCP] stub call server={} tool={}", server, tool);
        format!(
            "[mcp-demo] server={}, tool={}, params={}",
            server,
            tool,
            Value::Object(params.clone())
        )
    }
}
