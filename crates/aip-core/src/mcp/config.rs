//! MCP server configuration — which tool servers exist and how to reach them.
//!
//! Sources, highest priority first:
//! 1. an explicit JSON string (the `--mcp-config` flag)
//! 2. the `AIP_MCP_SERVERS` environment variable
//! 3. nothing (empty configuration)
//!
//! ```json
//! {
//!   "search": { "type": "stdio", "command": "search-mcp", "args": ["--fast"] },
//!   "docs":   { "type": "http", "url": "http://localhost:8931/mcp" }
//! }
//! ```
//!
//! Malformed input never fails the run: a document that is not a JSON object
//! resolves to an empty configuration, and a single unusable descriptor is
//! dropped without affecting its siblings. A descriptor given as a bare
//! string is taken as the server URL.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Environment variable holding the JSON server map.
pub const SERVERS_ENV: &str = "AIP_MCP_SERVERS";

/// Transport type for an MCP server.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum McpTransport {
    Stdio,
    Http,
    Sse,
    /// Any transport this runner does not know by name (e.g. `websocket`)
    #[serde(other)]
    Other,
}

impl std::fmt::Display for McpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            McpTransport::Stdio => write!(f, "stdio"),
            McpTransport::Http => write!(f, "http"),
            McpTransport::Sse => write!(f, "sse"),
            McpTransport::Other => write!(f, "other"),
        }
    }
}

/// Connection descriptor for one tool server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct McpServerConfig {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<McpTransport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,
}

impl McpServerConfig {
    /// Read one descriptor; a bare string is shorthand for `{"url": ...}`.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::String(url) => Ok(Self {
                url: Some(url),
                ..Self::default()
            }),
            other => serde_json::from_value(other),
        }
    }
}

/// Resolved tool-server configuration, keyed by server id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct McpConfig {
    servers: BTreeMap<String, McpServerConfig>,
}

impl McpConfig {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolve from an explicit string, else the environment string.
    ///
    /// Blank strings count as absent.
    pub fn resolve(explicit: Option<&str>, env: Option<&str>) -> Self {
        let present = |raw: &&str| !raw.trim().is_empty();
        match explicit.filter(present).or(env.filter(present)) {
            Some(raw) => Self::parse(raw),
            None => Self::empty(),
        }
    }

    /// Resolve using the process environment for the fallback source.
    pub fn from_env_or(explicit: Option<&str>) -> Self {
        let env = std::env::var(SERVERS_ENV).ok();
        Self::resolve(explicit, env.as_deref())
    }

    /// Parse a JSON server map.
    ///
    /// A document that is not a JSON object yields an empty config; an entry
    /// that cannot be read as a descriptor is skipped.
    pub fn parse(raw: &str) -> Self {
        let entries = match serde_json::from_str::<Map<String, Value>>(raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!("[MCP] Ignoring malformed server config: {}", e);
                return Self::empty();
            }
        };

        let servers: BTreeMap<String, McpServerConfig> = entries
            .into_iter()
            .filter_map(|(id, value)| match McpServerConfig::from_value(value) {
                Ok(server) => Some((id, server)),
                Err(e) => {
                    tracing::debug!("[MCP] Skipping server '{}': {}", id, e);
                    None
                }
            })
            .collect();

        tracing::debug!("[MCP] Loaded {} server descriptor(s)", servers.len());
        Self { servers }
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn get(&self, server: &str) -> Option<&McpServerConfig> {
        self.servers.get(server)
    }
}
