//! Manifest types for agent interaction plans.
//!
//! An AIP manifest declares agents, an ordered list of workflow steps and the
//! artifacts to write when the run finishes:
//!
//! ```json
//! {
//!   "project": { "name": "Release Notes" },
//!   "agents": [
//!     { "id": "researcher", "name": "Researcher",
//!       "tools": [ { "provider": "mcp",
//!                    "x-mcp": { "server": "search", "tool": "web_search",
//!                               "params": { "q": "changelog" } } } ] },
//!     { "id": "writer", "name": "Writer" }
//!   ],
//!   "workflow": {
//!     "steps": [
//!       { "agent": "researcher", "task": "Collect merged PRs" },
//!       { "agent": "writer", "task": "Draft the notes" }
//!     ]
//!   },
//!   "artifacts": [
//!     { "filename": "notes.md", "generated_by": "writer" },
//!     { "filename": "transcript.md" }
//!   ]
//! }
//! ```
//!
//! Structural checks happen in [`crate::validation`]; these types only decode
//! a document that already passed the schema.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::load_json;
use crate::error::AipError;
use crate::validation::ManifestValidator;

/// Project name used when the manifest does not declare one.
pub const DEFAULT_PROJECT_NAME: &str = "AIP Scenario";

/// Provider tag that marks a tool binding as an MCP tool.
pub const MCP_PROVIDER: &str = "mcp";

/// Top-level manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Manifest format version
    #[serde(default)]
    pub aip_version: Option<String>,

    #[serde(default)]
    pub project: ProjectInfo,

    /// Agents referenced by workflow steps
    #[serde(default)]
    pub agents: Vec<AgentDef>,

    #[serde(default)]
    pub workflow: WorkflowDef,

    /// Output files written after the run
    #[serde(default)]
    pub artifacts: Vec<ArtifactSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectInfo {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

/// A named participant in the workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDef {
    /// Unique key referenced by `StepDef::agent`
    pub id: String,

    /// Display name
    pub name: String,

    #[serde(default)]
    pub role: Option<String>,

    /// Tool bindings in declaration order
    #[serde(default)]
    pub tools: Vec<ToolBinding>,
}

impl AgentDef {
    /// The first MCP binding, if the agent declares one.
    pub fn mcp_tool(&self) -> Option<&McpBinding> {
        self.tools.iter().find_map(ToolBinding::as_mcp)
    }
}

/// A tool binding, keyed by its `provider` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawToolBinding", into = "RawToolBinding")]
pub enum ToolBinding {
    /// `provider: "mcp"` with its `x-mcp` extension block
    Mcp(McpBinding),
    /// Any provider this runner cannot call
    Other { provider: String },
}

impl ToolBinding {
    pub fn as_mcp(&self) -> Option<&McpBinding> {
        match self {
            ToolBinding::Mcp(binding) => Some(binding),
            ToolBinding::Other { .. } => None,
        }
    }

    pub fn provider(&self) -> &str {
        match self {
            ToolBinding::Mcp(_) => MCP_PROVIDER,
            ToolBinding::Other { provider } => provider,
        }
    }
}

/// Wire shape of a tool binding.
#[derive(Clone, Serialize, Deserialize)]
struct RawToolBinding {
    provider: String,
    #[serde(rename = "x-mcp", default, skip_serializing_if = "Option::is_none")]
    x_mcp: Option<McpBinding>,
}

impl From<RawToolBinding> for ToolBinding {
    fn from(raw: RawToolBinding) -> Self {
        if raw.provider == MCP_PROVIDER {
            ToolBinding::Mcp(raw.x_mcp.unwrap_or_default())
        } else {
            ToolBinding::Other {
                provider: raw.provider,
            }
        }
    }
}

impl From<ToolBinding> for RawToolBinding {
    fn from(binding: ToolBinding) -> Self {
        match binding {
            ToolBinding::Mcp(mcp) => RawToolBinding {
                provider: MCP_PROVIDER.to_string(),
                x_mcp: Some(mcp),
            },
            ToolBinding::Other { provider } => RawToolBinding {
                provider,
                x_mcp: None,
            },
        }
    }
}

/// The `x-mcp` block of an MCP tool binding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct McpBinding {
    #[serde(default)]
    pub server: Option<String>,

    #[serde(default)]
    pub tool: Option<String>,

    #[serde(default)]
    pub params: Map<String, Value>,
}

impl McpBinding {
    /// `(server, tool, params)` when both server and tool are non-empty.
    pub fn target(&self) -> Option<(&str, &str, &Map<String, Value>)> {
        let server = self.server.as_deref().filter(|s| !s.is_empty())?;
        let tool = self.tool.as_deref().filter(|t| !t.is_empty())?;
        Some((server, tool, &self.params))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowDef {
    /// Ordered list of steps
    #[serde(default)]
    pub steps: Vec<StepDef>,
}

/// One unit of work, assigned to one agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDef {
    /// Agent id (must match an `AgentDef::id`)
    pub agent: String,

    /// Free-text task description
    pub task: String,
}

/// An output file declared by the manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactSpec {
    /// Relative file name under the artifacts directory; entries without one are skipped
    #[serde(default)]
    pub filename: Option<String>,

    /// Agent whose last response becomes the file content
    #[serde(default)]
    pub generated_by: Option<String>,
}

impl Manifest {
    /// Decode a document that already passed schema validation.
    pub fn from_value(document: Value) -> Result<Self, AipError> {
        serde_json::from_value(document).map_err(|e| AipError::Validation(e.to_string()))
    }

    /// Load a manifest file and validate it against the bundled schema.
    pub fn load(path: &Path) -> Result<Self, AipError> {
        let document = load_json(path)?;
        let validator = ManifestValidator::builtin()?;
        Self::load_document(document, &validator)
    }

    /// Validate and decode an already-loaded document.
    pub fn load_document(document: Value, validator: &ManifestValidator) -> Result<Self, AipError> {
        validator.validate(&document)?;
        Self::from_value(document)
    }

    pub fn project_name(&self) -> &str {
        self.project.name.as_deref().unwrap_or(DEFAULT_PROJECT_NAME)
    }

    pub fn steps(&self) -> &[StepDef] {
        &self.workflow.steps
    }
}
