//! Workflow engine — JSON-driven multi-agent dry runs.
//!
//! A manifest declares agents and an ordered list of steps; the interpreter
//! walks the steps, calls MCP tools through a [`ToolClient`](crate::mcp::ToolClient)
//! and records a transcript that the artifact writer persists.
//!
//! # Architecture
//!
//! ```text
//! manifest.json ──► Manifest ──► WorkflowInterpreter ──► RunState
//!                                        │                   │
//!                                   ToolClient         ArtifactWriter
//!                                   (MCP stub)          artifacts/*
//! ```

pub mod artifacts;
pub mod executor;
pub mod schema;

pub use artifacts::{ArtifactReport, ArtifactWriter, ARTIFACTS_DIR};
pub use executor::{LastResponses, RunState, Transcript, WorkflowInterpreter};
pub use schema::{AgentDef, ArtifactSpec, Manifest, McpBinding, StepDef, ToolBinding};
