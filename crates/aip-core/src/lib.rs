//! AIP Core — domain logic for the agent interaction plan runner.
//!
//! This crate loads AIP manifests, validates them against the bundled schema
//! and walks their workflow steps, producing a demo transcript and output
//! artifacts. It has **no CLI dependency** and never exits the process, so the
//! same code paths can be driven from the `aip-runner` binary or from tests.
//!
//! # Architecture
//!
//! ```text
//! manifest.json ──► document::load_json ──► ManifestValidator ──► Manifest
//!                                                                    │
//!                                     McpConfig ──► WorkflowInterpreter ◄── ToolClient
//!                                                                    │
//!                                                         RunState (transcript)
//!                                                                    │
//!                                                            ArtifactWriter
//! ```

pub mod document;
pub mod error;
pub mod i18n;
pub mod mcp;
pub mod validation;
pub mod workflow;

// Convenience re-exports
pub use error::AipError;
pub use i18n::{Catalog, Locale};
pub use mcp::{McpConfig, StubToolClient, ToolClient};
pub use workflow::{ArtifactWriter, Manifest, RunState, WorkflowInterpreter};
