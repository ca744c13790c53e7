//! Core error type for the AIP runner.
//!
//! Every variant is fatal to the command that produced it. Recoverable
//! conditions (artifact write failures, bad tool configuration, catalog
//! formatting problems) are handled where they happen and never reach here.

use crate::i18n::Catalog;
use crate::t;

#[derive(Debug, thiserror::Error)]
pub enum AipError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Cannot read {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("Malformed JSON in {path}: {message}")]
    MalformedDocument { path: String, message: String },

    #[error("Manifest validation failed: {0}")]
    Validation(String),

    #[error("Step {index}: unknown agent id '{agent_id}'")]
    UnknownAgent { index: usize, agent_id: String },

    #[error("Output error: {0}")]
    Output(String),
}

impl AipError {
    /// Render the diagnostic through the message catalog.
    pub fn localize(&self, catalog: &Catalog) -> String {
        match self {
            AipError::NotFound { path } => t!(catalog, "file_not_found", path = path),
            AipError::Unreadable { path, message } => {
                t!(catalog, "file_read_failed", path = path, error = message)
            }
            AipError::MalformedDocument { path, message } => {
                t!(catalog, "json_error", path = path, error = message)
            }
            AipError::Validation(message) => {
                t!(catalog, "manifest_validation_failed", error = message)
            }
            AipError::UnknownAgent { index, agent_id } => {
                t!(catalog, "unknown_agent", index = index, agent_id = agent_id)
            }
            AipError::Output(message) => t!(catalog, "output_failed", error = message),
        }
    }
}

impl From<std::io::Error> for AipError {
    fn from(e: std::io::Error) -> Self {
        AipError::Output(e.to_string())
    }
}
