//! ArtifactWriter — persists the outputs declared under `artifacts`.
//!
//! Storage path: `<base dir>/<filename>` (base dir defaults to `artifacts/`
//! in the working directory).
//!
//! Content selection per artifact:
//! - `generated_by` names an agent that responded → that response, verbatim
//! - otherwise → a document with the project name and the full transcript
//!
//! A failed write is reported and skipped; it never stops sibling artifacts.
//! Filenames must stay inside the base dir: absolute paths and `..` are
//! reported as failures.

use std::io::Write;
use std::path::{Component, Path, PathBuf};

use crate::error::AipError;
use crate::i18n::Catalog;
use crate::t;
use crate::workflow::executor::{LastResponses, Transcript};
use crate::workflow::schema::ArtifactSpec;

/// Default output directory, relative to the working directory.
pub const ARTIFACTS_DIR: &str = "artifacts";

/// Outcome of one `write_all` pass.
#[derive(Debug, Default)]
pub struct ArtifactReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<ArtifactFailure>,
}

#[derive(Debug)]
pub struct ArtifactFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Pick the content for one artifact.
pub fn select_content(
    spec: &ArtifactSpec,
    last_responses: &LastResponses,
    transcript: &Transcript,
    project: &str,
) -> String {
    spec.generated_by
        .as_deref()
        .and_then(|agent_id| last_responses.get(agent_id))
        .cloned()
        .unwrap_or_else(|| transcript_document(project, transcript))
}

/// The fallback artifact body: project header plus the whole transcript.
pub fn transcript_document(project: &str, transcript: &Transcript) -> String {
    format!("# {}\n\nDemo output:\n{}\n", project, transcript.trimmed())
}

/// Writes artifacts under a base directory.
pub struct ArtifactWriter<'a> {
    base_dir: PathBuf,
    catalog: &'a Catalog,
}

impl<'a> ArtifactWriter<'a> {
    /// Writer rooted at `artifacts/` in the working directory.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self::with_base_dir(catalog, ARTIFACTS_DIR)
    }

    pub fn with_base_dir(catalog: &'a Catalog, base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            catalog,
        }
    }

    /// Write every artifact with a filename, reporting each result to `out`.
    ///
    /// Only a failing `out` sink is an error; file failures land in the report.
    pub fn write_all<W: Write>(
        &self,
        artifacts: &[ArtifactSpec],
        last_responses: &LastResponses,
        transcript: &Transcript,
        project: &str,
        out: &mut W,
    ) -> Result<ArtifactReport, AipError> {
        let mut report = ArtifactReport::default();

        for spec in artifacts {
            let Some(filename) = spec.filename.as_deref().filter(|f| !f.is_empty()) else {
                continue;
            };
            let path = self.base_dir.join(filename);
            let content = select_content(spec, last_responses, transcript, project);

            let saved = if is_contained(Path::new(filename)) {
                save(&path, &content).map_err(|e| e.to_string())
            } else {
                Err(format!("'{}' escapes the artifacts directory", filename))
            };

            match saved {
                Ok(()) => {
                    writeln!(
                        out,
                        "{}",
                        t!(self.catalog, "artifact_saved", path = path.display())
                    )?;
                    report.written.push(path);
                }
                Err(e) => {
                    tracing::warn!("[Artifacts] Failed to write '{}': {}", path.display(), e);
                    writeln!(
                        out,
                        "{}",
                        t!(
                            self.catalog,
                            "saving_artifact_failed",
                            path = path.display(),
                            error = e
                        )
                    )?;
                    report.failed.push(ArtifactFailure {
                        path,
                        error: e,
                    });
                }
            }
        }

        Ok(report)
    }
}

/// True when `filename` is relative and never climbs out of its base.
fn is_contained(filename: &Path) -> bool {
    filename
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Create missing parent directories, then create or truncate the file.
fn save(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
}
