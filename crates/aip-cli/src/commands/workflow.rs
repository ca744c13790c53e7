//! `aip-runner validate` / `aip-runner run` — check and dry-run AIP manifests.

use std::io::Write;
use std::path::Path;

use aip_core::workflow::{ArtifactWriter, Manifest, WorkflowInterpreter};
use aip_core::{t, ToolClient};

use super::{emit, Session};

/// Validate a manifest without executing it.
pub fn validate<W: Write>(session: &Session, manifest_path: &Path, out: &mut W) -> Result<(), String> {
    Manifest::load(manifest_path).map_err(|e| session.describe(e))?;
    emit(out, &t!(session.catalog, "validation_ok"), session)
}

/// Validate a manifest, walk its steps and write its artifacts under `artifacts_dir`.
pub fn run<W: Write>(
    session: &Session,
    manifest_path: &Path,
    client: &dyn ToolClient,
    artifacts_dir: &Path,
    out: &mut W,
) -> Result<(), String> {
    let catalog = &session.catalog;
    let manifest = Manifest::load(manifest_path).map_err(|e| session.describe(e))?;
    tracing::info!(
        "[Workflow] Loaded '{}' (aip_version {}, {} step(s), {} artifact(s))",
        manifest_path.display(),
        manifest.aip_version.as_deref().unwrap_or("unset"),
        manifest.steps().len(),
        manifest.artifacts.len()
    );
    if let Some(description) = manifest.project.description.as_deref() {
        tracing::debug!("[Workflow] {}: {}", manifest.project_name(), description);
    }

    emit(out, &t!(catalog, "validation_ok"), session)?;
    emit(out, "", session)?;
    emit(
        out,
        &t!(catalog, "scenario_start", project = manifest.project_name()),
        session,
    )?;
    emit(out, "", session)?;

    let mut interpreter = WorkflowInterpreter::new(catalog, client);
    if let Some(config) = session.mcp.as_ref() {
        interpreter = interpreter.with_mcp_config(config);
    }
    let state = interpreter
        .interpret(&manifest, out)
        .map_err(|e| session.describe(e))?;

    let report = ArtifactWriter::with_base_dir(catalog, artifacts_dir)
        .write_all(
            &manifest.artifacts,
            &state.last_responses,
            &state.transcript,
            manifest.project_name(),
            out,
        )
        .map_err(|e| session.describe(e))?;
    tracing::info!(
        "[Workflow] {} step(s) executed, {} artifact(s) written",
        state.steps_executed,
        report.written.len()
    );
    if !report.failed.is_empty() {
        tracing::warn!("[Workflow] {} artifact(s) could not be written", report.failed.len());
    }

    emit(out, "", session)?;
    emit(out, &t!(catalog, "done"), session)
}
