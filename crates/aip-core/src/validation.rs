//! Structural validation of manifests against the bundled JSON Schema.
//!
//! The schema lives next to the crate (`schema/aip.schema.json`) and is
//! compiled into the binary; it is still parsed at runtime, so a broken
//! schema surfaces as a malformed document rather than a panic.

use jsonschema::{ValidationError, Validator};
use serde_json::Value;

use crate::document::parse_json;
use crate::error::AipError;

/// The manifest schema shipped with this crate.
pub const BUILTIN_SCHEMA: &str = include_str!("../schema/aip.schema.json");

/// Label used for diagnostics about the bundled schema.
pub const BUILTIN_SCHEMA_ORIGIN: &str = "<builtin schema>";

/// A compiled manifest schema.
pub struct ManifestValidator {
    validator: Validator,
}

impl ManifestValidator {
    /// Compile the bundled schema.
    pub fn builtin() -> Result<Self, AipError> {
        let schema = parse_json(BUILTIN_SCHEMA, BUILTIN_SCHEMA_ORIGIN)?;
        Self::from_schema(&schema, BUILTIN_SCHEMA_ORIGIN)
    }

    /// Compile an arbitrary schema document.
    pub fn from_schema(schema: &Value, origin: &str) -> Result<Self, AipError> {
        let validator = Validator::new(schema).map_err(|e| AipError::MalformedDocument {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { validator })
    }

    /// Check `document`, reporting only the first violation.
    pub fn validate(&self, document: &Value) -> Result<(), AipError> {
        match self.validator.iter_errors(document).next() {
            None => Ok(()),
            Some(error) => Err(AipError::Validation(describe(&error))),
        }
    }
}

/// Validate `document` against `schema` in one call.
pub fn validate(document: &Value, schema: &Value) -> Result<(), AipError> {
    ManifestValidator::from_schema(schema, "<schema>")?.validate(document)
}

fn describe(error: &ValidationError<'_>) -> String {
    let location = error.instance_path.to_string();
    let location = if location.is_empty() { "/" } else { location.as_str() };
    format!("{} (at {})", error, location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator() -> ManifestValidator {
        ManifestValidator::builtin().expect("bundled schema must compile")
    }

    #[test]
    fn test_minimal_manifest_is_valid() {
        let doc = json!({
            "agents": [{ "id": "a", "name": "Alpha" }],
            "workflow": { "steps": [] }
        });
        validator().validate(&doc).unwrap();
    }

    #[test]
    fn test_full_manifest_is_valid() {
        let doc = json!({
            "aip_version": "1.0",
            "project": { "name": "Demo" },
            "agents": [{
                "id": "r",
                "name": "Researcher",
                "tools": [
                    { "provider": "openai" },
                    { "provider": "mcp", "x-mcp": { "server": "s", "tool": "t", "params": { "q": 1 } } }
                ]
            }],
            "workflow": { "steps": [{ "agent": "r", "task": "Find" }] },
            "artifacts": [{ "filename": "out.md", "generated_by": "r" }, { "note": "skipped" }]
        });
        validator().validate(&doc).unwrap();
    }

    #[test]
    fn test_missing_required_field_reports_path() {
        let doc = json!({
            "agents": [{ "id": "a", "name": "Alpha" }],
            "workflow": { "steps": [{ "agent": "a" }] }
        });
        match validator().validate(&doc).unwrap_err() {
            AipError::Validation(msg) => {
                assert!(msg.contains("task"), "{}", msg);
                assert!(msg.contains("/workflow/steps/0"), "{}", msg);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let doc = json!({ "agents": "nope", "workflow": { "steps": [] } });
        assert!(matches!(
            validator().validate(&doc),
            Err(AipError::Validation(_))
        ));
    }

    #[test]
    fn test_malformed_schema() {
        let schema = json!({ "type": 42 });
        let err = ManifestValidator::from_schema(&schema, "custom.json").err().unwrap();
        assert!(matches!(err, AipError::MalformedDocument { .. }));
    }

    #[test]
    fn test_validate_free_function() {
        let schema = json!({ "type": "object", "required": ["x"] });
        assert!(validate(&json!({ "x": 1 }), &schema).is_ok());
        assert!(validate(&json!({}), &schema).is_err());
    }
}
