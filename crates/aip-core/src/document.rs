//! JSON document loading with distinct "missing", "unreadable" and
//! "malformed" failures.

use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;

use crate::error::AipError;

/// Read a UTF-8 JSON document from `path`.
pub fn load_json(path: &Path) -> Result<Value, AipError> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => AipError::NotFound {
            path: path.display().to_string(),
        },
        ErrorKind::InvalidData => AipError::MalformedDocument {
            path: path.display().to_string(),
            message: e.to_string(),
        },
        _ => AipError::Unreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        },
    })?;
    parse_json(&content, &path.display().to_string())
}

/// Parse JSON text, labelling diagnostics with `origin`.
pub fn parse_json(content: &str, origin: &str) -> Result<Value, AipError> {
    serde_json::from_str(content).map_err(|e| AipError::MalformedDocument {
        path: origin.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_json(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, AipError::NotFound { .. }));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{\"agents\": [").unwrap();

        match load_json(&path).unwrap_err() {
            AipError::MalformedDocument { path: p, message } => {
                assert!(p.ends_with("broken.json"));
                assert!(message.contains("line 1"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_load_directory_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        match load_json(dir.path()).unwrap_err() {
            AipError::Unreadable { path, .. } => assert_eq!(path, dir.path().display().to_string()),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_load_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.json");
        std::fs::write(&path, r#"{"agents": []}"#).unwrap();

        let doc = load_json(&path).unwrap();
        assert!(doc["agents"].is_array());
    }
}
