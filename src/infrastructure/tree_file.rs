use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::BridgeError;
use crate::ports::ParseTreeSource;

/// Read a whole file into a string.
pub fn read_source_file(path: &Path) -> Result<String, BridgeError> {
    let bytes = fs::read(path).map_err(|source| BridgeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| BridgeError::InvalidUtf8)
}

/// Decode parse tree text into the value model. Object field order is
/// preserved.
pub fn parse_document(text: &str) -> Result<Value, BridgeError> {
    let value = serde_json::from_str(text)?;
    Ok(value)
}

/// A parse tree that was serialized to disk ahead of time.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ParseTreeSource for JsonFileSource {
    fn describe(&self) -> String {
        format!("parse tree file {}", self.path.display())
    }

    fn load_parse_tree(&self) -> Result<String, BridgeError> {
        debug!(path = %self.path.display(), "reading parse tree");
        read_source_file(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_source_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hello.b");
        fs::write(&path, "main() {\n  extrn putchar;\n}\n").unwrap();
        assert_eq!(read_source_file(&path).unwrap(), "main() {\n  extrn putchar;\n}\n");
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_source_file(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, BridgeError::Read { .. }));
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_read_non_utf8_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, [0xffu8, 0xfe, 0x00]).unwrap();
        assert!(matches!(read_source_file(&path), Err(BridgeError::InvalidUtf8)));
    }

    #[test]
    fn test_parse_document_preserves_field_order() {
        let value = parse_document(r#"{"root":"P","node":"P","left":null}"#).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["root", "node", "left"]);
    }

    #[test]
    fn test_parse_document_rejects_garbage() {
        let err = parse_document("{\"node\": ").unwrap_err();
        assert!(matches!(err, BridgeError::InvalidJson(_)));
    }

    #[test]
    fn test_json_file_source() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tree.json");
        fs::write(&path, r#"{"node":"PROG","root":"PROG"}"#).unwrap();
        let source = JsonFileSource::new(&path);
        assert!(source.describe().contains("tree.json"));
        let value = parse_document(&source.load_parse_tree().unwrap()).unwrap();
        assert_eq!(value["node"], "PROG");
    }
}
