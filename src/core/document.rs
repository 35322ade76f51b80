//! Reading and writing JSON documents on disk.

use std::path::{Path, PathBuf};

use serde_json::Value;

use super::error::DocumentError;
use super::json;

/// Extension appended by the save dialog when the user types none.
pub const DEFAULT_EXTENSION: &str = "json";

/// Read `path` as UTF-8, parse it and return the pretty-printed text.
pub fn read_document(path: &Path, indent: usize) -> Result<String, DocumentError> {
    let raw = std::fs::read_to_string(path).map_err(|e| DocumentError::io(path, e))?;
    let value = json::parse(&raw)?;
    Ok(json::pretty(&value, indent))
}

/// Write the pretty-printed form of an already validated `value`.
pub fn write_document(path: &Path, value: &Value, indent: usize) -> Result<(), DocumentError> {
    let text = json::pretty(value, indent);
    std::fs::write(path, text).map_err(|e| DocumentError::io(path, e))
}

/// Append `.json` when `path` has no extension.
pub fn with_default_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(DEFAULT_EXTENSION)
    }
}
