//! Thin wrappers over `serde_json`.
//!
//! Key order is preserved (`preserve_order`), so a reformat never shuffles
//! an object's members.  Numbers keep their source digits
//! (`arbitrary_precision`), so integers past 64 bits are not rounded.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;

use super::error::DocumentError;

/// Indentation used when nothing else is configured.
pub const DEFAULT_INDENT: usize = 4;

/// Parse `text` into a JSON value.
pub fn parse(text: &str) -> Result<Value, DocumentError> {
    Ok(serde_json::from_str(text)?)
}

/// Serialise `value` with `indent` spaces per nesting level.
///
/// No trailing newline is emitted.
pub fn pretty(value: &Value, indent: usize) -> String {
    let indent = vec![b' '; indent];
    let mut out = Vec::new();
    let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(&indent));
    // Writing a `Value` into a `Vec` has no failure path.
    if value.serialize(&mut ser).is_err() {
        return value.to_string();
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Parse the trimmed `text` and pretty-print it again.
pub fn reformat(text: &str, indent: usize) -> Result<String, DocumentError> {
    let value = parse(text.trim())?;
    Ok(pretty(&value, indent))
}
