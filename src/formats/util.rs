use std::path::Path;

use serde_json::Value;

use super::{IoError, Result};

pub(crate) fn extension(path: &Path) -> Result<String> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.to_ascii_lowercase())
        .ok_or_else(|| IoError::UnsupportedFormat(path.to_string_lossy().to_string()))?;
    Ok(ext)
}

/// Serializes a metadata value for the TIFF `ImageDescription` tag.
///
/// TIFF ASCII fields cannot carry other bytes, so non-ASCII characters are
/// emitted as JSON `\u` escapes.
pub(crate) fn encode_description(value: &Value) -> Result<String> {
    let serialized = serde_json::to_string(value)?;
    let mut escaped = String::with_capacity(serialized.len());
    let mut units = [0_u16; 2];
    for character in serialized.chars() {
        if character.is_ascii() {
            escaped.push(character);
        } else {
            for unit in character.encode_utf16(&mut units) {
                escaped.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    Ok(escaped)
}

/// Returns the description as a JSON object when it is one.
pub(crate) fn decode_description(description: &str) -> Option<serde_json::Map<String, Value>> {
    match serde_json::from_str::<Value>(description.trim_end_matches('\0')) {
        Ok(Value::Object(mapping)) => Some(mapping),
        _ => None,
    }
}
