//! JSON serialization helpers for deterministic output.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(serde_json::Error),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Serializes a value to deterministic JSON.
///
/// Output format:
/// - 2-space indentation
/// - Trailing newline
/// - Keys sorted alphabetically (requires `BTreeMap` in source types)
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    let mut json = String::from_utf8(buffer)?;
    json.push('\n'); // Trailing newline
    Ok(json)
}

/// Serializes a value to deterministic JSON bytes.
///
/// Same as `to_json_stable` but returns bytes for direct file writing.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, SerializationError> {
    let json = to_json_stable(value)?;
    Ok(json.into_bytes())
}

/// Deserializes JSON from bytes.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    serde_json::from_slice(bytes).map_err(SerializationError::Deserialize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use debug1c_domain::Order;

    #[test]
    fn test_stable_serialization_has_trailing_newline() {
        let json = to_json_stable(&vec![Order::new(1)]).expect("serialization should work");
        assert!(json.ends_with('\n'));
    }

    #[test]
    fn test_order_fields_are_sorted() {
        let mut order = Order::new(3);
        order.set_field("UPDATED_1C", "N");
        order.set_field("STATUS", "F");
        order.set_field("ACCOUNT", "12");

        let json = to_json_stable(&order).expect("serialization should work");
        let account = json.find("ACCOUNT").expect("ACCOUNT should be in json");
        let status = json.find("STATUS").expect("STATUS should be in json");
        let updated = json.find("UPDATED_1C").expect("UPDATED_1C should be in json");

        assert!(account < status);
        assert!(status < updated);
        assert!(json.contains("  \"id\": 3"));
    }

    #[test]
    fn test_from_json_bytes_rejects_garbage() {
        let result: Result<Vec<Order>, _> = from_json_bytes(b"{oops");
        assert!(matches!(result, Err(SerializationError::Deserialize(_))));
    }
}
