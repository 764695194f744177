//! Response body decoding port.

/// Converts a raw response body into text before it is inspected.
///
/// The exchange endpoint answers in a legacy 8-bit codepage; implementations
/// map that to UTF-8. Decoding never fails: unmappable bytes are replaced.
pub trait BodyDecoder: Send + Sync {
    /// Decodes a response body.
    fn decode(&self, body: &[u8]) -> String;
}
