//! Hex text codec.
//!
//! The hub's traffic is most readable as lowercase hex, so logs, hardware
//! identifiers and group codes all use this representation.

use crate::error::ProtocolError;

/// Encode bytes as lowercase hex, two digits per byte, no separators.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode hex text into bytes.
///
/// Fails on odd-length input or any non-hex character.
pub fn hex_to_bytes(text: &str) -> Result<Vec<u8>, ProtocolError> {
    Ok(hex::decode(text)?)
}

/// Decode a NUL-padded text field, dropping trailing NULs and whitespace.
pub fn decode_padded_text(bytes: &[u8]) -> Result<String, ProtocolError> {
    let text = std::str::from_utf8(bytes).map_err(|_| ProtocolError::InvalidUtf8)?;
    Ok(text
        .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string())
}
