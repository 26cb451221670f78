//! Protocol error types.

use thiserror::Error;

/// Errors that can occur when encoding or decoding hub traffic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Hex text has odd length or contains non-hex characters.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Record is shorter than a fixed field offset requires.
    #[error("record too short: expected at least {expected} bytes, got {actual}")]
    FrameTooShort {
        /// Expected minimum length.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },

    /// Record carries a different tag than the one expected.
    #[error("unexpected record tag: expected {expected}, got {actual}")]
    UnexpectedTag {
        /// Expected tag, hex encoded.
        expected: String,
        /// Tag actually received, hex encoded.
        actual: String,
    },

    /// Hub answered a header request with the all-`ff` sentinel.
    #[error("hub is in a bad state (header 1604ffffffff)")]
    HubBadState,

    /// No supported position has this wire code.
    #[error("could not find position code [{0}]")]
    UnknownPositionCode(String),

    /// A scene references a group code the hub never defined.
    #[error("scene [{scene}] references unknown group code [{code}]")]
    UnknownGroupCode {
        /// Scene holding the reference.
        scene: String,
        /// Group code that could not be resolved.
        code: String,
    },

    /// A set-positions command names more groups than one frame carries.
    #[error("cannot control more than {max} groups in one command, got {actual}")]
    TooManyGroups {
        /// Groups one frame can carry.
        max: usize,
        /// Groups requested.
        actual: usize,
    },

    /// A text field is not valid UTF-8.
    #[error("invalid UTF-8 in text field")]
    InvalidUtf8,
}

impl ProtocolError {
    /// Create a too-short error for a record of `actual` bytes.
    pub fn too_short(expected: usize, actual: usize) -> Self {
        ProtocolError::FrameTooShort { expected, actual }
    }

    /// Whether this error means the hub sent data we did not expect, as
    /// opposed to the caller handing us malformed hex or an oversized command.
    pub fn is_unexpected_data(&self) -> bool {
        !matches!(
            self,
            ProtocolError::InvalidHex(_) | ProtocolError::TooManyGroups { .. }
        )
    }
}

impl From<hex::FromHexError> for ProtocolError {
    fn from(err: hex::FromHexError) -> Self {
        ProtocolError::InvalidHex(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProtocolError::too_short(26, 4);
        assert!(err.to_string().contains("at least 26"));

        let err = ProtocolError::UnknownPositionCode("zz".to_string());
        assert_eq!(err.to_string(), "could not find position code [zz]");
    }

    #[test]
    fn test_unexpected_data_classification() {
        assert!(ProtocolError::HubBadState.is_unexpected_data());
        assert!(ProtocolError::too_short(6, 2).is_unexpected_data());
        assert!(!ProtocolError::InvalidHex("odd length".into()).is_unexpected_data());
        assert!(!ProtocolError::TooManyGroups { max: 8, actual: 9 }.is_unexpected_data());
    }
}
