//! Error types for the Qsync client.

use qsync_protocol::ProtocolError;
use thiserror::Error;

/// Boxed underlying cause of a connection failure.
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by hub operations.
#[derive(Debug, Error)]
pub enum QsyncError {
    /// Socket could not be opened, written or read, or timed out.
    #[error("{context}: {source}")]
    Connection {
        /// What was being attempted.
        context: String,
        /// Underlying transport fault.
        #[source]
        source: BoxedCause,
    },

    /// The hub replied with something the protocol does not allow.
    #[error("unexpected data from qsync: {0}")]
    UnexpectedData(ProtocolError),

    /// A caller-supplied argument violates a precondition.
    #[error("invalid input: {0}")]
    Input(String),

    /// Client configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl QsyncError {
    /// Create a connection error chaining `source`.
    pub fn connection(context: impl Into<String>, source: impl Into<BoxedCause>) -> Self {
        QsyncError::Connection {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Whether this is a transport-level failure.
    pub fn is_connection(&self) -> bool {
        matches!(self, QsyncError::Connection { .. })
    }
}

/// Faults in what the hub sent are `UnexpectedData`; faults in what the
/// caller asked for are `Input`.
impl From<ProtocolError> for QsyncError {
    fn from(err: ProtocolError) -> Self {
        if err.is_unexpected_data() {
            QsyncError::UnexpectedData(err)
        } else {
            QsyncError::Input(err.to_string())
        }
    }
}
