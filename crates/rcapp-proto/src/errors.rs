//! Error types for the wire format.
//!
//! [`ProtocolError`] covers everything that can go wrong with an inbound
//! message. [`ActionError`] covers outbound commands rejected before they
//! reach the wire.

use thiserror::Error;

use crate::ActionName;

/// Result alias for inbound decoding.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Inbound message could not be interpreted.
///
/// Never fatal: the offending message is discarded and the session continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Text was not a JSON object with a `message` field.
    #[error("malformed message: {0}")]
    Malformed(String),

    /// Declared message type is not part of the protocol.
    #[error("unrecognized message type: {0:?}")]
    UnknownMessageType(String),

    /// `FullState` payload did not carry a mode identifier.
    #[error("FullState payload has no mode identifier")]
    MissingMode,

    /// Payload did not match the shape required by its message type.
    #[error("invalid {message_type} payload: {reason}")]
    InvalidPayload {
        /// Declared message type
        message_type: &'static str,
        /// Decoder failure
        reason: String,
    },

    /// Host reported a mode id the client does not know.
    #[error("unknown mode id: {0:?}")]
    UnknownMode(String),

    /// Host reported a mode that exists only on the client.
    #[error("mode {0:?} is local-only and cannot be reported by the host")]
    LocalModeReported(String),

    /// Value could not be encoded as JSON.
    #[error("encoding failed: {0}")]
    Encode(String),
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Outbound command rejected before serialization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// Name is not part of the action vocabulary.
    #[error("unknown action: {0:?}")]
    UnknownAction(String),

    /// Wrong number of parameters for the action.
    #[error("{action} expects {expected} parameter(s), got {actual}")]
    WrongArity {
        /// Action being built
        action: ActionName,
        /// Parameters the action takes
        expected: usize,
        /// Parameters supplied
        actual: usize,
    },

    /// Parameter failed its type or range check.
    #[error("invalid parameter for {action}: {reason}")]
    InvalidParameter {
        /// Action being built
        action: ActionName,
        /// What was wrong with it
        reason: String,
    },
}
