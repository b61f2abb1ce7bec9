//! Error types for the session engine.
//!
//! Three failure classes, none fatal:
//!
//! - [`SessionError::Protocol`]: inbound message discarded, session continues
//! - [`SessionError::Validation`]: operator request rejected before any
//!   network effect
//! - [`SessionError::Connectivity`]: channel failure, session returns to
//!   pairing
//!
//! The engine never returns these as `Err` from [`crate::Session::handle`];
//! they surface as [`crate::SessionAction::Diagnostic`].

use std::fmt;

use rcapp_proto::{ActionError, ProtocolError};
use thiserror::Error;

use crate::lifecycle::LifecycleState;

/// Operator request that cannot be honored in the current state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Outbound action failed vocabulary or parameter checks.
    #[error(transparent)]
    Action(#[from] ActionError),

    /// Connect requested before a Host was chosen.
    #[error("no host selected")]
    NoHostSelected,

    /// Lifecycle operation not valid from the current state.
    #[error("cannot {operation} while {state:?}")]
    InvalidState {
        /// Lifecycle state when the request arrived
        state: LifecycleState,
        /// Operation that was attempted
        operation: &'static str,
    },

    /// Operation needs a live session with the Host.
    #[error("cannot {operation}: not connected to a host")]
    NotActive {
        /// Operation that was attempted
        operation: &'static str,
    },

    /// Navigation operation outside the browsing modes.
    #[error("not browsing playlists")]
    NotBrowsing,

    /// Commit with nothing selected at the current level.
    #[error("nothing selected")]
    NothingSelected,

    /// List index past the end of the current listing.
    #[error("no entry {index} (listing has {len})")]
    NoSuchEntry {
        /// Requested index
        index: usize,
        /// Listing length
        len: usize,
    },

    /// Level selected that is not in the selected playlist.
    #[error("level {level_id:?} is not in the selected playlist")]
    LevelNotInPlaylist {
        /// Offending level
        level_id: String,
    },
}

/// Any failure the engine reports.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Malformed or unrecognized inbound message.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Rejected operator request.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Channel failure or refused connect.
    #[error("connectivity error: {0}")]
    Connectivity(String),
}

impl From<ActionError> for SessionError {
    fn from(err: ActionError) -> Self {
        Self::Validation(ValidationError::Action(err))
    }
}

impl SessionError {
    /// Diagnostic class for operator display.
    #[must_use]
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::Protocol(_) => DiagnosticKind::Protocol,
            Self::Validation(_) => DiagnosticKind::Validation,
            Self::Connectivity(_) => DiagnosticKind::Connectivity,
        }
    }
}

/// Class of an operator-visible diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Inbound message discarded.
    Protocol,
    /// Request rejected.
    Validation,
    /// Channel failed or closed.
    Connectivity,
    /// Host reported an error of its own.
    Host,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Protocol => "protocol",
            Self::Validation => "rejected",
            Self::Connectivity => "connection",
            Self::Host => "host",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_variant() {
        assert_eq!(SessionError::from(ProtocolError::MissingMode).kind(), DiagnosticKind::Protocol);
        assert_eq!(
            SessionError::from(ValidationError::NothingSelected).kind(),
            DiagnosticKind::Validation
        );
        assert_eq!(
            SessionError::from(ActionError::UnknownAction("x".into())).kind(),
            DiagnosticKind::Validation
        );
        assert_eq!(
            SessionError::Connectivity("peer left".into()).kind(),
            DiagnosticKind::Connectivity
        );
    }

    #[test]
    fn action_errors_keep_their_message() {
        let err = SessionError::from(ActionError::UnknownAction("BogusAction".into()));
        assert_eq!(err.to_string(), "validation error: unknown action: \"BogusAction\"");
    }
}
