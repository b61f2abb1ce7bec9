//! Outbound command envelope.
//!
//! Every command the client sends is one JSON object:
//!
//! ```text
//! { "command": "Action", "subcommand": <ActionName>, "parameters": [string...], "timestamp": <RFC 3339> }
//! ```
//!
//! The envelope is built from a validated [`ActionRequest`], so the subcommand
//! is always part of the vocabulary and the parameters always have the right
//! shape.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    ActionRequest,
    errors::{ActionError, ProtocolError},
};

/// Wire form of an [`ActionRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    /// Always [`CommandEnvelope::COMMAND`].
    pub command: String,
    /// Action wire name.
    pub subcommand: String,
    /// Stringified parameters.
    pub parameters: Vec<String>,
    /// Send time, RFC 3339 UTC with millisecond precision.
    pub timestamp: String,
}

impl CommandEnvelope {
    /// Value of the `command` field for host actions.
    pub const COMMAND: &'static str = "Action";

    /// Validate `name` and `params`, then wrap them.
    ///
    /// # Errors
    ///
    /// Any [`ActionError`] from [`ActionRequest::parse`]; no envelope is built.
    pub fn build(
        name: &str,
        params: Vec<String>,
        sent_at: DateTime<Utc>,
    ) -> Result<Self, ActionError> {
        let request = ActionRequest::parse(name, params)?;
        Ok(Self::from_request(&request, sent_at))
    }

    /// Wrap an already validated request.
    #[must_use]
    pub fn from_request(request: &ActionRequest, sent_at: DateTime<Utc>) -> Self {
        Self {
            command: Self::COMMAND.to_string(),
            subcommand: request.name().as_str().to_string(),
            parameters: request.params().to_vec(),
            timestamp: sent_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Serialize to the text sent over the channel.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::Encode` if JSON encoding fails
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Encode(e.to_string()))
    }
}
