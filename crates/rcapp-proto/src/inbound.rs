//! Inbound messages from the Host.
//!
//! Every inbound text is a JSON object `{ "message": <MessageType>, "dataObj":
//! <payload> }`. Parsing is split in two steps:
//!
//! 1. [`InboundMessage::parse`] checks the envelope and classifies the message
//!    type. The payload stays opaque.
//! 2. [`InboundMessage::decode`] interprets the payload according to its type.
//!
//! Keeping the steps apart lets the router log the declared type of a message
//! whose payload turns out to be malformed.

use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    errors::{ProtocolError, Result},
    payloads::{HostSnapshot, PlaylistCatalog},
};

/// Declared type of an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Complete Host run-state.
    FullState,
    /// Host constants; informational.
    Defines,
    /// Complete playlist catalog.
    AllPlaylists,
    /// Host is closing the channel.
    ClosingConnection,
    /// Host-side error report.
    Error,
    /// Diagnostic echo.
    TestMessage,
}

impl MessageType {
    /// Every message type.
    pub const ALL: [Self; 6] = [
        Self::FullState,
        Self::Defines,
        Self::AllPlaylists,
        Self::ClosingConnection,
        Self::Error,
        Self::TestMessage,
    ];

    /// Name as sent in the `message` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullState => "FullState",
            Self::Defines => "Defines",
            Self::AllPlaylists => "AllPlaylists",
            Self::ClosingConnection => "ClosingConnection",
            Self::Error => "Error",
            Self::TestMessage => "TestMessage",
        }
    }

    /// Reverse lookup from wire name. Case-sensitive.
    #[must_use]
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

#[derive(Deserialize)]
struct RawInbound {
    message: String,
    #[serde(default, rename = "dataObj")]
    data_obj: Value,
}

/// Classified inbound message with an undecoded payload.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    /// Declared type.
    pub kind: MessageType,
    /// `dataObj` contents; `Null` when absent.
    pub payload: Value,
}

impl InboundMessage {
    /// Parse the envelope of an inbound text.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::Malformed` if the text is not a JSON object with a
    ///   string `message` field
    /// - `ProtocolError::UnknownMessageType` if the declared type is not
    ///   recognized
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(ProtocolError::Malformed("message is not a JSON object".to_string()));
        }
        let raw: RawInbound = serde_json::from_value(value)?;
        let Some(kind) = MessageType::from_wire(&raw.message) else {
            return Err(ProtocolError::UnknownMessageType(raw.message));
        };
        Ok(Self { kind, payload: raw.data_obj })
    }

    /// Interpret the payload according to the declared type.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::MissingMode` for a `FullState` without a mode id
    /// - `ProtocolError::InvalidPayload` if the payload has the wrong shape
    pub fn decode(self) -> Result<Inbound> {
        Ok(match self.kind {
            MessageType::FullState => Inbound::FullState(HostSnapshot::from_value(self.payload)?),
            MessageType::AllPlaylists => {
                Inbound::AllPlaylists(PlaylistCatalog::from_value(self.payload)?)
            },
            MessageType::ClosingConnection => Inbound::ClosingConnection,
            MessageType::Defines => Inbound::Defines(self.payload),
            MessageType::Error => Inbound::Error(self.payload),
            MessageType::TestMessage => Inbound::TestMessage(self.payload),
        })
    }
}

/// Decoded inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// Complete Host run-state.
    FullState(HostSnapshot),
    /// Host constants; carried opaquely.
    Defines(Value),
    /// Complete playlist catalog.
    AllPlaylists(PlaylistCatalog),
    /// Host is closing the channel.
    ClosingConnection,
    /// Host-side error report; carried opaquely.
    Error(Value),
    /// Diagnostic echo; carried opaquely.
    TestMessage(Value),
}

impl Inbound {
    /// Parse and decode in one step.
    ///
    /// # Errors
    ///
    /// Any error from [`InboundMessage::parse`] or [`InboundMessage::decode`].
    pub fn from_text(text: &str) -> Result<Self> {
        InboundMessage::parse(text)?.decode()
    }

    /// Declared type of this message.
    #[must_use]
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::FullState(_) => MessageType::FullState,
            Self::Defines(_) => MessageType::Defines,
            Self::AllPlaylists(_) => MessageType::AllPlaylists,
            Self::ClosingConnection => MessageType::ClosingConnection,
            Self::Error(_) => MessageType::Error,
            Self::TestMessage(_) => MessageType::TestMessage,
        }
    }

    /// Encode as the Host would send it.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::Encode` if a payload cannot be represented as JSON
    pub fn to_json(&self) -> Result<String> {
        let encode = |e: serde_json::Error| ProtocolError::Encode(e.to_string());
        let data_obj = match self {
            Self::FullState(snapshot) => serde_json::to_value(snapshot).map_err(encode)?,
            Self::AllPlaylists(catalog) => serde_json::to_value(catalog).map_err(encode)?,
            Self::ClosingConnection => Value::Null,
            Self::Defines(value) | Self::Error(value) | Self::TestMessage(value) => value.clone(),
        };

        let envelope = json!({ "message": self.message_type().as_str(), "dataObj": data_obj });
        serde_json::to_string(&envelope).map_err(encode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_every_type() {
        for kind in MessageType::ALL {
            let text = format!(r#"{{"message":"{}","dataObj":null}}"#, kind.as_str());
            assert_eq!(InboundMessage::parse(&text).map(|m| m.kind), Ok(kind));
        }
    }

    #[test]
    fn missing_data_obj_is_null() {
        let message = InboundMessage::parse(r#"{"message":"ClosingConnection"}"#);
        assert_eq!(message.map(|m| m.payload), Ok(Value::Null));
    }

    #[test]
    fn unknown_type_rejected() {
        assert_eq!(
            InboundMessage::parse(r#"{"message":"Bogus","dataObj":{}}"#),
            Err(ProtocolError::UnknownMessageType("Bogus".to_string()))
        );
    }

    #[test]
    fn non_json_rejected() {
        assert!(matches!(InboundMessage::parse("hello"), Err(ProtocolError::Malformed(_))));
        assert!(matches!(InboundMessage::parse("[1,2]"), Err(ProtocolError::Malformed(_))));
        assert!(matches!(
            InboundMessage::parse(r#"{"message":7}"#),
            Err(ProtocolError::Malformed(_))
        ));
    }

    #[test]
    fn array_shaped_message_rejected() {
        let text = r#"["FullState",{"GCMode":"Stopped"}]"#;
        assert!(matches!(InboundMessage::parse(text), Err(ProtocolError::Malformed(_))));
        assert!(Inbound::from_text(text).is_err());
    }

    #[test]
    fn full_state_without_mode_rejected() {
        let result = Inbound::from_text(r#"{"message":"FullState","dataObj":{"currentScore":3}}"#);
        assert_eq!(result, Err(ProtocolError::MissingMode));
    }

    #[test]
    fn host_encoding_decodes_back() {
        let sent = Inbound::FullState(HostSnapshot::with_mode("Paused"));
        let text = sent.to_json().unwrap_or_default();
        assert_eq!(Inbound::from_text(&text), Ok(sent));
    }
}
