//! Host run-state snapshot.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{ProtocolError, Result};

/// Field carrying the Host's mode identifier.
pub const MODE_FIELD: &str = "GCMode";

/// Full state payload reported by the Host.
///
/// Replaced wholesale on every `FullState` message. Everything except the
/// mode id is optional because Hosts omit fields that do not apply to their
/// current mode. Fields this client does not model are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostSnapshot {
    /// Host-reported mode id.
    #[serde(rename = "GCMode")]
    pub mode: String,
    /// Whether the Host is casting its view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_casting: Option<bool>,
    /// Output volume, `0.0..=1.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f32>,
    /// Whether the score is shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_visible: Option<bool>,
    /// Current score.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_score: Option<f64>,
    /// Whether the in-game UI is shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_visible: Option<bool>,
    /// Active calibration mode name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calibration_mode: Option<String>,
    /// Level currently loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_level_id: Option<String>,
    /// Song of the level currently loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_song_id: Option<String>,
    /// Seconds elapsed in the current level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_time: Option<f64>,
    /// Length of the current level in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Fields not modeled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HostSnapshot {
    /// Snapshot reporting only a mode.
    pub fn with_mode(mode: impl Into<String>) -> Self {
        Self { mode: mode.into(), ..Self::default() }
    }

    /// Decode a `FullState` payload.
    ///
    /// The mode id is checked before anything else so that a payload without
    /// one is reported as such rather than as a generic shape error.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::MissingMode` if `GCMode` is absent, null, or not a
    ///   string
    /// - `ProtocolError::InvalidPayload` if any other field has the wrong type
    pub fn from_value(payload: Value) -> Result<Self> {
        match payload.get(MODE_FIELD) {
            Some(Value::String(_)) => {},
            _ => return Err(ProtocolError::MissingMode),
        }

        serde_json::from_value(payload).map_err(|e| ProtocolError::InvalidPayload {
            message_type: "FullState",
            reason: e.to_string(),
        })
    }
}
