//! Action vocabulary.
//!
//! The Host accepts a fixed set of named commands. [`ActionName`] is that set;
//! [`Action`] is the typed form used by the engine; [`ActionRequest`] is the
//! validated, stringified form that gets wrapped in a
//! [`crate::CommandEnvelope`].
//!
//! # Invariants
//!
//! An [`ActionRequest`] can only be constructed through [`ActionRequest::parse`]
//! or [`Action::into_request`], both of which check the name, arity, and
//! parameter types. Every request in circulation is therefore host-compatible.

use std::fmt;

use crate::errors::ActionError;

/// Shape of an action's parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Params {
    /// No parameters.
    None,
    /// One boolean.
    Flag,
    /// One float in `0.0..=1.0`.
    Volume,
    /// One non-empty string.
    Text,
    /// Playlist id followed by level id.
    PlaylistLevel,
}

/// Command names the Host accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionName {
    /// Start a casual run.
    StartCasual,
    /// Start a competitive run.
    StartCompetitive,
    /// Pause the current run.
    Pause,
    /// Resume a paused run.
    Resume,
    /// Restart the current level.
    Restart,
    /// Quit or cancel the current run.
    Quit,
    /// Force the Host back to its idle mode.
    ForceCancel,
    /// Select the calibration mode.
    SetCalibrationMode,
    /// Toggle casting.
    SetCasting,
    /// Set output volume (normalized).
    SetVolume,
    /// Show or hide the score.
    SetScoreVisible,
    /// Show or hide the in-game UI.
    SetUiVisible,
    /// Request the playlist catalog.
    GetPlaylists,
    /// Load a level from a playlist.
    LoadLevel,
}

impl ActionName {
    /// Every action, in wire order.
    pub const ALL: [Self; 14] = [
        Self::StartCasual,
        Self::StartCompetitive,
        Self::Pause,
        Self::Resume,
        Self::Restart,
        Self::Quit,
        Self::ForceCancel,
        Self::SetCalibrationMode,
        Self::SetCasting,
        Self::SetVolume,
        Self::SetScoreVisible,
        Self::SetUiVisible,
        Self::GetPlaylists,
        Self::LoadLevel,
    ];

    /// Name as sent in the envelope's `subcommand` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StartCasual => "StartCasual",
            Self::StartCompetitive => "StartCompetitive",
            Self::Pause => "Pause",
            Self::Resume => "Resume",
            Self::Restart => "Restart",
            Self::Quit => "Quit",
            Self::ForceCancel => "ForceCancel",
            Self::SetCalibrationMode => "SetCalibrationMode",
            Self::SetCasting => "SetCasting",
            Self::SetVolume => "SetVolume",
            Self::SetScoreVisible => "SetScoreVisible",
            Self::SetUiVisible => "SetUiVisible",
            Self::GetPlaylists => "GetPlaylists",
            Self::LoadLevel => "LoadLevel",
        }
    }

    /// Reverse lookup from wire name. Case-sensitive.
    #[must_use]
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.as_str() == name)
    }

    /// Number of parameters this action takes.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self.params() {
            Params::None => 0,
            Params::Flag | Params::Volume | Params::Text => 1,
            Params::PlaylistLevel => 2,
        }
    }

    const fn params(self) -> Params {
        match self {
            Self::StartCasual
            | Self::StartCompetitive
            | Self::Pause
            | Self::Resume
            | Self::Restart
            | Self::Quit
            | Self::ForceCancel
            | Self::GetPlaylists => Params::None,
            Self::SetCasting | Self::SetScoreVisible | Self::SetUiVisible => Params::Flag,
            Self::SetVolume => Params::Volume,
            Self::SetCalibrationMode => Params::Text,
            Self::LoadLevel => Params::PlaylistLevel,
        }
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `name` is part of the action vocabulary.
#[must_use]
pub fn validate(name: &str) -> bool {
    ActionName::from_wire(name).is_some()
}

/// Typed action with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Start a casual run.
    StartCasual,
    /// Start a competitive run.
    StartCompetitive,
    /// Pause the current run.
    Pause,
    /// Resume a paused run.
    Resume,
    /// Restart the current level.
    Restart,
    /// Quit or cancel the current run.
    Quit,
    /// Force the Host back to its idle mode.
    ForceCancel,
    /// Select the calibration mode by name.
    SetCalibrationMode(String),
    /// Toggle casting.
    SetCasting(bool),
    /// Set output volume, `0.0..=1.0` inclusive.
    SetVolume(f32),
    /// Show or hide the score.
    SetScoreVisible(bool),
    /// Show or hide the in-game UI.
    SetUiVisible(bool),
    /// Request the playlist catalog.
    GetPlaylists,
    /// Load a level from a playlist.
    LoadLevel {
        /// Playlist containing the level
        playlist_id: String,
        /// Level to load
        level_id: String,
    },
}

impl Action {
    /// Vocabulary entry for this action.
    #[must_use]
    pub const fn name(&self) -> ActionName {
        match self {
            Self::StartCasual => ActionName::StartCasual,
            Self::StartCompetitive => ActionName::StartCompetitive,
            Self::Pause => ActionName::Pause,
            Self::Resume => ActionName::Resume,
            Self::Restart => ActionName::Restart,
            Self::Quit => ActionName::Quit,
            Self::ForceCancel => ActionName::ForceCancel,
            Self::SetCalibrationMode(_) => ActionName::SetCalibrationMode,
            Self::SetCasting(_) => ActionName::SetCasting,
            Self::SetVolume(_) => ActionName::SetVolume,
            Self::SetScoreVisible(_) => ActionName::SetScoreVisible,
            Self::SetUiVisible(_) => ActionName::SetUiVisible,
            Self::GetPlaylists => ActionName::GetPlaylists,
            Self::LoadLevel { .. } => ActionName::LoadLevel,
        }
    }

    /// Stringify parameters and validate the result.
    ///
    /// # Errors
    ///
    /// - `ActionError::InvalidParameter` for a volume outside `0.0..=1.0` or
    ///   an empty string parameter
    pub fn into_request(self) -> Result<ActionRequest, ActionError> {
        let name = self.name();
        let params = match self {
            Self::StartCasual
            | Self::StartCompetitive
            | Self::Pause
            | Self::Resume
            | Self::Restart
            | Self::Quit
            | Self::ForceCancel
            | Self::GetPlaylists => Vec::new(),
            Self::SetCalibrationMode(mode) => vec![mode],
            Self::SetCasting(flag) | Self::SetScoreVisible(flag) | Self::SetUiVisible(flag) => {
                vec![flag.to_string()]
            },
            Self::SetVolume(volume) => vec![volume.to_string()],
            Self::LoadLevel { playlist_id, level_id } => vec![playlist_id, level_id],
        };

        ActionRequest::build(name, params)
    }
}

/// Validated action name plus stringified parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    name: ActionName,
    params: Vec<String>,
}

impl ActionRequest {
    /// Validate a request given by wire name.
    ///
    /// # Errors
    ///
    /// - `ActionError::UnknownAction` if `name` is not in the vocabulary
    /// - `ActionError::WrongArity` if the parameter count is wrong
    /// - `ActionError::InvalidParameter` if a parameter fails its type check
    pub fn parse(name: &str, params: Vec<String>) -> Result<Self, ActionError> {
        let Some(action) = ActionName::from_wire(name) else {
            return Err(ActionError::UnknownAction(name.to_string()));
        };
        Self::build(action, params)
    }

    fn build(name: ActionName, params: Vec<String>) -> Result<Self, ActionError> {
        if params.len() != name.arity() {
            return Err(ActionError::WrongArity {
                action: name,
                expected: name.arity(),
                actual: params.len(),
            });
        }

        let invalid = |reason: String| ActionError::InvalidParameter { action: name, reason };

        match name.params() {
            Params::None => {},
            Params::Flag => {
                if params[0].parse::<bool>().is_err() {
                    return Err(invalid(format!("expected true or false, got {:?}", params[0])));
                }
            },
            Params::Volume => {
                let volume = params[0]
                    .parse::<f32>()
                    .map_err(|_| invalid(format!("expected a number, got {:?}", params[0])))?;
                if !(0.0..=1.0).contains(&volume) {
                    return Err(invalid(format!("volume {volume} outside 0..=1")));
                }
            },
            Params::Text | Params::PlaylistLevel => {
                if params.iter().any(|p| p.trim().is_empty()) {
                    return Err(invalid("empty parameter".to_string()));
                }
            },
        }

        Ok(Self { name, params })
    }

    /// Vocabulary entry.
    #[must_use]
    pub fn name(&self) -> ActionName {
        self.name
    }

    /// Stringified parameters, in order.
    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.params
    }
}
