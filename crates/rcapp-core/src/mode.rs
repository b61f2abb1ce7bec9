//! Mode registry.
//!
//! Every run-state the client can display, with a stable id and a label.
//! Host-authoritative ids match what the Host reports in `GCMode`; local modes
//! exist only on the client.

use std::fmt;

use rcapp_proto::ProtocolError;

/// Where a mode comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeOrigin {
    /// Client-side navigation state with no Host equivalent.
    Local,
    /// Reported by the Host.
    HostAuthoritative,
}

/// Static description of a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModeDescriptor {
    /// Stable id; unique across the registry.
    pub id: &'static str,
    /// Label shown to the operator.
    pub display_name: &'static str,
    /// Who owns this mode.
    pub origin: ModeOrigin,
}

/// Recognized run-states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Choosing a Host to pair with.
    Pairing,
    /// Browsing playlists.
    ChoosePlaylist,
    /// Browsing the levels of one playlist.
    ChooseLevel,
    /// Client could not make sense of where it is.
    Unhandled,
    /// Host is idle.
    Stopped,
    /// Host is running a level.
    Catching,
    /// Host is counting in to a level.
    LevelStart,
    /// Host is calibrating.
    Calibrating,
    /// Host is loading a level.
    Loading,
    /// Host run is paused.
    Paused,
    /// Host is showing its system menu.
    SystemMenu,
}

impl Mode {
    /// Every mode in the registry.
    pub const ALL: [Self; 11] = [
        Self::Pairing,
        Self::ChoosePlaylist,
        Self::ChooseLevel,
        Self::Unhandled,
        Self::Stopped,
        Self::Catching,
        Self::LevelStart,
        Self::Calibrating,
        Self::Loading,
        Self::Paused,
        Self::SystemMenu,
    ];

    /// Mode the Host reports when it is idle.
    pub const HOST_IDLE: Self = Self::Stopped;

    /// Registry entry for this mode.
    #[must_use]
    pub const fn descriptor(self) -> ModeDescriptor {
        let (id, display_name, origin) = match self {
            Self::Pairing => ("Pairing", "Pairing", ModeOrigin::Local),
            Self::ChoosePlaylist => ("ChoosePlaylist", "Choose Playlist", ModeOrigin::Local),
            Self::ChooseLevel => ("ChooseLevel", "Choose Level", ModeOrigin::Local),
            Self::Unhandled => ("Unhandled", "Unhandled", ModeOrigin::Local),
            Self::Stopped => ("Stopped", "Stopped", ModeOrigin::HostAuthoritative),
            Self::Catching => ("Catching", "Catching", ModeOrigin::HostAuthoritative),
            Self::LevelStart => ("LevelStart", "Level Start", ModeOrigin::HostAuthoritative),
            Self::Calibrating => ("Calibrating", "Calibrating", ModeOrigin::HostAuthoritative),
            Self::Loading => ("Loading", "Loading", ModeOrigin::HostAuthoritative),
            Self::Paused => ("Paused", "Paused", ModeOrigin::HostAuthoritative),
            Self::SystemMenu => ("SystemMenu", "System Menu", ModeOrigin::HostAuthoritative),
        };
        ModeDescriptor { id, display_name, origin }
    }

    /// Stable id.
    #[must_use]
    pub const fn id(self) -> &'static str {
        self.descriptor().id
    }

    /// Operator-facing label.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        self.descriptor().display_name
    }

    /// Who owns this mode.
    #[must_use]
    pub const fn origin(self) -> ModeOrigin {
        self.descriptor().origin
    }

    /// Whether this is one of the two content-browsing modes.
    #[must_use]
    pub const fn is_browsing(self) -> bool {
        matches!(self, Self::ChoosePlaylist | Self::ChooseLevel)
    }

    /// Look up any mode by id. Case-sensitive.
    #[must_use]
    pub fn lookup_by_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.id() == id)
    }

    /// Resolve a mode id reported by the Host.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::UnknownMode` if the id is not in the registry
    /// - `ProtocolError::LocalModeReported` if the id names a local-only mode
    pub fn from_host(id: &str) -> Result<Self, ProtocolError> {
        match Self::lookup_by_id(id) {
            Some(mode) if mode.origin() == ModeOrigin::HostAuthoritative => Ok(mode),
            Some(_) => Err(ProtocolError::LocalModeReported(id.to_string())),
            None => Err(ProtocolError::UnknownMode(id.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
