//! Client configuration.
//!
//! Defaults, then an optional TOML file, then command-line flags.
//!
//! ```toml
//! use_web_socket = true
//! startup_mode = "public"
//! host_id = "quest-7"
//! simulate = false
//! ```

use std::{fs, path::Path};

use rcapp_core::TransportHint;
use serde::Deserialize;

use crate::CliError;

/// How the client announces itself at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StartupMode {
    /// Discoverable pairing.
    #[default]
    Public,
    /// Private pairing. Not supported; treated as public.
    Private,
}

/// Effective client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Signal over WebSocket rather than HTTP.
    pub use_web_socket: bool,
    /// Startup pairing mode.
    pub startup_mode: StartupMode,
    /// Host to pair with at startup.
    pub host_id: Option<String>,
    /// Talk to an in-process simulated Host.
    pub simulate: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            use_web_socket: true,
            startup_mode: StartupMode::Public,
            host_id: None,
            simulate: false,
        }
    }
}

impl ClientConfig {
    /// Parse TOML text. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// - `CliError::Config` for malformed TOML or unknown keys
    pub fn from_toml(text: &str) -> Result<Self, CliError> {
        toml::from_str(text).map_err(|e| CliError::Config(e.to_string()))
    }

    /// Load from `path`.
    ///
    /// # Errors
    ///
    /// - `CliError::Io` if the file cannot be read
    /// - `CliError::Config` if it does not parse
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Transport hint for connects.
    pub fn transport_hint(&self) -> TransportHint {
        TransportHint::from_use_web_socket(self.use_web_socket)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(ClientConfig::from_toml("").ok(), Some(ClientConfig::default()));
    }

    #[test]
    fn reads_all_keys() {
        let config = ClientConfig::from_toml(
            "use_web_socket = false\nstartup_mode = \"private\"\nhost_id = \"quest-7\"\nsimulate = true\n",
        );
        assert_eq!(
            config.ok(),
            Some(ClientConfig {
                use_web_socket: false,
                startup_mode: StartupMode::Private,
                host_id: Some("quest-7".into()),
                simulate: true,
            })
        );
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(matches!(ClientConfig::from_toml("volume = 3"), Err(CliError::Config(_))));
    }

    #[test]
    fn hint_follows_flag() {
        let http = ClientConfig { use_web_socket: false, ..ClientConfig::default() };
        assert_eq!(http.transport_hint(), TransportHint::Http);
        assert_eq!(ClientConfig::default().transport_hint(), TransportHint::WebSocket);
    }

    #[test]
    fn loads_from_file() {
        let Ok(mut file) = tempfile::NamedTempFile::new() else {
            return;
        };
        let _ = writeln!(file, "host_id = \"headset\"");

        let config = ClientConfig::load(file.path());
        assert_eq!(config.ok().and_then(|c| c.host_id), Some("headset".into()));
        assert!(matches!(
            ClientConfig::load(Path::new("/nonexistent/rcapp.toml")),
            Err(CliError::Io(_))
        ));
    }
}
