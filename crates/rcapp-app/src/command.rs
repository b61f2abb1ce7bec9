//! Operator command line parsing.
//!
//! Slash commands drive navigation and the session lifecycle; bare words are
//! shorthand for Host actions.
//!
//! ```text
//! /host <id> [label]   choose the Host to pair with
//! /connect             connect to the chosen Host
//! /disconnect          tear down the session
//! /retry               reconnect to the same Host
//! /browse              open the playlist browser
//! /select <n>          select row n (1-based)
//! /open <n>            select row n and open it
//! /use                 open or load the selection
//! /back                leave the current listing
//! /action <Name> [..]  send any action by wire name
//! /volume <0-1>        set the Host volume
//! /help                list commands
//! /quit                exit
//! ```

use rcapp_core::{Host, Intent};
use rcapp_proto::Action;
use thiserror::Error;

/// Parsed operator input.
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorCommand {
    /// Feed the session engine.
    Intent(Intent),
    /// Show command help.
    Help,
    /// Exit the client.
    Quit,
}

/// Input that could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Command exists but arguments are wrong.
    #[error("usage: {0}")]
    Usage(&'static str),

    /// Slash command not recognized.
    #[error("unknown command: /{0} (try /help)")]
    UnknownCommand(String),

    /// Bare word is not a known action shorthand.
    #[error("unknown action shorthand: {0:?} (try /help)")]
    UnknownShorthand(String),
}

/// Help text for `/help`.
pub const HELP: &str = "commands: /host <id> [label], /connect, /disconnect, /retry, /browse, \
                        /select <n>, /open <n>, /use, /back, /action <Name> [params], \
                        /volume <0-1>, /quit; shorthands: casual, competitive, pause, resume, \
                        restart, cancel, force-cancel, playlists";

/// Parse one line of operator input. Blank lines yield `None`.
///
/// # Errors
///
/// - `CommandError::Usage` for a known command with bad arguments
/// - `CommandError::UnknownCommand` / `CommandError::UnknownShorthand` for
///   anything else
pub fn parse_command(line: &str) -> Result<Option<OperatorCommand>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let command = match line.strip_prefix('/') {
        Some(cmd) => parse_slash(cmd)?,
        None => OperatorCommand::Intent(Intent::Perform(parse_shorthand(line)?)),
    };
    Ok(Some(command))
}

fn parse_slash(cmd: &str) -> Result<OperatorCommand, CommandError> {
    let parts: Vec<&str> = cmd.split_whitespace().collect();
    let command = parts.first().copied().unwrap_or("");
    let args = parts.get(1..).unwrap_or_default();

    let intent = match command {
        "host" => {
            let Some(id) = args.first() else {
                return Err(CommandError::Usage("/host <id> [label]"));
            };
            let label = (args.len() > 1).then(|| args[1..].join(" "));
            Intent::SelectHost(Host { id: (*id).to_string(), label })
        },
        "connect" => Intent::Connect,
        "disconnect" => Intent::Disconnect,
        "retry" => Intent::Retry,
        "browse" => Intent::Browse,
        "select" => Intent::Select(row(args, "/select <n>")?),
        "open" => Intent::Activate(row(args, "/open <n>")?),
        "use" => Intent::Commit,
        "back" | "cancel" => Intent::Back,
        "action" => {
            let Some(name) = args.first() else {
                return Err(CommandError::Usage("/action <Name> [params...]"));
            };
            Intent::Raw {
                name: (*name).to_string(),
                params: args[1..].iter().map(|p| (*p).to_string()).collect(),
            }
        },
        "volume" => {
            let [level] = args else {
                return Err(CommandError::Usage("/volume <0-1>"));
            };
            Intent::Raw { name: "SetVolume".to_string(), params: vec![(*level).to_string()] }
        },
        "help" | "h" => return Ok(OperatorCommand::Help),
        "quit" | "q" => return Ok(OperatorCommand::Quit),
        other => return Err(CommandError::UnknownCommand(other.to_string())),
    };

    Ok(OperatorCommand::Intent(intent))
}

/// 1-based row number to 0-based index.
fn row(args: &[&str], usage: &'static str) -> Result<usize, CommandError> {
    match args {
        [n] => n
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .ok_or(CommandError::Usage(usage)),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn parse_shorthand(word: &str) -> Result<Action, CommandError> {
    let action = match word.to_ascii_lowercase().as_str() {
        "casual" | "start" => Action::StartCasual,
        "competitive" => Action::StartCompetitive,
        "pause" => Action::Pause,
        "resume" => Action::Resume,
        "restart" => Action::Restart,
        "cancel" | "stop" => Action::Quit,
        "force-cancel" => Action::ForceCancel,
        "playlists" => Action::GetPlaylists,
        _ => return Err(CommandError::UnknownShorthand(word.to_string())),
    };
    Ok(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent(line: &str) -> Option<Intent> {
        match parse_command(line) {
            Ok(Some(OperatorCommand::Intent(intent))) => Some(intent),
            _ => None,
        }
    }

    #[test]
    fn blank_lines_ignored() {
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn host_with_label() {
        assert_eq!(
            intent("/host quest-7 Studio Headset"),
            Some(Intent::SelectHost(Host {
                id: "quest-7".into(),
                label: Some("Studio Headset".into())
            }))
        );
        assert_eq!(parse_command("/host"), Err(CommandError::Usage("/host <id> [label]")));
    }

    #[test]
    fn rows_are_one_based() {
        assert_eq!(intent("/select 1"), Some(Intent::Select(0)));
        assert_eq!(intent("/open 3"), Some(Intent::Activate(2)));
        assert!(parse_command("/select 0").is_err());
        assert!(parse_command("/select x").is_err());
        assert!(parse_command("/select").is_err());
    }

    #[test]
    fn raw_actions_keep_params() {
        assert_eq!(
            intent("/action LoadLevel p1 l2"),
            Some(Intent::Raw { name: "LoadLevel".into(), params: vec!["p1".into(), "l2".into()] })
        );
        assert_eq!(
            intent("/volume 0.4"),
            Some(Intent::Raw { name: "SetVolume".into(), params: vec!["0.4".into()] })
        );
    }

    #[test]
    fn shorthands_map_to_actions() {
        assert_eq!(intent("pause"), Some(Intent::Perform(Action::Pause)));
        assert_eq!(intent("Resume"), Some(Intent::Perform(Action::Resume)));
        assert_eq!(intent("force-cancel"), Some(Intent::Perform(Action::ForceCancel)));
        assert!(matches!(parse_command("dance"), Err(CommandError::UnknownShorthand(_))));
    }

    #[test]
    fn quit_and_help() {
        assert_eq!(parse_command("/quit"), Ok(Some(OperatorCommand::Quit)));
        assert_eq!(parse_command("/q"), Ok(Some(OperatorCommand::Quit)));
        assert_eq!(parse_command("/help"), Ok(Some(OperatorCommand::Help)));
        assert!(matches!(parse_command("/dance"), Err(CommandError::UnknownCommand(_))));
    }
}
