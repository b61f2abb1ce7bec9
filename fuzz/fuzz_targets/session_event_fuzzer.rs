//! Fuzz target for the session state machine
//!
//! # Strategy
//!
//! - Transport events, including arbitrary inbound text and well-formed
//!   snapshots and catalogs
//! - Operator intents, including out-of-range rows and raw action names
//!
//! # Invariants
//!
//! - `handle` NEVER panics
//! - No command is sent unless a channel was open
//! - Selection stays consistent
//! - Pairing implies an empty session

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rcapp_core::{
    FixedClock, Host, Intent, LifecycleState, Mode, Session, SessionAction, SessionEvent,
    TransportEvent, TransportHint,
};
use rcapp_proto::Action;

#[derive(Debug, Arbitrary)]
enum Op {
    SelectHost(u8),
    Connect,
    ConnectFailed,
    Open,
    Snapshot { mode: u8, score: u16 },
    Catalog { playlists: u8, levels: u8 },
    Text(String),
    Error,
    PeerDisconnect,
    Disconnect,
    Retry,
    Browse,
    Select(u8),
    Commit,
    Activate(u8),
    Back,
    Pause,
    Volume(u8),
    Raw { name: String, params: Vec<String> },
}

const MODES: [&str; 8] =
    ["Stopped", "Loading", "LevelStart", "Catching", "Paused", "Calibrating", "SystemMenu", "Bogus"];

fn snapshot_text(mode: u8, score: u16) -> String {
    let mode = MODES[usize::from(mode) % MODES.len()];
    format!(
        r#"{{"message":"FullState","dataObj":{{"GCMode":"{mode}","currentScore":{score},"volume":0.5}}}}"#
    )
}

fn catalog_text(playlists: u8, levels: u8) -> String {
    let playlists: Vec<String> = (0..playlists % 4)
        .map(|p| {
            let levels: Vec<String> = (0..levels % 4)
                .map(|l| format!(r#"{{"id":"l{l}","name":"Level {l}","song":"s{l}"}}"#))
                .collect();
            format!(r#"{{"id":"p{p}","name":"Playlist {p}","levels":[{}]}}"#, levels.join(","))
        })
        .collect();
    format!(r#"{{"message":"AllPlaylists","dataObj":{{"playlists":[{}]}}}}"#, playlists.join(","))
}

fn to_event(op: Op) -> SessionEvent {
    match op {
        Op::SelectHost(id) => SessionEvent::Intent(Intent::SelectHost(Host::new(format!("h{id}")))),
        Op::Connect => SessionEvent::Intent(Intent::Connect),
        Op::ConnectFailed => SessionEvent::ConnectFailed { reason: "refused".into() },
        Op::Open => SessionEvent::Transport(TransportEvent::Open),
        Op::Snapshot { mode, score } => {
            SessionEvent::Transport(TransportEvent::Message(snapshot_text(mode, score)))
        },
        Op::Catalog { playlists, levels } => {
            SessionEvent::Transport(TransportEvent::Message(catalog_text(playlists, levels)))
        },
        Op::Text(text) => SessionEvent::Transport(TransportEvent::Message(text)),
        Op::Error => SessionEvent::Transport(TransportEvent::Error("reset".into())),
        Op::PeerDisconnect => SessionEvent::Transport(TransportEvent::PeerDisconnect),
        Op::Disconnect => SessionEvent::Intent(Intent::Disconnect),
        Op::Retry => SessionEvent::Intent(Intent::Retry),
        Op::Browse => SessionEvent::Intent(Intent::Browse),
        Op::Select(i) => SessionEvent::Intent(Intent::Select(usize::from(i % 8))),
        Op::Commit => SessionEvent::Intent(Intent::Commit),
        Op::Activate(i) => SessionEvent::Intent(Intent::Activate(usize::from(i % 8))),
        Op::Back => SessionEvent::Intent(Intent::Back),
        Op::Pause => SessionEvent::Intent(Intent::Perform(Action::Pause)),
        Op::Volume(v) => SessionEvent::Intent(Intent::Perform(Action::SetVolume(f32::from(v) / 100.0))),
        Op::Raw { name, params } => SessionEvent::Intent(Intent::Raw { name, params }),
    }
}

fuzz_target!(|ops: Vec<Op>| {
    let mut session = Session::new(FixedClock::epoch(), TransportHint::WebSocket);

    for op in ops.into_iter().take(256) {
        let before = session.lifecycle_state();
        let actions = session.handle(to_event(op));

        let had_channel = matches!(
            before,
            LifecycleState::ExpectingHostState | LifecycleState::Active
        );
        if !had_channel {
            assert!(!actions.iter().any(|a| matches!(a, SessionAction::Send(_))));
        }

        assert!(session.state().selection().is_consistent());

        if session.lifecycle_state() == LifecycleState::Pairing {
            assert_eq!(session.mode(), Mode::Pairing);
            assert!(session.state().snapshot().is_none());
            assert!(session.state().catalog().playlists.is_empty());
        }
    }
});
