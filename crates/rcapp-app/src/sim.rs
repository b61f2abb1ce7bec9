//! In-process simulated Host.
//!
//! [`SimHost`] is a pure model of the Host's run-state: it consumes command
//! envelopes and produces the messages a real Host would send back.
//! [`spawn_host`] runs one as a tokio task with mpsc channels for transport,
//! so the client can be exercised without a network.

use std::{collections::BTreeMap, time::Duration};

use rcapp_proto::{CommandEnvelope, HostSnapshot, Inbound, Level, Playlist, PlaylistCatalog};
use serde_json::Value;
use tokio::{
    sync::{mpsc, oneshot},
    time::{self, MissedTickBehavior},
};

/// Interval at which a spawned Host advances a running level.
pub const TICK: Duration = Duration::from_secs(1);

/// Run-state model of a Host.
#[derive(Debug, Clone)]
pub struct SimHost {
    snapshot: HostSnapshot,
    catalog: PlaylistCatalog,
}

impl Default for SimHost {
    fn default() -> Self {
        Self::new(demo_catalog())
    }
}

impl SimHost {
    /// Idle Host serving `catalog`.
    pub fn new(catalog: PlaylistCatalog) -> Self {
        let snapshot = HostSnapshot {
            is_casting: Some(false),
            volume: Some(0.8),
            score_visible: Some(true),
            current_score: Some(0.0),
            ui_visible: Some(true),
            calibration_mode: Some("Auto".into()),
            ..HostSnapshot::with_mode("Stopped")
        };
        Self { snapshot, catalog }
    }

    /// Current run-state.
    pub fn snapshot(&self) -> &HostSnapshot {
        &self.snapshot
    }

    /// Message sent when a client connects.
    pub fn greeting(&self) -> Vec<Inbound> {
        vec![Inbound::FullState(self.snapshot.clone())]
    }

    /// React to one command envelope.
    pub fn handle(&mut self, envelope: &CommandEnvelope) -> Vec<Inbound> {
        if envelope.command != CommandEnvelope::COMMAND {
            return vec![host_error(format!("unsupported command {:?}", envelope.command))];
        }

        let params = envelope.parameters.as_slice();
        match (envelope.subcommand.as_str(), params) {
            ("StartCasual" | "StartCompetitive", []) => {
                if self.snapshot.current_level_id.is_none() {
                    return vec![host_error("no level loaded".to_string())];
                }
                self.snapshot.current_score = Some(0.0);
                self.snapshot.elapsed_time = Some(0.0);
                self.transition("Catching")
            },
            ("Pause", []) => match self.snapshot.mode.as_str() {
                "Catching" | "LevelStart" => self.transition("Paused"),
                _ => Vec::new(),
            },
            ("Resume", []) => match self.snapshot.mode.as_str() {
                "Paused" => self.transition("Catching"),
                _ => Vec::new(),
            },
            ("Restart", []) => {
                if self.snapshot.current_level_id.is_none() {
                    return Vec::new();
                }
                self.snapshot.current_score = Some(0.0);
                self.snapshot.elapsed_time = Some(0.0);
                self.transition("LevelStart")
            },
            ("Quit", []) => self.transition("Stopped"),
            ("ForceCancel", []) => {
                self.snapshot.current_level_id = None;
                self.snapshot.current_song_id = None;
                self.snapshot.elapsed_time = None;
                self.snapshot.duration = None;
                self.transition("Stopped")
            },
            ("SetCalibrationMode", [mode]) => {
                self.snapshot.calibration_mode = Some(mode.clone());
                self.transition("Calibrating")
            },
            ("SetCasting", [flag]) => self.set_flag(flag, |s, v| s.is_casting = Some(v)),
            ("SetScoreVisible", [flag]) => self.set_flag(flag, |s, v| s.score_visible = Some(v)),
            ("SetUiVisible", [flag]) => self.set_flag(flag, |s, v| s.ui_visible = Some(v)),
            ("SetVolume", [level]) => match level.parse::<f32>() {
                Ok(v) if (0.0..=1.0).contains(&v) => {
                    self.snapshot.volume = Some(v);
                    vec![self.full_state()]
                },
                _ => vec![host_error(format!("bad volume {level:?}"))],
            },
            ("GetPlaylists", []) => vec![Inbound::AllPlaylists(self.catalog.clone())],
            ("LoadLevel", [playlist_id, level_id]) => self.load_level(playlist_id, level_id),
            (name, _) => {
                vec![host_error(format!("cannot handle {name} with {} parameters", params.len()))]
            },
        }
    }

    /// Advance a running level by `seconds`, scoring along the way.
    pub fn tick(&mut self, seconds: f64) -> Vec<Inbound> {
        if self.snapshot.mode != "Catching" {
            return Vec::new();
        }
        let duration = self.snapshot.duration.unwrap_or(0.0);
        let elapsed = (self.snapshot.elapsed_time.unwrap_or(0.0) + seconds).min(duration);
        self.snapshot.elapsed_time = Some(elapsed);
        self.snapshot.current_score = Some(self.snapshot.current_score.unwrap_or(0.0) + seconds * 10.0);

        if elapsed >= duration {
            return self.transition("Stopped");
        }
        vec![self.full_state()]
    }

    fn load_level(&mut self, playlist_id: &str, level_id: &str) -> Vec<Inbound> {
        let Some(level) = self.catalog.playlist(playlist_id).and_then(|p| p.level(level_id)) else {
            return vec![host_error(format!("no level {level_id:?} in playlist {playlist_id:?}"))];
        };

        self.snapshot.current_level_id = Some(level.id.clone());
        self.snapshot.current_song_id = Some(level.song_ref.clone());
        self.snapshot.elapsed_time = Some(0.0);
        self.snapshot.duration = Some(180.0);
        self.snapshot.current_score = Some(0.0);

        let mut messages = self.transition("Loading");
        messages.extend(self.transition("LevelStart"));
        messages
    }

    fn set_flag(&mut self, flag: &str, apply: impl FnOnce(&mut HostSnapshot, bool)) -> Vec<Inbound> {
        match flag.parse::<bool>() {
            Ok(value) => {
                apply(&mut self.snapshot, value);
                vec![self.full_state()]
            },
            Err(_) => vec![host_error(format!("bad flag {flag:?}"))],
        }
    }

    fn transition(&mut self, mode: &str) -> Vec<Inbound> {
        self.snapshot.mode = mode.to_string();
        vec![self.full_state()]
    }

    fn full_state(&self) -> Inbound {
        Inbound::FullState(self.snapshot.clone())
    }
}

fn host_error(message: String) -> Inbound {
    Inbound::Error(Value::String(message))
}

/// Small catalog with two playlists.
pub fn demo_catalog() -> PlaylistCatalog {
    let level = |id: &str, name: &str, difficulty: &str, song: &str| Level {
        id: id.to_string(),
        name: name.to_string(),
        difficulty: Some(difficulty.to_string()),
        song_ref: song.to_string(),
        creator: "rcapp".to_string(),
        date_modified: "2024-05-01".to_string(),
        notes: None,
    };

    PlaylistCatalog {
        playlists: vec![
            Playlist {
                id: "warmup".into(),
                name: "Warm Up".into(),
                creator: "rcapp".into(),
                date_modified: "2024-05-01".into(),
                notes: "Short levels to get moving".into(),
                levels: vec![
                    level("w1", "First Steps", "Easy", "song-a"),
                    level("w2", "Side to Side", "Easy", "song-b"),
                ],
            },
            Playlist {
                id: "challenge".into(),
                name: "Challenge".into(),
                creator: "rcapp".into(),
                date_modified: "2024-05-02".into(),
                notes: String::new(),
                levels: vec![level("c1", "Overdrive", "Expert", "song-c")],
            },
        ],
        song_names: BTreeMap::from([
            ("song-a".to_string(), "Morning Light".to_string()),
            ("song-b".to_string(), "Pendulum".to_string()),
            ("song-c".to_string(), "Redline".to_string()),
        ]),
    }
}

/// Handle to a running in-process Host.
#[derive(Debug)]
pub struct HostHandle {
    /// Send command text to the Host.
    pub to_host: mpsc::Sender<String>,
    /// Receive message text from the Host.
    pub from_host: mpsc::Receiver<String>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl HostHandle {
    /// Ask the Host to say goodbye and stop. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for HostHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Spawn an in-process Host.
///
/// The Host greets the client with its state, answers commands, reports
/// progress every [`TICK`] while a level runs, and sends `ClosingConnection`
/// when shut down.
pub fn spawn_host(mut host: SimHost) -> HostHandle {
    let (client_tx, mut host_rx) = mpsc::channel::<String>(32);
    let (host_tx, client_rx) = mpsc::channel::<String>(32);
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

    tokio::spawn(async move {
        if !deliver(&host_tx, host.greeting()).await {
            return;
        }

        let mut clock = time::interval(TICK);
        clock.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    let _ = deliver(&host_tx, vec![Inbound::ClosingConnection]).await;
                    break;
                }
                Some(text) = host_rx.recv() => {
                    let replies = match serde_json::from_str::<CommandEnvelope>(&text) {
                        Ok(envelope) => {
                            tracing::debug!(action = %envelope.subcommand, "simulated host received");
                            host.handle(&envelope)
                        },
                        Err(e) => vec![host_error(format!("unreadable command: {e}"))],
                    };
                    if !deliver(&host_tx, replies).await {
                        break;
                    }
                }
                _ = clock.tick() => {
                    if !deliver(&host_tx, host.tick(TICK.as_secs_f64())).await {
                        break;
                    }
                }
            }
        }
    });

    HostHandle { to_host: client_tx, from_host: client_rx, shutdown: Some(shutdown_tx) }
}

/// Send messages to the client. Returns `false` once the client is gone.
async fn deliver(tx: &mpsc::Sender<String>, messages: Vec<Inbound>) -> bool {
    for message in messages {
        match message.to_json() {
            Ok(text) => {
                if tx.send(text).await.is_err() {
                    return false;
                }
            },
            Err(e) => tracing::warn!("simulated host failed to encode: {e}"),
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(name: &str, params: &[&str]) -> CommandEnvelope {
        CommandEnvelope {
            command: CommandEnvelope::COMMAND.to_string(),
            subcommand: name.to_string(),
            parameters: params.iter().map(|p| (*p).to_string()).collect(),
            timestamp: "1970-01-01T00:00:00.000Z".to_string(),
        }
    }

    fn modes(messages: &[Inbound]) -> Vec<String> {
        messages
            .iter()
            .filter_map(|m| match m {
                Inbound::FullState(s) => Some(s.mode.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn load_then_play() {
        let mut host = SimHost::default();
        assert_eq!(modes(&host.handle(&envelope("LoadLevel", &["warmup", "w2"]))), vec![
            "Loading",
            "LevelStart"
        ]);
        assert_eq!(host.snapshot().current_song_id.as_deref(), Some("song-b"));

        assert_eq!(modes(&host.handle(&envelope("StartCasual", &[]))), vec!["Catching"]);
        assert_eq!(modes(&host.handle(&envelope("Pause", &[]))), vec!["Paused"]);
        assert_eq!(modes(&host.handle(&envelope("Resume", &[]))), vec!["Catching"]);
        assert_eq!(modes(&host.handle(&envelope("ForceCancel", &[]))), vec!["Stopped"]);
        assert_eq!(host.snapshot().current_level_id, None);
    }

    #[test]
    fn start_without_level_is_error() {
        let mut host = SimHost::default();
        let replies = host.handle(&envelope("StartCompetitive", &[]));
        assert!(matches!(replies.as_slice(), [Inbound::Error(_)]));
        assert_eq!(host.snapshot().mode, "Stopped");
    }

    #[test]
    fn setters_update_snapshot() {
        let mut host = SimHost::default();
        let _ = host.handle(&envelope("SetVolume", &["0.25"]));
        let _ = host.handle(&envelope("SetCasting", &["true"]));
        let _ = host.handle(&envelope("SetUiVisible", &["false"]));
        assert_eq!(host.snapshot().volume, Some(0.25));
        assert_eq!(host.snapshot().is_casting, Some(true));
        assert_eq!(host.snapshot().ui_visible, Some(false));

        assert!(matches!(host.handle(&envelope("SetVolume", &["2"])).as_slice(), [Inbound::Error(_)]));
    }

    #[test]
    fn playlists_and_unknown_actions() {
        let mut host = SimHost::default();
        assert!(matches!(
            host.handle(&envelope("GetPlaylists", &[])).as_slice(),
            [Inbound::AllPlaylists(catalog)] if catalog.playlists.len() == 2
        ));
        assert!(matches!(host.handle(&envelope("Dance", &[])).as_slice(), [Inbound::Error(_)]));
    }

    #[test]
    fn tick_runs_level_to_end() {
        let mut host = SimHost::default();
        let _ = host.handle(&envelope("LoadLevel", &["challenge", "c1"]));
        let _ = host.handle(&envelope("StartCasual", &[]));

        assert_eq!(modes(&host.tick(60.0)), vec!["Catching"]);
        assert_eq!(modes(&host.tick(200.0)), vec!["Stopped"]);
        assert_eq!(host.snapshot().elapsed_time, Some(180.0));
    }

    #[tokio::test]
    async fn spawned_host_greets_and_closes() {
        let mut handle = spawn_host(SimHost::default());

        let greeting = handle.from_host.recv().await.unwrap_or_default();
        assert!(matches!(Inbound::from_text(&greeting), Ok(Inbound::FullState(_))));

        handle.shutdown();
        let goodbye = handle.from_host.recv().await.unwrap_or_default();
        assert_eq!(Inbound::from_text(&goodbye), Ok(Inbound::ClosingConnection));
    }

    #[tokio::test(start_paused = true)]
    async fn spawned_host_advances_running_level() {
        let mut handle = spawn_host(SimHost::default());
        let _ = handle.from_host.recv().await;

        for command in [envelope("LoadLevel", &["warmup", "w1"]), envelope("StartCasual", &[])] {
            let text = command.to_json().unwrap_or_default();
            assert!(handle.to_host.send(text).await.is_ok());
        }

        let mut progressed = None;
        for _ in 0..10 {
            let Some(text) = handle.from_host.recv().await else {
                break;
            };
            if let Ok(Inbound::FullState(snapshot)) = Inbound::from_text(&text)
                && snapshot.elapsed_time.is_some_and(|t| t > 0.0)
            {
                progressed = Some(snapshot);
                break;
            }
        }

        let snapshot = progressed.unwrap_or_else(|| HostSnapshot::with_mode("none"));
        assert_eq!(snapshot.mode, "Catching");
        assert_eq!(snapshot.elapsed_time, Some(TICK.as_secs_f64()));
        assert_eq!(snapshot.current_score, Some(10.0));
    }
}
