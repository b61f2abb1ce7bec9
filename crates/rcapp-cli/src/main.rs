//! rcapp command-line client.
//!
//! # Usage
//!
//! ```bash
//! # Try it against the in-process simulated Host
//! rcapp --simulate --host demo
//!
//! # Settings from a file, flags win
//! rcapp --config rcapp.toml --http
//! ```
//!
//! Type `/help` once running. Logs go to stderr; stdout is the display.

use std::{io, path::PathBuf};

use clap::Parser;
use rcapp_app::{ConsoleDriver, Runtime, SimHost};
use rcapp_cli::{CliError, ClientConfig, StartupMode};
use rcapp_core::{Host, Intent, Session, SessionEvent, SystemClock};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// rcapp remote control
#[derive(Parser, Debug)]
#[command(name = "rcapp")]
#[command(about = "Remote control for a paired rcapp Host")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to pair with at startup
    #[arg(long)]
    host: Option<String>,

    /// Signal over HTTP instead of WebSocket
    #[arg(long)]
    http: bool,

    /// Startup pairing mode
    #[arg(long, value_enum)]
    startup_mode: Option<StartupMode>,

    /// Talk to an in-process simulated Host
    #[arg(long)]
    simulate: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Args {
    /// File settings overridden by flags.
    fn resolve(&self) -> Result<ClientConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::load(path)?,
            None => ClientConfig::default(),
        };

        if let Some(host) = &self.host {
            config.host_id = Some(host.clone());
        }
        if self.http {
            config.use_web_socket = false;
        }
        if let Some(mode) = self.startup_mode {
            config.startup_mode = mode;
        }
        if self.simulate {
            config.simulate = true;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    let config = args.resolve()?;
    tracing::info!(?config, "rcapp starting");

    if config.startup_mode == StartupMode::Private {
        tracing::warn!("private startup mode is not supported; pairing publicly");
    }

    let mut session = Session::new(SystemClock, config.transport_hint());
    if let Some(id) = &config.host_id {
        let _ = session.handle(SessionEvent::Intent(Intent::SelectHost(Host::new(id.clone()))));
    }

    let input = spawn_stdin_reader();
    let driver = if config.simulate {
        ConsoleDriver::with_simulated_host(input, io::stdout(), SimHost::default())
    } else {
        ConsoleDriver::new(input, io::stdout())
    };

    Runtime::new(driver, session).run(config.host_id.is_some()).await?;

    tracing::info!("rcapp stopped");
    Ok(())
}

/// Forward stdin lines to a channel. The channel closes at end of input.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).await.is_err() {
                        break;
                    }
                },
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!("stdin read failed: {e}");
                    break;
                },
            }
        }
    });

    rx
}
