//! Interactive front end.

pub mod command;
pub mod output;

use clap::{Parser, ValueEnum};
use command::{Command, HELP};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use wsconsole::base::neterror::NetError;
use wsconsole::history::LogKind;
use wsconsole::session::{SessionConfig, SessionManager};
use wsconsole::storage::{JsonFileStore, KeyValueStore, MemoryStore};
use wsconsole::validation::strict_scheme;

/// wsconsole - interactive WebSocket test client
#[derive(Debug, Parser)]
#[command(name = "wsconsole")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Connect to this URL at startup instead of the stored one
    pub url: Option<String>,

    /// Where the session (URL, logs, reconnect flag) is stored
    #[arg(long, default_value = "wsconsole-session.json")]
    pub store: PathBuf,

    /// Store backend
    #[arg(long, value_enum, default_value_t = Backend::Json)]
    pub backend: Backend,

    /// Delay before an automatic reconnect, in milliseconds
    #[arg(long, default_value_t = 3000)]
    pub reconnect_delay_ms: u64,

    /// Log filter when RUST_LOG is unset (e.g. "info", "wsconsole=debug")
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    Json,
    Sqlite,
    Memory,
}

impl Cli {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::default().with_reconnect_delay(Duration::from_millis(self.reconnect_delay_ms))
    }

    pub fn open_store(&self) -> Result<Box<dyn KeyValueStore>, NetError> {
        match self.backend {
            Backend::Json => Ok(Box::new(JsonFileStore::open(&self.store)?)),
            #[cfg(feature = "sqlite")]
            Backend::Sqlite => Ok(Box::new(wsconsole::storage::SqliteStore::open(&self.store)?)),
            #[cfg(not(feature = "sqlite"))]
            Backend::Sqlite => Err(NetError::storage("built without the sqlite feature")),
            Backend::Memory => Ok(Box::new(MemoryStore::new())),
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

/// Read commands from stdin and print session updates until `quit` or EOF.
pub async fn run<S: KeyValueStore>(mut session: SessionManager<S>) -> Result<(), NetError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut draft = String::new();

    print_status(&session);
    println!("type 'help' for commands");

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => match execute(&mut session, &mut draft, &line) {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) if e.is_empty() => {}
                    Err(e) => println!("error: {e}"),
                },
                None => break,
            },
            Some(update) = session.next_event() => output::update(&update),
        }
    }

    session.shutdown().await;
    Ok(())
}

fn execute<S: KeyValueStore>(
    session: &mut SessionManager<S>,
    draft: &mut String,
    line: &str,
) -> Result<Flow, String> {
    let command: Command = line.parse()?;
    let failed = |e: NetError| e.to_string();

    match command {
        Command::Connect(url) => {
            session.connect(&url).map_err(failed)?;
            if let Some(warning) = strict_scheme(&url) {
                println!("warning: {warning}");
            }
            println!("* Connecting to {url}");
        }
        Command::Send(payload) => {
            let payload = payload.unwrap_or_else(|| std::mem::take(draft));
            session.send(payload).map_err(failed)?;
            if !session.is_connected() {
                println!("* Offline: recorded but not transmitted");
            }
        }
        Command::Draft(Some(payload)) => *draft = payload,
        Command::Draft(None) => println!("{draft}"),
        Command::Copy(index) => {
            *draft = session.copy(index).map_err(failed)?.to_string();
            println!("draft: {draft}");
        }
        Command::Resend(index) => session.resend(index).map_err(failed)?,
        Command::Delete(kind, index) => {
            session.delete(kind, index).map_err(failed)?;
        }
        Command::Clear(kind) => session.clear(kind).map_err(failed)?,
        Command::History(Some(kind)) => output::log(kind, session.log(kind)),
        Command::History(None) => {
            output::log(LogKind::Sent, session.log(LogKind::Sent));
            output::log(LogKind::Received, session.log(LogKind::Received));
        }
        Command::Status => print_status(session),
        Command::Reconnect(enabled) => session.set_auto_reconnect(enabled).map_err(failed)?,
        Command::Help => println!("{HELP}"),
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn print_status<S: KeyValueStore>(session: &SessionManager<S>) {
    let endpoint = match session.endpoint() {
        "" => "(none)",
        url => url,
    };
    println!(
        "status: {}  endpoint: {}  auto-reconnect: {}",
        session.state().label(),
        endpoint,
        if session.auto_reconnect() { "on" } else { "off" }
    );
}
