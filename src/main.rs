//! wsconsole - interactive WebSocket test client.
//!
//! Connects to a WebSocket endpoint, sends ad-hoc payloads, and keeps the
//! last 50 sent and received messages in a local session store.

use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use wsconsole::session::SessionManager;
use wsconsole::storage::SessionStore;
use wsconsole::ws::TungsteniteConnector;

mod cli;

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::Cli::parse();
    init_logging(&args.log_level);

    let store = match args.open_store() {
        Ok(store) => SessionStore::new(store),
        Err(e) => {
            eprintln!("Error: cannot open {}: {}", args.store.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let mut session =
        match SessionManager::open(store, Arc::new(TungsteniteConnector), args.session_config()) {
            Ok(session) => session,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        };

    let started = match &args.url {
        Some(url) => session.connect(url),
        None => session.resume().map(|_| ()),
    };
    if let Err(e) = started {
        eprintln!("Error: {}", e);
    }

    match cli::run(session).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
