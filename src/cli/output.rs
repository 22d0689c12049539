//! Terminal rendering.

use wsconsole::history::render::{format_timestamp, pretty_payload, render_record};
use wsconsole::history::{LogKind, MessageLog};
use wsconsole::session::SessionUpdate;

pub fn update(update: &SessionUpdate) {
    match update {
        SessionUpdate::Opened { url } => println!("* Online ({url})"),
        SessionUpdate::Closed {
            reconnect_in: Some(delay),
        } => println!("* Offline, reconnecting in {}s", delay.as_secs_f32()),
        SessionUpdate::Closed { reconnect_in: None } => println!("* Offline"),
        SessionUpdate::Reconnecting { url } => println!("* Reconnecting to {url}"),
        SessionUpdate::Received(record) => {
            println!("<< {}", format_timestamp(record.created_at()));
            println!("{}", pretty_payload(record.message()));
        }
    }
}

pub fn log(kind: LogKind, log: &MessageLog) {
    println!("== {} ({}/{})", kind.label(), log.len(), log.capacity());
    for (index, record) in log.iter().enumerate() {
        println!("{}", render_record(index, record));
    }
}
