//! Interactive command parsing.

use std::str::FromStr;
use wsconsole::history::LogKind;

pub const HELP: &str = "\
commands:
  connect <url>              open a socket (replaces the current one)
  send [payload]             send payload, or the draft when omitted
  draft [payload]            set or show the draft
  copy <n>                   copy sent message n into the draft
  resend <n>                 send sent message n again
  delete sent|received <n>   delete one message
  clear sent|received        clear a log
  history [sent|received]    show logs (newest first)
  status                     connection status and settings
  reconnect on|off           toggle auto-reconnect
  help                       this text
  quit                       exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Connect(String),
    Send(Option<String>),
    Draft(Option<String>),
    Copy(usize),
    Resend(usize),
    Delete(LogKind, usize),
    Clear(LogKind),
    History(Option<LogKind>),
    Status,
    Reconnect(bool),
    Help,
    Quit,
}

fn index(arg: Option<&str>) -> Result<usize, String> {
    let arg = arg.ok_or("missing message number")?;
    arg.parse()
        .map_err(|_| format!("'{arg}' is not a message number"))
}

fn payload(rest: &str) -> Option<String> {
    Some(rest.to_string()).filter(|p| !p.is_empty())
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map(|(verb, rest)| (verb, rest.trim()))
            .unwrap_or((line, ""));
        let mut args = rest.split_whitespace();

        match verb {
            "connect" | "c" => match args.next() {
                Some(url) => Ok(Command::Connect(url.to_string())),
                None => Err("usage: connect <url>".to_string()),
            },
            // Payloads keep their inner whitespace.
            "send" | "s" => Ok(Command::Send(payload(rest))),
            "draft" => Ok(Command::Draft(payload(rest))),
            "copy" => Ok(Command::Copy(index(args.next())?)),
            "resend" => Ok(Command::Resend(index(args.next())?)),
            "delete" | "del" => {
                let kind = args
                    .next()
                    .ok_or("usage: delete sent|received <n>")?
                    .parse()?;
                Ok(Command::Delete(kind, index(args.next())?))
            }
            "clear" => {
                let kind = args.next().ok_or("usage: clear sent|received")?.parse()?;
                Ok(Command::Clear(kind))
            }
            "history" | "h" => match args.next() {
                Some(kind) => Ok(Command::History(Some(kind.parse()?))),
                None => Ok(Command::History(None)),
            },
            "status" => Ok(Command::Status),
            "reconnect" => match args.next() {
                Some("on") | Some("true") => Ok(Command::Reconnect(true)),
                Some("off") | Some("false") => Ok(Command::Reconnect(false)),
                _ => Err("usage: reconnect on|off".to_string()),
            },
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "" => Err(String::new()),
            other => Err(format!("unknown command '{other}', try 'help'")),
        }
    }
}
