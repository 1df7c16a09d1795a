//! Line-oriented front end over [`CredentialStore`].
//!
//! One command per line: `login <user> <password>`, `register <user> <password>`,
//! `list`, `help`, `quit`. The password is the rest of the line after the username.

use crate::service::CredentialStore;
use std::io::BufRead;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{error, warn};

pub const LOGIN_OK: &str = "Login successful! Data persists between sessions.";
pub const LOGIN_FAILED: &str = "Invalid credentials.";
pub const REGISTER_OK: &str = "Registration successful!";

const HELP: &str = "\
commands:
  login <username> <password>
  register <username> <password>
  list
  help
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { username: String, password: String },
    Register { username: String, password: String },
    List,
    Help,
    Quit,
    Empty,
    Usage(&'static str),
    Unknown(String),
}

pub fn parse(line: &str) -> Command {
    let line = line.trim_start();
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .unwrap_or((line.trim_end(), ""));
    match verb.to_ascii_lowercase().as_str() {
        "" => Command::Empty,
        "login" => match split_credentials(rest) {
            Some((username, password)) => Command::Login { username, password },
            None => Command::Usage("usage: login <username> <password>"),
        },
        "register" => match split_credentials(rest) {
            Some((username, password)) => Command::Register { username, password },
            None => Command::Usage("usage: register <username> <password>"),
        },
        "list" => Command::List,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

fn split_credentials(rest: &str) -> Option<(String, String)> {
    let (username, password) = rest.trim_start().split_once(char::is_whitespace)?;
    if username.is_empty() || password.is_empty() {
        return None;
    }
    Some((username.to_string(), password.to_string()))
}

/// Run one command; `None` means the session should end.
pub async fn execute(store: &CredentialStore, command: Command) -> Option<String> {
    let reply = match command {
        Command::Login { username, password } => match store.login(&username, &password).await {
            Ok(true) => LOGIN_OK.to_string(),
            Ok(false) => LOGIN_FAILED.to_string(),
            Err(e) => {
                error!(error = %e, "login aborted");
                e.user_message().to_string()
            }
        },
        Command::Register { username, password } => {
            match store.register(&username, &password).await {
                Ok(_) => REGISTER_OK.to_string(),
                Err(e) => {
                    warn!(error = %e, "registration rejected");
                    e.user_message().to_string()
                }
            }
        }
        Command::List => match store.list_usernames().await {
            Ok(names) => names.join("\n"),
            Err(e) => {
                error!(error = %e, "listing users failed");
                e.user_message().to_string()
            }
        },
        Command::Help => HELP.to_string(),
        Command::Quit => return None,
        Command::Empty => String::new(),
        Command::Usage(usage) => usage.to_string(),
        Command::Unknown(verb) => format!("unknown command: {verb} (try `help`)"),
    };
    Some(reply)
}

async fn respond<W>(store: &CredentialStore, line: &str, output: &mut W) -> io::Result<bool>
where
    W: AsyncWrite + Unpin,
{
    let Some(reply) = execute(store, parse(line)).await else {
        return Ok(false);
    };
    if !reply.is_empty() {
        output.write_all(reply.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
    }
    Ok(true)
}

/// Read commands from `input` until EOF or `quit`, writing replies to `output`.
pub async fn run<R, W>(store: &CredentialStore, input: R, mut output: W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if !respond(store, &line, &mut output).await? {
            break;
        }
    }
    Ok(())
}

/// Lines of the process stdin, read on a dedicated thread.
///
/// The thread blocks in `read` and is never joined, so a pending read does not
/// keep the process alive once `main` returns.
pub fn stdin_lines() -> io::Result<mpsc::Receiver<String>> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::Builder::new()
        .name("console-stdin".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!(error = %e, "reading stdin failed");
                        break;
                    }
                };
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
        })?;
    Ok(rx)
}

/// Serve commands from `lines` until the sender goes away, `quit`, or `shutdown` resolves.
///
/// Lines already queued are handled before `shutdown` is looked at.
pub async fn run_until<W, F>(
    store: &CredentialStore,
    mut lines: mpsc::Receiver<String>,
    mut output: W,
    shutdown: F,
) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    loop {
        let line = tokio::select! {
            biased;
            line = lines.recv() => line,
            _ = &mut shutdown => return Ok(()),
        };
        let Some(line) = line else {
            return Ok(());
        };
        if !respond(store, &line, &mut output).await? {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(username: &str, password: &str) -> (String, String) {
        (username.to_string(), password.to_string())
    }

    #[test]
    fn login_and_register_take_rest_of_line_as_password() {
        let (username, password) = creds("alice", "two words ");
        assert_eq!(
            parse("login alice two words "),
            Command::Login { username, password }
        );
        let (username, password) = creds("Bob", "pw");
        assert_eq!(
            parse("  REGISTER   Bob pw"),
            Command::Register { username, password }
        );
    }

    #[test]
    fn missing_password_is_usage() {
        assert!(matches!(parse("login alice"), Command::Usage(_)));
        assert!(matches!(parse("register"), Command::Usage(_)));
    }

    #[test]
    fn simple_verbs() {
        assert_eq!(parse("list"), Command::List);
        assert_eq!(parse("quit"), Command::Quit);
        assert_eq!(parse("exit "), Command::Quit);
        assert_eq!(parse("   "), Command::Empty);
        assert_eq!(parse("dance now"), Command::Unknown("dance".into()));
    }
}
