//! In-memory IMAP server for mailbox client tests.
//!
//! The server answers each command as soon as its line is written, so the
//! client always finds the reply queued when it reads. Reading with nothing
//! queued is end of stream.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use chrono::NaiveDate;
use mailsieve_core::{Connector, MailboxConfig, Secret};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

pub const ACCOUNT: &str = "me@corp.test";
pub const PASSWORD: &str = "hunter2";

/// Builds an RFC 822 message. `date` is left out when `None`.
pub fn message(from: &str, subject: &str, date: Option<&str>) -> Vec<u8> {
    let mut raw = format!("From: {from}\r\nSubject: {subject}\r\n");
    if let Some(date) = date {
        raw.push_str(&format!("Date: {date}\r\n"));
    }
    raw.push_str("\r\nbody\r\n");
    raw.into_bytes()
}

/// Date header for day `day` of January 2024 at noon UTC, weekday included.
pub fn january(day: u32) -> String {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        .and_utc()
        .to_rfc2822()
}

pub fn config() -> MailboxConfig {
    MailboxConfig::new("imap.corp.test", ACCOUNT, Secret::new(PASSWORD.to_string()))
        .with_trusted_domains(vec!["corp.test".to_string()])
}

#[derive(Default)]
struct ServerState {
    password: String,
    /// Folder name to messages; `None` entries fail to FETCH.
    folders: HashMap<String, Vec<Option<Vec<u8>>>>,
    selected: Option<String>,
    hangup_at_fetch: Option<usize>,
    fail_expunge: bool,
    refuse_connections: bool,
    connections: usize,
    fetches: usize,
    hung_up: bool,
    log: Vec<String>,
    stored: Vec<u32>,
    deleted: BTreeSet<u32>,
    expunged: usize,
    inbound: Vec<u8>,
    outbound: VecDeque<u8>,
}

impl ServerState {
    fn reply(&mut self, text: &str) {
        self.outbound.extend(text.as_bytes());
    }

    fn handle_line(&mut self, line: &str) {
        let (tag, rest) = line.split_once(' ').unwrap_or((line, ""));
        self.log.push(rest.to_string());
        if self.hung_up {
            return;
        }

        let (name, args) = rest.split_once(' ').unwrap_or((rest, ""));
        match name.to_ascii_uppercase().as_str() {
            "LOGIN" => {
                let password = args.split(' ').nth(1).unwrap_or_default().trim_matches('"');
                if password == self.password {
                    self.reply(&format!("{tag} OK LOGIN completed\r\n"));
                } else {
                    self.reply(&format!("{tag} NO [AUTHENTICATIONFAILED] Invalid credentials\r\n"));
                }
            }
            "SELECT" => {
                let folder = args.trim_matches('"').to_string();
                if let Some(messages) = self.folders.get(&folder) {
                    let exists = messages.len();
                    self.selected = Some(folder);
                    self.deleted.clear();
                    self.reply(&format!(
                        "* {exists} EXISTS\r\n* 0 RECENT\r\n{tag} OK [READ-WRITE] SELECT completed\r\n"
                    ));
                } else {
                    self.selected = None;
                    self.reply(&format!("{tag} NO [NONEXISTENT] no such mailbox\r\n"));
                }
            }
            "SEARCH" => {
                let count = self.messages().len();
                let ids: String = (1..=count).map(|n| format!(" {n}")).collect();
                self.reply(&format!("* SEARCH{ids}\r\n{tag} OK SEARCH completed\r\n"));
            }
            "FETCH" => {
                self.fetches += 1;
                if self.hangup_at_fetch == Some(self.fetches) {
                    self.hung_up = true;
                    return;
                }
                let id: usize = args.split(' ').next().unwrap().parse().unwrap();
                match self.messages().get(id - 1).cloned().flatten() {
                    Some(raw) => {
                        self.reply(&format!("* {id} FETCH (RFC822 {{{}}}\r\n", raw.len()));
                        self.outbound.extend(raw);
                        self.reply(&format!(")\r\n{tag} OK FETCH completed\r\n"));
                    }
                    None => self.reply(&format!("{tag} NO message unavailable\r\n")),
                }
            }
            "STORE" => {
                let id: u32 = args.split(' ').next().unwrap().parse().unwrap();
                self.stored.push(id);
                self.deleted.insert(id);
                self.reply(&format!("{tag} OK STORE completed\r\n"));
            }
            "EXPUNGE" => {
                if self.fail_expunge {
                    self.reply(&format!("{tag} NO EXPUNGE failed\r\n"));
                    return;
                }
                let mut untagged = String::new();
                for id in self.take_deleted() {
                    untagged.push_str(&format!("* {id} EXPUNGE\r\n"));
                }
                self.reply(&format!("{untagged}{tag} OK EXPUNGE completed\r\n"));
            }
            "CLOSE" => {
                if self.selected.is_some() {
                    self.take_deleted();
                    self.selected = None;
                    self.reply(&format!("{tag} OK CLOSE completed\r\n"));
                } else {
                    self.reply(&format!("{tag} BAD no mailbox selected\r\n"));
                }
            }
            "LOGOUT" => {
                self.reply(&format!("* BYE logging out\r\n{tag} OK LOGOUT completed\r\n"));
            }
            _ => self.reply(&format!("{tag} BAD unknown command\r\n")),
        }
    }

    fn messages(&mut self) -> &mut Vec<Option<Vec<u8>>> {
        let folder = self.selected.clone().unwrap();
        self.folders.get_mut(&folder).unwrap()
    }

    /// Removes `\Deleted` messages, highest first so sequence numbers stay valid.
    fn take_deleted(&mut self) -> Vec<u32> {
        let ids: Vec<u32> = std::mem::take(&mut self.deleted).into_iter().rev().collect();
        for id in &ids {
            self.messages().remove(*id as usize - 1);
        }
        self.expunged += ids.len();
        ids
    }
}

/// Handle on the shared server state.
#[derive(Clone)]
pub struct FakeServer {
    state: Arc<Mutex<ServerState>>,
}

impl FakeServer {
    pub fn new() -> Self {
        let state = ServerState {
            password: PASSWORD.to_string(),
            ..ServerState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn folder(self, name: &str, messages: Vec<Vec<u8>>) -> Self {
        self.folder_with_gaps(name, messages.into_iter().map(Some).collect())
    }

    /// Like [`folder`](Self::folder), but `None` entries answer FETCH with NO.
    pub fn folder_with_gaps(self, name: &str, messages: Vec<Option<Vec<u8>>>) -> Self {
        self.state.lock().unwrap().folders.insert(name.to_string(), messages);
        self
    }

    /// Drops the connection instead of answering the `n`th FETCH.
    pub fn hangup_at_fetch(self, n: usize) -> Self {
        self.state.lock().unwrap().hangup_at_fetch = Some(n);
        self
    }

    pub fn fail_expunge(self) -> Self {
        self.state.lock().unwrap().fail_expunge = true;
        self
    }

    pub fn refuse_connections(self) -> Self {
        self.state.lock().unwrap().refuse_connections = true;
        self
    }

    pub fn connector(&self) -> FakeConnector {
        FakeConnector {
            state: Arc::clone(&self.state),
        }
    }

    /// Commands received, without tags.
    pub fn log(&self) -> Vec<String> {
        self.state.lock().unwrap().log.clone()
    }

    /// How many received commands start with `name`.
    pub fn count(&self, name: &str) -> usize {
        self.log().iter().filter(|line| line.starts_with(name)).count()
    }

    /// Sequence numbers passed to STORE, in order.
    pub fn stored(&self) -> Vec<u32> {
        self.state.lock().unwrap().stored.clone()
    }

    pub fn expunged(&self) -> usize {
        self.state.lock().unwrap().expunged
    }

    pub fn remaining(&self, folder: &str) -> usize {
        self.state.lock().unwrap().folders[folder].len()
    }

    pub fn connections(&self) -> usize {
        self.state.lock().unwrap().connections
    }
}

pub struct FakeConnector {
    state: Arc<Mutex<ServerState>>,
}

impl Connector for FakeConnector {
    type Stream = FakeStream;

    async fn connect(&self, _host: &str, _port: u16) -> mailsieve_imap::Result<FakeStream> {
        let mut state = self.state.lock().unwrap();
        if state.refuse_connections {
            return Err(io::Error::from(io::ErrorKind::ConnectionRefused).into());
        }
        state.connections += 1;
        state.hung_up = false;
        state.fetches = 0;
        state.inbound.clear();
        state.outbound.clear();
        state.reply("* OK [CAPABILITY IMAP4rev1] fake server ready\r\n");
        drop(state);

        Ok(FakeStream {
            state: Arc::clone(&self.state),
        })
    }
}

pub struct FakeStream {
    state: Arc<Mutex<ServerState>>,
}

impl AsyncRead for FakeStream {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let mut state = self.state.lock().unwrap();
        if state.hung_up {
            return Poll::Ready(Ok(()));
        }
        let n = buf.remaining().min(state.outbound.len());
        let chunk: Vec<u8> = state.outbound.drain(..n).collect();
        buf.put_slice(&chunk);
        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for FakeStream {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        data: &[u8],
    ) -> Poll<io::Result<usize>> {
        let mut state = self.state.lock().unwrap();
        state.inbound.extend_from_slice(data);
        while let Some(pos) = state.inbound.windows(2).position(|w| w == b"\r\n") {
            let line: Vec<u8> = state.inbound.drain(..pos + 2).collect();
            let line = String::from_utf8_lossy(&line[..pos]).into_owned();
            state.handle_line(&line);
        }
        Poll::Ready(Ok(data.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
