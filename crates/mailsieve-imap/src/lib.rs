//! # mailsieve-imap
//!
//! A small async IMAP client covering exactly what a mailbox pruning pass
//! needs: LOGIN, SELECT, SEARCH, FETCH, STORE, EXPUNGE, CLOSE and LOGOUT.
//!
//! ## Connection States
//!
//! The client uses the type-state pattern so that, for example, `fetch`
//! can only be called once a mailbox is selected:
//!
//! ```text
//! NotAuthenticated ── login() ──→ Authenticated ── select() ──→ Selected
//!                                       ↑                           │
//!                                       └───────── close() ─────────┘
//! ```
//!
//! Transitions that the server refuses hand the client back inside
//! [`Rejected`] so the caller is still able to log out cleanly.
//!
//! ## Example
//!
//! ```ignore
//! use mailsieve_imap::{Client, FetchItems, SearchCriteria, SequenceSet};
//!
//! let stream = mailsieve_imap::connection::connect_tls("imap.example.com", 993).await?;
//! let client = Client::from_stream(stream).await?;
//! let client = client.login("user@example.com", "secret").await?;
//! let (mut client, status) = client.select("INBOX").await.map_err(|r| r.error)?;
//! println!("{} messages", status.exists);
//!
//! let ids = client.search(&SearchCriteria::All).await?;
//! if let Some(first) = ids.first() {
//!     let fetched = client.fetch(&SequenceSet::Single(*first), FetchItems::Rfc822).await?;
//! }
//! client.logout().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod connection;
mod error;
pub mod parser;
pub mod types;

pub use command::{Command, FetchAttribute, FetchItems, SearchCriteria, StoreAction, TagGenerator};
pub use connection::{
    Authenticated, Client, FramedStream, ImapStream, NotAuthenticated, Rejected,
    ResponseAccumulator, Selected,
};
pub use error::{Error, Result};
pub use parser::{FetchItem, Response, ResponseParser, UntaggedResponse};
pub use types::{
    Capability, Flag, Flags, MailboxStatus, ResponseCode, SeqNum, SequenceSet, Status, Tag, Uid,
};

/// Default port for IMAP over implicit TLS.
pub const IMAPS_PORT: u16 = 993;
