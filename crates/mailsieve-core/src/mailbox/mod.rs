//! IMAP mailbox session and the two pruning passes.
//!
//! [`MailboxClient`] owns at most one IMAP session. Each pass connects,
//! works through the folder one message at a time and disconnects on every
//! exit path, returning a [`PassReport`] instead of an error.

mod client;
mod connector;
mod report;

pub use client::MailboxClient;
pub use connector::{Connector, TlsConnector};
pub use report::{Operation, PassOutcome, PassReport, PassStats};

/// Errors raised inside a mailbox session.
///
/// Public operations turn these into log lines and report outcomes.
#[derive(Debug, thiserror::Error)]
pub enum MailboxError {
    /// No session is open.
    #[error("Not connected to the email server")]
    NotConnected,

    /// A session is open but no folder is selected.
    #[error("No folder selected")]
    NoFolderSelected,

    /// The server returned no message data for a FETCH.
    #[error("Server returned no data for message {0}")]
    MissingMessage(u32),

    /// IMAP protocol or transport failure.
    #[error(transparent)]
    Imap(#[from] mailsieve_imap::Error),

    /// The fetched message could not be parsed.
    #[error("Unparsable message: {0}")]
    Mime(#[from] mailsieve_mime::Error),

    /// The sender store failed.
    #[error("Sender store failed: {0}")]
    Store(#[from] crate::Error),
}

impl MailboxError {
    /// True if the session is unusable and later commands would fail too.
    #[must_use]
    pub const fn is_connection_lost(&self) -> bool {
        matches!(
            self,
            Self::NotConnected
                | Self::Imap(mailsieve_imap::Error::Io(_) | mailsieve_imap::Error::Bye(_))
        )
    }
}

/// Which messages a deletion pass may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionScope {
    /// Every message in the folder.
    All,
    /// Only the `n` most recent messages by `Date` header. Messages without
    /// a parseable date are left alone, and a limit of 0 touches nothing.
    MostRecent(usize),
}

impl DeletionScope {
    /// The newest `limit` messages. Zero never widens to [`DeletionScope::All`].
    #[must_use]
    pub const fn most_recent(limit: usize) -> Self {
        Self::MostRecent(limit)
    }
}
