//! IMAP commands and their wire serialization.

mod serialize;
mod tag_generator;
mod types;

use crate::types::SequenceSet;

pub use tag_generator::TagGenerator;
pub use types::{FetchAttribute, FetchItems, SearchCriteria, StoreAction};

use serialize::Serializer;

/// An IMAP command.
#[derive(Clone, PartialEq, Eq)]
pub enum Command {
    /// CAPABILITY
    Capability,
    /// NOOP
    Noop,
    /// LOGOUT
    Logout,
    /// LOGIN
    Login {
        /// Account name.
        username: String,
        /// Secret. Never shown by `Debug`.
        password: String,
    },
    /// SELECT
    Select {
        /// Mailbox to open read-write.
        mailbox: String,
    },
    /// SEARCH
    Search {
        /// What to match.
        criteria: SearchCriteria,
    },
    /// FETCH
    Fetch {
        /// Messages to fetch.
        sequence: SequenceSet,
        /// Data items to return.
        items: FetchItems,
    },
    /// STORE
    Store {
        /// Messages to modify.
        sequence: SequenceSet,
        /// Flag change.
        action: StoreAction,
        /// Suppress the untagged FETCH echo.
        silent: bool,
    },
    /// EXPUNGE
    Expunge,
    /// CLOSE
    Close,
}

impl Command {
    /// Serializes the command with the given tag into a single buffer.
    ///
    /// Literal chunks are concatenated, so this is only suitable for
    /// inspection or for servers known to accept the whole line at once;
    /// the client sends [`Command::serialize_chunks`].
    #[must_use]
    pub fn serialize(&self, tag: &str) -> Vec<u8> {
        self.serialize_chunks(tag).concat()
    }

    /// Serializes the command into chunks separated by synchronizing
    /// literals.
    #[must_use]
    pub fn serialize_chunks(&self, tag: &str) -> Vec<Vec<u8>> {
        let mut s = Serializer::new();
        s.raw(tag.as_bytes());
        s.space();

        match self {
            Self::Capability => s.raw(b"CAPABILITY"),
            Self::Noop => s.raw(b"NOOP"),
            Self::Logout => s.raw(b"LOGOUT"),
            Self::Expunge => s.raw(b"EXPUNGE"),
            Self::Close => s.raw(b"CLOSE"),
            Self::Login { username, password } => {
                s.raw(b"LOGIN ");
                s.astring(username);
                s.space();
                s.astring(password);
            }
            Self::Select { mailbox } => {
                s.raw(b"SELECT ");
                s.astring(mailbox);
            }
            Self::Search { criteria } => {
                s.raw(b"SEARCH ");
                s.search_criteria(criteria);
            }
            Self::Fetch { sequence, items } => {
                s.raw(b"FETCH ");
                s.sequence(sequence);
                s.space();
                s.fetch_items(items);
            }
            Self::Store {
                sequence,
                action,
                silent,
            } => {
                s.raw(b"STORE ");
                s.sequence(sequence);
                s.space();
                s.store_action(action, *silent);
            }
        }

        s.finish()
    }

    /// Command name for log lines.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Capability => "CAPABILITY",
            Self::Noop => "NOOP",
            Self::Logout => "LOGOUT",
            Self::Login { .. } => "LOGIN",
            Self::Select { .. } => "SELECT",
            Self::Search { .. } => "SEARCH",
            Self::Fetch { .. } => "FETCH",
            Self::Store { .. } => "STORE",
            Self::Expunge => "EXPUNGE",
            Self::Close => "CLOSE",
        }
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Login { username, .. } => f
                .debug_struct("Login")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Select { mailbox } => f.debug_struct("Select").field("mailbox", mailbox).finish(),
            Self::Search { criteria } => {
                f.debug_struct("Search").field("criteria", criteria).finish()
            }
            Self::Fetch { sequence, items } => f
                .debug_struct("Fetch")
                .field("sequence", sequence)
                .field("items", items)
                .finish(),
            Self::Store {
                sequence,
                action,
                silent,
            } => f
                .debug_struct("Store")
                .field("sequence", sequence)
                .field("action", action)
                .field("silent", silent)
                .finish(),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::SeqNum;

    #[test]
    fn login() {
        let cmd = Command::Login {
            username: "jane@example.com".into(),
            password: "hunter2".into(),
        };
        assert_eq!(cmd.serialize("A0000"), b"A0000 LOGIN jane@example.com hunter2\r\n");
    }

    #[test]
    fn login_debug_hides_password() {
        let cmd = Command::Login {
            username: "jane".into(),
            password: "hunter2".into(),
        };
        let debug = format!("{cmd:?}");
        assert!(debug.contains("jane"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn select_and_search() {
        let select = Command::Select {
            mailbox: "INBOX".into(),
        };
        assert_eq!(select.serialize("A0001"), b"A0001 SELECT INBOX\r\n");

        let search = Command::Search {
            criteria: SearchCriteria::All,
        };
        assert_eq!(search.serialize("A0002"), b"A0002 SEARCH ALL\r\n");
    }

    #[test]
    fn fetch_rfc822() {
        let cmd = Command::Fetch {
            sequence: SequenceSet::Single(SeqNum::new(3).unwrap()),
            items: FetchItems::Rfc822,
        };
        assert_eq!(cmd.serialize("A0003"), b"A0003 FETCH 3 RFC822\r\n");
    }

    #[test]
    fn store_deleted_flag() {
        let cmd = Command::Store {
            sequence: SequenceSet::Single(SeqNum::new(12).unwrap()),
            action: StoreAction::mark_deleted(),
            silent: false,
        };
        assert_eq!(cmd.serialize("A0004"), b"A0004 STORE 12 +FLAGS (\\Deleted)\r\n");
    }

    #[test]
    fn bare_commands() {
        assert_eq!(Command::Expunge.serialize("A0005"), b"A0005 EXPUNGE\r\n");
        assert_eq!(Command::Close.serialize("A0006"), b"A0006 CLOSE\r\n");
        assert_eq!(Command::Logout.serialize("A0007"), b"A0007 LOGOUT\r\n");
    }

    #[test]
    fn quoted_mailbox_names() {
        let cmd = Command::Select {
            mailbox: "Old Mail".into(),
        };
        assert_eq!(cmd.serialize("A0008"), b"A0008 SELECT \"Old Mail\"\r\n");
    }
}
