//! What the server reports when a folder is opened.

use super::{Flag, Flags, SeqNum, Uid};

/// Folder state collected from the untagged replies to SELECT.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailboxStatus {
    /// Message count (`EXISTS`).
    pub exists: u32,
    /// Messages new since the last session (`RECENT`).
    pub recent: u32,
    /// Lowest unseen sequence number, when the server names one.
    pub unseen: Option<SeqNum>,
    /// `UIDVALIDITY`, when sent.
    pub uid_validity: Option<u32>,
    /// `UIDNEXT`, when sent.
    pub uid_next: Option<Uid>,
    /// Flags known in this folder.
    pub flags: Flags,
    /// Flags a STORE may set for good. Empty when the server did not say.
    pub permanent_flags: Flags,
    /// Set by a `[READ-ONLY]` completion.
    pub read_only: bool,
}

impl MailboxStatus {
    /// No messages in the folder.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.exists == 0
    }

    /// Whether flagging `\Deleted` here can lead to an actual removal.
    ///
    /// Servers that omit PERMANENTFLAGS are given the benefit of the doubt.
    #[must_use]
    pub fn accepts_deletions(&self) -> bool {
        !self.read_only
            && (self.permanent_flags.is_empty()
                || self.permanent_flags.contains(&Flag::Deleted)
                || self.permanent_flags.contains(&Flag::Keyword("\\*".into())))
    }
}
