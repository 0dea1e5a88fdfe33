//! Protocol state markers.

use std::sync::Arc;

use crate::types::MailboxStatus;

/// Greeting received, LOGIN not yet done.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotAuthenticated;

/// Logged in, no mailbox selected.
#[derive(Debug, Clone, Copy, Default)]
pub struct Authenticated;

/// A mailbox is open read-write.
#[derive(Debug, Clone)]
pub struct Selected {
    mailbox: Arc<str>,
    status: MailboxStatus,
}

impl Selected {
    pub(crate) fn new(mailbox: &str, status: MailboxStatus) -> Self {
        Self {
            mailbox: mailbox.into(),
            status,
        }
    }

    /// Name of the selected mailbox.
    #[must_use]
    pub fn mailbox(&self) -> &str {
        &self.mailbox
    }

    /// Status reported by SELECT, kept current with EXISTS and EXPUNGE.
    #[must_use]
    pub const fn status(&self) -> &MailboxStatus {
        &self.status
    }

    pub(crate) const fn status_mut(&mut self) -> &mut MailboxStatus {
        &mut self.status
    }
}
