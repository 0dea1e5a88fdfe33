//! Arguments for FETCH, STORE and SEARCH.

use crate::types::{Flag, SequenceSet};

/// What to fetch for each message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchItems {
    /// The complete RFC 822 message. Implicitly sets `\Seen`.
    Rfc822,
    /// An explicit attribute list.
    Items(Vec<FetchAttribute>),
}

/// A single FETCH attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchAttribute {
    /// `FLAGS`
    Flags,
    /// `UID`
    Uid,
    /// `INTERNALDATE`
    InternalDate,
    /// `RFC822.SIZE`
    Rfc822Size,
    /// `RFC822`
    Rfc822,
    /// `RFC822.HEADER`
    Rfc822Header,
    /// `BODY.PEEK[section]`, leaves `\Seen` untouched.
    BodyPeek(Option<String>),
}

/// Flag modification for STORE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreAction {
    /// `+FLAGS`
    Add(Vec<Flag>),
    /// `-FLAGS`
    Remove(Vec<Flag>),
    /// `FLAGS`
    Replace(Vec<Flag>),
}

impl StoreAction {
    /// Marks messages for removal by the next EXPUNGE.
    #[must_use]
    pub fn mark_deleted() -> Self {
        Self::Add(vec![Flag::Deleted])
    }

    pub(crate) const fn keyword(&self) -> &'static str {
        match self {
            Self::Add(_) => "+FLAGS",
            Self::Remove(_) => "-FLAGS",
            Self::Replace(_) => "FLAGS",
        }
    }

    pub(crate) fn flags(&self) -> &[Flag] {
        match self {
            Self::Add(flags) | Self::Remove(flags) | Self::Replace(flags) => flags,
        }
    }
}

/// SEARCH criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCriteria {
    /// Every message in the mailbox.
    All,
    /// Messages flagged `\Deleted`.
    Deleted,
    /// Messages not flagged `\Deleted`.
    Undeleted,
    /// Messages in the given set.
    Sequence(SequenceSet),
}
