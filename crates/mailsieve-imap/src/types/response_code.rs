//! Bracketed response codes, e.g. `[READ-ONLY]`.

use super::{Capability, Flags, SeqNum, Uid};

/// Response code carried by a status response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseCode {
    /// ALERT: text that should be shown to the operator.
    Alert,
    /// CAPABILITY list piggybacked on a status response.
    Capability(Vec<Capability>),
    /// PERMANENTFLAGS from SELECT.
    PermanentFlags(Flags),
    /// Mailbox selected read-only.
    ReadOnly,
    /// Mailbox selected read-write.
    ReadWrite,
    /// Target mailbox does not exist.
    TryCreate,
    /// UIDNEXT from SELECT.
    UidNext(Uid),
    /// UIDVALIDITY from SELECT.
    UidValidity(u32),
    /// First unseen message.
    Unseen(SeqNum),
    /// Unrecognised code, name and raw arguments.
    Other(String, Option<String>),
}
