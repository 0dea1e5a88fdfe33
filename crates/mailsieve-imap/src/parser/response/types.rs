//! Parsed response data.

use crate::types::{Capability, Flags, ResponseCode, SeqNum, Uid};

/// Server data not tied to a particular command tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UntaggedResponse {
    /// `* OK`
    Ok {
        /// Optional bracketed code.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: String,
    },
    /// `* NO`
    No {
        /// Optional bracketed code.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: String,
    },
    /// `* BAD`
    Bad {
        /// Optional bracketed code.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: String,
    },
    /// `* PREAUTH` greeting.
    PreAuth {
        /// Optional bracketed code.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: String,
    },
    /// `* BYE`
    Bye {
        /// Optional bracketed code.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: String,
    },
    /// `* CAPABILITY ...`
    Capability(Vec<Capability>),
    /// `* FLAGS (...)`
    Flags(Flags),
    /// `* SEARCH ...`
    Search(Vec<SeqNum>),
    /// `* n EXISTS`
    Exists(u32),
    /// `* n RECENT`
    Recent(u32),
    /// `* n EXPUNGE`
    Expunge(SeqNum),
    /// `* n FETCH (...)`
    Fetch {
        /// Message the data belongs to.
        seq: SeqNum,
        /// Returned data items.
        items: Vec<FetchItem>,
    },
}

/// One data item of a FETCH response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchItem {
    /// `FLAGS`
    Flags(Flags),
    /// `UID`
    Uid(Uid),
    /// `RFC822.SIZE`
    Rfc822Size(u32),
    /// `INTERNALDATE`
    InternalDate(String),
    /// `RFC822`, `RFC822.HEADER`, `RFC822.TEXT` or `BODY[section]`.
    Body {
        /// Item name as sent by the server, e.g. `RFC822` or `BODY[HEADER]`.
        name: String,
        /// Payload; `None` when the server sent NIL.
        data: Option<Vec<u8>>,
    },
}

impl FetchItem {
    /// Returns the payload if this item carries a whole message.
    #[must_use]
    pub fn full_message(&self) -> Option<&[u8]> {
        match self {
            Self::Body { name, data } if name == "RFC822" || name == "BODY[]" => {
                data.as_deref()
            }
            _ => None,
        }
    }
}
