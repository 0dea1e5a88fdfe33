//! Command serialization.
//!
//! A command is produced as one or more chunks. Every chunk except the last
//! ends with a synchronizing literal header (`{n}\r\n`); the client must wait
//! for the server's continuation request before sending the next chunk.

use crate::types::SequenceSet;

use super::types::{FetchAttribute, FetchItems, SearchCriteria, StoreAction};

/// Incremental command writer.
#[derive(Debug, Default)]
pub struct Serializer {
    finished: Vec<Vec<u8>>,
    current: Vec<u8>,
}

impl Serializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&mut self, bytes: &[u8]) {
        self.current.extend_from_slice(bytes);
    }

    pub fn space(&mut self) {
        self.current.push(b' ');
    }

    /// Writes an astring as an atom, a quoted string or a literal, whichever
    /// is the simplest form able to carry the value.
    pub fn astring(&mut self, value: &str) {
        let bytes = value.as_bytes();
        if !bytes.is_empty() && bytes.iter().all(|&b| is_atom_char(b)) {
            self.raw(bytes);
        } else if bytes.iter().all(|&b| is_quotable(b)) {
            self.current.push(b'"');
            for &b in bytes {
                if b == b'"' || b == b'\\' {
                    self.current.push(b'\\');
                }
                self.current.push(b);
            }
            self.current.push(b'"');
        } else {
            self.literal(bytes);
        }
    }

    fn literal(&mut self, bytes: &[u8]) {
        self.raw(format!("{{{}}}\r\n", bytes.len()).as_bytes());
        let chunk = std::mem::replace(&mut self.current, bytes.to_vec());
        self.finished.push(chunk);
    }

    pub fn sequence(&mut self, set: &SequenceSet) {
        self.raw(set.to_string().as_bytes());
    }

    pub fn fetch_items(&mut self, items: &FetchItems) {
        match items {
            FetchItems::Rfc822 => self.raw(b"RFC822"),
            FetchItems::Items(attrs) if attrs.len() == 1 => self.fetch_attribute(&attrs[0]),
            FetchItems::Items(attrs) => {
                self.raw(b"(");
                for (i, attr) in attrs.iter().enumerate() {
                    if i > 0 {
                        self.space();
                    }
                    self.fetch_attribute(attr);
                }
                self.raw(b")");
            }
        }
    }

    fn fetch_attribute(&mut self, attr: &FetchAttribute) {
        match attr {
            FetchAttribute::Flags => self.raw(b"FLAGS"),
            FetchAttribute::Uid => self.raw(b"UID"),
            FetchAttribute::InternalDate => self.raw(b"INTERNALDATE"),
            FetchAttribute::Rfc822Size => self.raw(b"RFC822.SIZE"),
            FetchAttribute::Rfc822 => self.raw(b"RFC822"),
            FetchAttribute::Rfc822Header => self.raw(b"RFC822.HEADER"),
            FetchAttribute::BodyPeek(section) => {
                self.raw(b"BODY.PEEK[");
                if let Some(section) = section {
                    self.raw(section.as_bytes());
                }
                self.raw(b"]");
            }
        }
    }

    pub fn store_action(&mut self, action: &StoreAction, silent: bool) {
        self.raw(action.keyword().as_bytes());
        if silent {
            self.raw(b".SILENT");
        }
        self.raw(b" (");
        for (i, flag) in action.flags().iter().enumerate() {
            if i > 0 {
                self.space();
            }
            self.raw(flag.as_str().as_bytes());
        }
        self.raw(b")");
    }

    pub fn search_criteria(&mut self, criteria: &SearchCriteria) {
        match criteria {
            SearchCriteria::All => self.raw(b"ALL"),
            SearchCriteria::Deleted => self.raw(b"DELETED"),
            SearchCriteria::Undeleted => self.raw(b"UNDELETED"),
            SearchCriteria::Sequence(set) => self.sequence(set),
        }
    }

    /// Terminates the command line and returns its chunks.
    pub fn finish(mut self) -> Vec<Vec<u8>> {
        self.current.extend_from_slice(b"\r\n");
        self.finished.push(self.current);
        self.finished
    }
}

/// ATOM-CHAR: any CHAR except atom-specials.
const fn is_atom_char(b: u8) -> bool {
    matches!(b, 0x21..=0x7E)
        && !matches!(b, b'(' | b')' | b'{' | b'%' | b'*' | b'"' | b'\\' | b']')
}

/// Bytes allowed inside a quoted string (7-bit, no NUL, CR or LF).
const fn is_quotable(b: u8) -> bool {
    matches!(b, 0x01..=0x7F) && b != b'\r' && b != b'\n'
}
