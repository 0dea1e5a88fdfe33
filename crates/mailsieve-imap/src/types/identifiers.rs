//! Identifiers that appear on the wire: command tags, message sequence
//! numbers and UIDs.

use std::fmt;
use std::num::NonZeroU32;

/// Correlates a command with the tagged completion the server sends back.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag(pub String);

impl Tag {
    /// Wraps `tag` without validating it.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Borrowed text of the tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declares a 1-based message number. Zero never names a message, so the
/// constructor refuses it.
macro_rules! message_number {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub NonZeroU32);

        impl $name {
            /// Returns `None` for 0.
            #[must_use]
            pub fn new(n: u32) -> Option<Self> {
                NonZeroU32::new(n).map(Self)
            }

            /// Raw number as sent on the wire.
            #[must_use]
            pub fn get(self) -> u32 {
                self.0.get()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

message_number! {
    /// Position of a message in the selected mailbox.
    ///
    /// Positions above an expunged message shift down by one, so a pruning
    /// pass flags everything it wants gone and expunges once at the end.
    SeqNum
}

message_number! {
    /// Identifier that stays with a message for the life of the mailbox.
    Uid
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn zero_names_no_message() {
        assert_eq!(SeqNum::new(0), None);
        assert_eq!(Uid::new(0), None);
    }

    #[test]
    fn numbers_display_and_sort_as_integers() {
        let mut ids: Vec<SeqNum> = [10, 2, 33].into_iter().filter_map(SeqNum::new).collect();
        ids.sort();
        let shown: Vec<String> = ids.iter().map(ToString::to_string).collect();
        assert_eq!(shown, ["2", "10", "33"]);
        assert_eq!(Uid::new(4242).unwrap().get(), 4242);
    }

    #[test]
    fn tag_prints_verbatim() {
        assert_eq!(format!("{} LOGOUT", Tag::new("A0003")), "A0003 LOGOUT");
    }
}
