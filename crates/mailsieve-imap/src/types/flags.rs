//! System flags and keywords attached to messages.

/// One flag from a FLAGS list or a STORE command.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Flag {
    /// `\Seen`
    Seen,
    /// `\Answered`
    Answered,
    /// `\Flagged`
    Flagged,
    /// `\Deleted`. The message goes away at the next EXPUNGE or CLOSE.
    Deleted,
    /// `\Draft`
    Draft,
    /// `\Recent`
    Recent,
    /// Keyword or unknown system flag, spelled as the server sent it.
    Keyword(String),
}

const SYSTEM_FLAGS: [(Flag, &str); 6] = [
    (Flag::Seen, "\\Seen"),
    (Flag::Answered, "\\Answered"),
    (Flag::Flagged, "\\Flagged"),
    (Flag::Deleted, "\\Deleted"),
    (Flag::Draft, "\\Draft"),
    (Flag::Recent, "\\Recent"),
];

impl Flag {
    /// Reads a flag atom. System flag names are case-insensitive.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        SYSTEM_FLAGS
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(s))
            .map_or_else(|| Self::Keyword(s.to_owned()), |(flag, _)| flag.clone())
    }

    /// Spelling used when sending the flag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        if let Self::Keyword(word) = self {
            return word;
        }
        SYSTEM_FLAGS
            .iter()
            .find(|(flag, _)| flag == self)
            .map_or("", |(_, name)| *name)
    }
}

impl std::fmt::Display for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flags of one message, first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags(Vec<Flag>);

impl Flags {
    /// No flags.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `flag` unless it is already present.
    pub fn insert(&mut self, flag: Flag) {
        if !self.contains(&flag) {
            self.0.push(flag);
        }
    }

    /// Whether `flag` is set.
    #[must_use]
    pub fn contains(&self, flag: &Flag) -> bool {
        self.0.iter().any(|f| f == flag)
    }

    /// Whether the message is waiting for an expunge.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.contains(&Flag::Deleted)
    }

    /// How many distinct flags are set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no flag is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Flags in the order the server listed them.
    pub fn iter(&self) -> std::slice::Iter<'_, Flag> {
        self.0.iter()
    }
}

impl Extend<Flag> for Flags {
    fn extend<I: IntoIterator<Item = Flag>>(&mut self, iter: I) {
        iter.into_iter().for_each(|flag| self.insert(flag));
    }
}

impl FromIterator<Flag> for Flags {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        let mut flags = Self::new();
        flags.extend(iter);
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_flag_names_ignore_case() {
        for raw in ["\\Deleted", "\\DELETED", "\\deleted"] {
            assert_eq!(Flag::parse(raw), Flag::Deleted);
        }
        assert_eq!(Flag::parse("\\seen").to_string(), "\\Seen");
    }

    #[test]
    fn unknown_names_become_keywords() {
        let junk = Flag::parse("$Junk");
        assert_eq!(junk, Flag::Keyword("$Junk".into()));
        assert_eq!(junk.as_str(), "$Junk");
        assert_eq!(Flag::parse("\\Important").as_str(), "\\Important");
    }

    #[test]
    fn repeated_flags_collapse() {
        let flags: Flags = [Flag::Seen, Flag::Deleted, Flag::Seen].into_iter().collect();
        assert_eq!(flags.len(), 2);
        assert!(flags.is_deleted());
        assert_eq!(flags.iter().next(), Some(&Flag::Seen));
    }
}
