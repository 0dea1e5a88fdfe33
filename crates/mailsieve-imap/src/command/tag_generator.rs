//! Command tag generation.

/// Produces unique, increasing command tags: `A0000`, `A0001`, ...
#[derive(Debug, Clone)]
pub struct TagGenerator {
    prefix: char,
    counter: u32,
}

impl TagGenerator {
    /// Creates a generator with the given prefix.
    #[must_use]
    pub const fn new(prefix: char) -> Self {
        Self { prefix, counter: 0 }
    }

    /// Returns the next tag.
    ///
    /// The counter wraps after `u32::MAX` commands; tags only need to be
    /// unique among commands in flight, and this client has one at a time.
    pub fn next(&mut self) -> String {
        let n = self.counter;
        self.counter = self.counter.wrapping_add(1);
        format!("{}{n:04}", self.prefix)
    }

    /// Number of tags issued so far.
    #[must_use]
    pub const fn issued(&self) -> u32 {
        self.counter
    }
}

impl Default for TagGenerator {
    fn default() -> Self {
        Self::new('A')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_sequential_and_padded() {
        let mut tags = TagGenerator::default();
        assert_eq!(tags.next(), "A0000");
        assert_eq!(tags.next(), "A0001");
        assert_eq!(tags.issued(), 2);
    }

    #[test]
    fn custom_prefix() {
        let mut tags = TagGenerator::new('Z');
        assert_eq!(tags.next(), "Z0000");
    }

    #[test]
    fn wide_counters_are_not_truncated() {
        let mut tags = TagGenerator {
            prefix: 'A',
            counter: 123_456,
        };
        assert_eq!(tags.next(), "A123456");
    }
}
