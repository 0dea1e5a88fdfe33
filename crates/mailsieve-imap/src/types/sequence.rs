//! Message sets for FETCH and STORE.

use super::SeqNum;

/// A set of message sequence numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceSet {
    /// A single message.
    Single(SeqNum),
    /// An inclusive range.
    Range(SeqNum, SeqNum),
    /// Every message (`1:*`).
    All,
    /// Several of the above joined by commas.
    Set(Vec<Self>),
}

impl SequenceSet {
    /// Builds the most compact set covering `ids`, collapsing consecutive
    /// runs into ranges. Returns `None` for an empty slice.
    #[must_use]
    pub fn from_ids(ids: &[SeqNum]) -> Option<Self> {
        let mut sorted = ids.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut parts = Vec::new();
        let mut iter = sorted.into_iter();
        let first = iter.next()?;
        let (mut start, mut end) = (first, first);

        for id in iter {
            if id.get() == end.get() + 1 {
                end = id;
            } else {
                parts.push(Self::span(start, end));
                start = id;
                end = id;
            }
        }
        parts.push(Self::span(start, end));

        Some(if parts.len() == 1 {
            parts.remove(0)
        } else {
            Self::Set(parts)
        })
    }

    fn span(start: SeqNum, end: SeqNum) -> Self {
        if start == end {
            Self::Single(start)
        } else {
            Self::Range(start, end)
        }
    }
}

impl std::fmt::Display for SequenceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(n) => write!(f, "{n}"),
            Self::Range(start, end) => write!(f, "{start}:{end}"),
            Self::All => f.write_str("1:*"),
            Self::Set(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ids(values: &[u32]) -> Vec<SeqNum> {
        values.iter().map(|&v| SeqNum::new(v).unwrap()).collect()
    }

    #[test]
    fn empty_input_has_no_set() {
        assert!(SequenceSet::from_ids(&[]).is_none());
    }

    #[test]
    fn single_id() {
        let set = SequenceSet::from_ids(&ids(&[4])).unwrap();
        assert_eq!(set.to_string(), "4");
    }

    #[test]
    fn consecutive_ids_collapse_into_ranges() {
        let set = SequenceSet::from_ids(&ids(&[7, 1, 2, 3, 9, 8, 12])).unwrap();
        assert_eq!(set.to_string(), "1:3,7:9,12");
    }

    #[test]
    fn duplicates_are_ignored() {
        let set = SequenceSet::from_ids(&ids(&[5, 5, 6])).unwrap();
        assert_eq!(set.to_string(), "5:6");
    }

    #[test]
    fn all_messages() {
        assert_eq!(SequenceSet::All.to_string(), "1:*");
    }

    fn expand(set: &str) -> Vec<u32> {
        set.split(',')
            .flat_map(|part| match part.split_once(':') {
                Some((start, end)) => (start.parse().unwrap()..=end.parse().unwrap()).collect(),
                None => vec![part.parse().unwrap()],
            })
            .collect()
    }

    proptest::proptest! {
        #[test]
        fn compact_set_covers_exactly_the_input(values in proptest::collection::vec(1u32..500, 1..60)) {
            let set = SequenceSet::from_ids(&ids(&values)).unwrap();
            let mut expected = values.clone();
            expected.sort_unstable();
            expected.dedup();
            proptest::prop_assert_eq!(expand(&set.to_string()), expected);
        }
    }
}
