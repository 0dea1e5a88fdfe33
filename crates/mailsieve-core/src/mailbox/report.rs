//! Outcome of a categorization or deletion pass.

use std::fmt;
use std::time::Duration;

/// Which pass produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Sender categorization.
    Categorize,
    /// Deletion of unimportant mail.
    Delete,
}

impl Operation {
    const fn noun(self) -> &'static str {
        match self {
            Self::Categorize => "Categorization of",
            Self::Delete => "Deletion from",
        }
    }
}

/// How a pass ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// The pass ran to the end.
    Completed,
    /// No session could be opened; nothing was done.
    NotConnected,
    /// The pass stopped early.
    Failed(String),
}

/// Counters collected while a pass runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Messages fetched or attempted.
    pub examined: usize,
    /// Messages that could not be fetched, parsed, looked up or flagged.
    pub skipped: usize,
    /// Messages whose sender was classified important.
    pub important: usize,
    /// Messages whose sender was classified unimportant.
    pub unimportant: usize,
    /// Messages flagged `\Deleted`.
    pub flagged: usize,
    /// Messages the server reported as expunged.
    pub expunged: usize,
    /// Messages left out of a most-recent ranking for lack of a date.
    pub undated: usize,
}

/// Summary of one pass over a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    /// Which pass ran.
    pub operation: Operation,
    /// Folder the pass worked on.
    pub folder: String,
    /// How it ended.
    pub outcome: PassOutcome,
    /// Counters.
    pub stats: PassStats,
    /// Wall-clock time including connect and disconnect.
    pub elapsed: Duration,
}

impl PassReport {
    /// True if the pass completed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome == PassOutcome::Completed
    }
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.elapsed.as_secs_f64();
        let stats = &self.stats;

        match (&self.outcome, self.operation) {
            (PassOutcome::Completed, Operation::Delete) => {
                write!(
                    f,
                    "Deleted {} messages from {} in {secs:.2}s",
                    stats.flagged, self.folder
                )?;
                if stats.skipped > 0 || stats.undated > 0 {
                    write!(f, " ({} skipped, {} undated)", stats.skipped, stats.undated)?;
                }
                Ok(())
            }
            (PassOutcome::Completed, Operation::Categorize) => write!(
                f,
                "Categorized {} messages from {} ({} important, {} unimportant, {} skipped) in {secs:.2}s",
                stats.important + stats.unimportant,
                self.folder,
                stats.important,
                stats.unimportant,
                stats.skipped
            ),
            (PassOutcome::NotConnected, op) => write!(
                f,
                "{} {} failed: not connected to the email server",
                op.noun(),
                self.folder
            ),
            (PassOutcome::Failed(reason), op) => {
                write!(f, "{} {} failed: {reason}", op.noun(), self.folder)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(operation: Operation, outcome: PassOutcome, stats: PassStats) -> PassReport {
        PassReport {
            operation,
            folder: "INBOX".to_string(),
            outcome,
            stats,
            elapsed: Duration::from_millis(1200),
        }
    }

    #[test]
    fn deletion_summary() {
        let stats = PassStats {
            flagged: 3,
            ..PassStats::default()
        };
        let r = report(Operation::Delete, PassOutcome::Completed, stats);
        assert!(r.is_success());
        assert_eq!(r.to_string(), "Deleted 3 messages from INBOX in 1.20s");
    }

    #[test]
    fn deletion_summary_mentions_leftovers() {
        let stats = PassStats {
            flagged: 1,
            skipped: 2,
            undated: 1,
            ..PassStats::default()
        };
        let r = report(Operation::Delete, PassOutcome::Completed, stats);
        assert_eq!(
            r.to_string(),
            "Deleted 1 messages from INBOX in 1.20s (2 skipped, 1 undated)"
        );
    }

    #[test]
    fn categorization_summary() {
        let stats = PassStats {
            examined: 6,
            important: 2,
            unimportant: 3,
            skipped: 1,
            ..PassStats::default()
        };
        let r = report(Operation::Categorize, PassOutcome::Completed, stats);
        assert_eq!(
            r.to_string(),
            "Categorized 5 messages from INBOX (2 important, 3 unimportant, 1 skipped) in 1.20s"
        );
    }

    #[test]
    fn failures() {
        let r = report(
            Operation::Delete,
            PassOutcome::Failed("EXPUNGE refused".into()),
            PassStats::default(),
        );
        assert!(!r.is_success());
        assert_eq!(r.to_string(), "Deletion from INBOX failed: EXPUNGE refused");

        let r = report(Operation::Categorize, PassOutcome::NotConnected, PassStats::default());
        assert_eq!(
            r.to_string(),
            "Categorization of INBOX failed: not connected to the email server"
        );
    }
}
