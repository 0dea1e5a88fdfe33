//! Sender store data models.

use std::fmt;
use std::str::FromStr;

/// Verdict for a sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Importance {
    /// Mail from this sender is kept.
    Important,
    /// Mail from this sender may be deleted.
    #[default]
    Unimportant,
}

impl Importance {
    /// Operator-facing name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Important => "important",
            Self::Unimportant => "unimportant",
        }
    }

    /// Value of the stored flag.
    #[must_use]
    pub const fn is_important(self) -> bool {
        matches!(self, Self::Important)
    }
}

impl From<bool> for Importance {
    fn from(important: bool) -> Self {
        if important {
            Self::Important
        } else {
            Self::Unimportant
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an [`Importance`] from operator input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid status {0:?}, expected \"important\" or \"unimportant\"")]
pub struct ParseImportanceError(String);

impl FromStr for Importance {
    type Err = ParseImportanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "important" => Ok(Self::Important),
            "unimportant" => Ok(Self::Unimportant),
            _ => Err(ParseImportanceError(s.to_string())),
        }
    }
}

/// A stored sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderRecord {
    /// Row ID.
    pub id: i64,
    /// Address exactly as it was extracted or entered.
    pub email: String,
    /// Whether the sender's mail is kept.
    pub important: bool,
    /// When the sender was first recorded (`SQLite` timestamp).
    pub created_at: String,
    /// When the flag was last written.
    pub updated_at: String,
}

impl SenderRecord {
    /// The stored flag as an [`Importance`].
    #[must_use]
    pub const fn importance(&self) -> Importance {
        if self.important {
            Importance::Important
        } else {
            Importance::Unimportant
        }
    }
}
