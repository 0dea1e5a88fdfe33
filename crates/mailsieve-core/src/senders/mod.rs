//! Sender preference store.
//!
//! One row per sender address with an `important` flag. A sender that has
//! no row is unimportant, which is what makes a never-seen sender eligible
//! for deletion.
//!
//! # Example
//!
//! ```ignore
//! use mailsieve_core::senders::SenderRepository;
//!
//! let repo = SenderRepository::new("senders.db").await?;
//! let (record, created) = repo.set_importance("boss@corp.example", true).await?;
//! assert!(repo.is_important("boss@corp.example").await?);
//!
//! // Operator purge
//! let removed = repo.delete_where(false).await?;
//! ```

mod model;
mod repository;

pub use model::{Importance, ParseImportanceError, SenderRecord};
pub use repository::SenderRepository;
