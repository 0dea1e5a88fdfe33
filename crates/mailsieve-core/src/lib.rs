//! # mailsieve-core
//!
//! Keeps a persisted verdict per sender address and uses it to prune an
//! IMAP mailbox.
//!
//! - [`SenderRepository`]: the sender preference store (`SQLite`)
//! - [`TrustPolicy`]: classifies a sender as important or not
//! - [`MailboxClient`]: owns one IMAP session and runs the categorization
//!   and deletion passes, always logging out afterwards
//!
//! # Example
//!
//! ```ignore
//! use mailsieve_core::{DeletionScope, MailboxClient, MailboxConfig, Secret, SenderRepository};
//!
//! let store = SenderRepository::new("senders.db").await?;
//! let config = MailboxConfig::new("imap.example.com", "me@example.com", Secret::new(password));
//! let mut client = MailboxClient::new(config);
//!
//! let report = client.categorize_senders("INBOX", None, &store).await;
//! println!("{report}");
//!
//! let report = client
//!     .delete_unimportant("INBOX", DeletionScope::All, &store, &mut |_| {})
//!     .await;
//! println!("{report}");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod credentials;
mod error;
pub mod mailbox;
pub mod policy;
pub mod senders;

pub use config::{MailboxConfig, Secret};
pub use credentials::{CredentialError, CredentialResult};
pub use error::{Error, Result};
pub use mailsieve_imap::IMAPS_PORT;
pub use mailbox::{
    Connector, DeletionScope, MailboxClient, MailboxError, Operation, PassOutcome, PassReport,
    PassStats, TlsConnector,
};
pub use policy::{DEFAULT_TRUSTED_DOMAINS, TrustPolicy, extract_sender};
pub use senders::{Importance, ParseImportanceError, SenderRecord, SenderRepository};
