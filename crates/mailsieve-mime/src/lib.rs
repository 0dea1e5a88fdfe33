//! # mailsieve-mime
//!
//! Just enough RFC 822 / MIME to read the headers of a fetched message:
//! who sent it, what it is about and when it was written.
//!
//! ```
//! use mailsieve_mime::Message;
//!
//! let raw = b"From: =?UTF-8?Q?Ren=C3=A9?= <rene@example.com>\r\n\
//!             Subject: Quarterly report\r\n\
//!             Date: Tue, 1 Jul 2003 10:52:37 +0200\r\n\
//!             \r\n\
//!             See attached.\r\n";
//!
//! let message = Message::parse(raw).unwrap();
//! assert_eq!(message.from().as_deref(), Some("René <rene@example.com>"));
//! assert_eq!(message.subject().as_deref(), Some("Quarterly report"));
//! assert!(message.date_time().is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
mod header;
mod message;

pub mod encoding;

pub use error::{Error, Result};
pub use header::Headers;
pub use message::Message;
