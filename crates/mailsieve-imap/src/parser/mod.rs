//! Sans-I/O parser for IMAP server responses.
//!
//! The [`Lexer`] turns a framed response into tokens and the
//! [`ResponseParser`] builds a [`Response`] from them.
//!
//! ```
//! use mailsieve_imap::parser::{Response, ResponseParser, UntaggedResponse};
//!
//! let response = ResponseParser::parse(b"* SEARCH 2 3 5\r\n").unwrap();
//! match response {
//!     Response::Untagged(UntaggedResponse::Search(ids)) => assert_eq!(ids.len(), 3),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

pub mod lexer;
pub mod response;

pub use lexer::{Lexer, Token};
pub use response::{FetchItem, Response, ResponseParser, UntaggedResponse};
