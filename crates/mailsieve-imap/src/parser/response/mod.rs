//! IMAP response parser.

#![allow(clippy::missing_errors_doc)]

mod fetch;
mod helpers;
mod types;

pub use types::{FetchItem, UntaggedResponse};

use crate::parser::lexer::{Lexer, Token};
use crate::types::{ResponseCode, SeqNum, Status, Tag};
use crate::{Error, Result};

use helpers::{parse_capabilities, parse_flag_list, parse_response_code, parse_search};

/// A parsed IMAP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Command completion.
    Tagged {
        /// The command tag.
        tag: Tag,
        /// Completion status.
        status: Status,
        /// Optional response code.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: String,
    },
    /// Server data.
    Untagged(UntaggedResponse),
    /// Continuation request (`+ ...`).
    Continuation {
        /// Text following the `+`.
        text: String,
    },
}

impl Response {
    /// Returns true for `* BYE`.
    #[must_use]
    pub const fn is_bye(&self) -> bool {
        matches!(self, Self::Untagged(UntaggedResponse::Bye { .. }))
    }
}

/// Stateless response parser.
pub struct ResponseParser;

impl ResponseParser {
    /// Parses one complete response, literals included.
    pub fn parse(input: &[u8]) -> Result<Response> {
        let mut lexer = Lexer::new(input);

        match lexer.next_token()? {
            Token::Asterisk => Self::parse_untagged(&mut lexer),
            Token::Plus => {
                lexer.eat(b' ');
                Ok(Response::Continuation {
                    text: lexer.rest_of_line(),
                })
            }
            Token::Atom(tag) => Self::parse_tagged(&mut lexer, tag),
            token => Err(Error::Parse {
                position: 0,
                message: format!("expected *, + or tag, got {token:?}"),
            }),
        }
    }

    fn parse_tagged(lexer: &mut Lexer<'_>, tag: &str) -> Result<Response> {
        lexer.expect_space()?;
        let word = lexer.read_atom()?;
        let status = Status::parse(word)
            .filter(|s| matches!(s, Status::Ok | Status::No | Status::Bad))
            .ok_or_else(|| lexer.error(&format!("invalid tagged status {word}")))?;
        let (code, text) = Self::parse_resp_text(lexer)?;

        Ok(Response::Tagged {
            tag: Tag::new(tag),
            status,
            code,
            text,
        })
    }

    fn parse_untagged(lexer: &mut Lexer<'_>) -> Result<Response> {
        lexer.expect_space()?;

        let untagged = match lexer.next_token()? {
            Token::Atom(word) => {
                let upper = word.to_ascii_uppercase();
                match upper.as_str() {
                    "OK" => {
                        let (code, text) = Self::parse_resp_text(lexer)?;
                        UntaggedResponse::Ok { code, text }
                    }
                    "NO" => {
                        let (code, text) = Self::parse_resp_text(lexer)?;
                        UntaggedResponse::No { code, text }
                    }
                    "BAD" => {
                        let (code, text) = Self::parse_resp_text(lexer)?;
                        UntaggedResponse::Bad { code, text }
                    }
                    "PREAUTH" => {
                        let (code, text) = Self::parse_resp_text(lexer)?;
                        UntaggedResponse::PreAuth { code, text }
                    }
                    "BYE" => {
                        let (code, text) = Self::parse_resp_text(lexer)?;
                        UntaggedResponse::Bye { code, text }
                    }
                    "CAPABILITY" => UntaggedResponse::Capability(parse_capabilities(lexer)?),
                    "FLAGS" => {
                        lexer.expect_space()?;
                        UntaggedResponse::Flags(parse_flag_list(lexer)?)
                    }
                    "SEARCH" => UntaggedResponse::Search(parse_search(lexer)?),
                    _ => return Err(lexer.error(&format!("unknown untagged response {word}"))),
                }
            }
            Token::Number(n) => {
                lexer.expect_space()?;
                let keyword = lexer.read_atom()?.to_ascii_uppercase();
                match keyword.as_str() {
                    "EXISTS" => UntaggedResponse::Exists(n),
                    "RECENT" => UntaggedResponse::Recent(n),
                    "EXPUNGE" => UntaggedResponse::Expunge(
                        SeqNum::new(n).ok_or_else(|| lexer.error("EXPUNGE 0"))?,
                    ),
                    "FETCH" => {
                        let seq = SeqNum::new(n).ok_or_else(|| lexer.error("FETCH 0"))?;
                        lexer.expect_space()?;
                        let items = fetch::parse_fetch_items(lexer)?;
                        UntaggedResponse::Fetch { seq, items }
                    }
                    _ => return Err(lexer.error(&format!("unknown message data {keyword}"))),
                }
            }
            token => return Err(lexer.error(&format!("unexpected {token:?} after *"))),
        };

        Ok(Response::Untagged(untagged))
    }

    /// Parses `[SP] ["[" code "]" SP] text`.
    fn parse_resp_text(lexer: &mut Lexer<'_>) -> Result<(Option<ResponseCode>, String)> {
        lexer.eat(b' ');
        let code = if lexer.peek() == Some(b'[') {
            let code = parse_response_code(lexer)?;
            lexer.eat(b' ');
            Some(code)
        } else {
            None
        };
        Ok((code, lexer.rest_of_line()))
    }
}
