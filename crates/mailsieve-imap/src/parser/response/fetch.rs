//! FETCH response parsing.

use crate::parser::lexer::{Lexer, Token};
use crate::types::Uid;
use crate::Result;

use super::helpers::parse_flag_list;
use super::types::FetchItem;

/// Parses the parenthesized item list of `* n FETCH (...)`.
pub fn parse_fetch_items(lexer: &mut Lexer<'_>) -> Result<Vec<FetchItem>> {
    lexer.expect(Token::LParen)?;

    let mut items = Vec::new();
    loop {
        let name = match lexer.next_token()? {
            Token::RParen => break,
            Token::Space => continue,
            Token::Atom(name) => name.to_ascii_uppercase(),
            token => return Err(lexer.error(&format!("unexpected {token:?} in FETCH"))),
        };

        match name.as_str() {
            "FLAGS" => {
                lexer.expect_space()?;
                items.push(FetchItem::Flags(parse_flag_list(lexer)?));
            }
            "UID" => {
                lexer.expect_space()?;
                let n = lexer.read_number()?;
                let uid = Uid::new(n).ok_or_else(|| lexer.error("UID 0"))?;
                items.push(FetchItem::Uid(uid));
            }
            "RFC822.SIZE" => {
                lexer.expect_space()?;
                items.push(FetchItem::Rfc822Size(lexer.read_number()?));
            }
            "INTERNALDATE" => {
                lexer.expect_space()?;
                let date = lexer.read_nstring()?.unwrap_or_default();
                items.push(FetchItem::InternalDate(
                    String::from_utf8_lossy(&date).into_owned(),
                ));
            }
            "RFC822" | "RFC822.HEADER" | "RFC822.TEXT" | "BODY" | "BINARY" => {
                let name = format!("{name}{}", read_section(lexer)?);
                lexer.expect_space()?;
                let data = lexer.read_nstring()?;
                items.push(FetchItem::Body { name, data });
            }
            _ => {
                // ENVELOPE, BODYSTRUCTURE, MODSEQ and friends are never requested.
                tracing::trace!(item = %name, "skipping FETCH item");
                lexer.expect_space()?;
                lexer.skip_value()?;
            }
        }
    }

    Ok(items)
}

/// Reads an optional `[section]<origin>` suffix verbatim.
///
/// Section text may contain spaces and parentheses
/// (`HEADER.FIELDS (FROM DATE)`), so it is copied byte by byte.
fn read_section(lexer: &mut Lexer<'_>) -> Result<String> {
    let mut out = String::new();
    for (open, close) in [(b'[', b']'), (b'<', b'>')] {
        if lexer.peek() != Some(open) {
            continue;
        }
        let rest = lexer.remaining();
        let end = rest
            .iter()
            .position(|&b| b == close)
            .ok_or_else(|| lexer.error("unterminated section"))?;
        out.push_str(&String::from_utf8_lossy(&rest[..=end]));
        lexer.skip(end + 1);
    }
    Ok(out)
}
