//! Shared pieces of the response grammar.

use crate::parser::lexer::{Lexer, Token};
use crate::types::{Capability, Flag, Flags, ResponseCode, SeqNum, Uid};
use crate::Result;

/// Parses `[CODE args]` at the cursor.
pub fn parse_response_code(lexer: &mut Lexer<'_>) -> Result<ResponseCode> {
    lexer.expect(Token::LBracket)?;
    let name = lexer.read_atom()?.to_ascii_uppercase();

    let code = match name.as_str() {
        "ALERT" => ResponseCode::Alert,
        "READ-ONLY" => ResponseCode::ReadOnly,
        "READ-WRITE" => ResponseCode::ReadWrite,
        "TRYCREATE" => ResponseCode::TryCreate,
        "CAPABILITY" => ResponseCode::Capability(parse_capabilities(lexer)?),
        "PERMANENTFLAGS" => {
            lexer.expect_space()?;
            ResponseCode::PermanentFlags(parse_flag_list(lexer)?)
        }
        "UIDVALIDITY" => {
            lexer.expect_space()?;
            ResponseCode::UidValidity(lexer.read_number()?)
        }
        "UIDNEXT" => {
            lexer.expect_space()?;
            let n = lexer.read_number()?;
            ResponseCode::UidNext(Uid::new(n).ok_or_else(|| lexer.error("UIDNEXT 0"))?)
        }
        "UNSEEN" => {
            lexer.expect_space()?;
            let n = lexer.read_number()?;
            ResponseCode::Unseen(SeqNum::new(n).ok_or_else(|| lexer.error("UNSEEN 0"))?)
        }
        _ => {
            let rest = lexer.remaining();
            let end = rest.iter().position(|&b| b == b']').unwrap_or(rest.len());
            let args = String::from_utf8_lossy(&rest[..end]).trim().to_string();
            lexer.skip(end);
            ResponseCode::Other(name, (!args.is_empty()).then_some(args))
        }
    };

    lexer.expect(Token::RBracket)?;
    Ok(code)
}

/// Parses the space-separated capability atoms following `CAPABILITY`.
pub fn parse_capabilities(lexer: &mut Lexer<'_>) -> Result<Vec<Capability>> {
    let mut caps = Vec::new();
    while lexer.eat(b' ') {
        match lexer.next_token()? {
            Token::Atom(word) => caps.push(Capability::parse(word)),
            Token::Number(n) => caps.push(Capability::Other(n.to_string())),
            token => return Err(lexer.error(&format!("unexpected {token:?} in capabilities"))),
        }
    }
    Ok(caps)
}

/// Parses a parenthesized flag list.
pub fn parse_flag_list(lexer: &mut Lexer<'_>) -> Result<Flags> {
    lexer.expect(Token::LParen)?;
    let mut flags = Flags::new();
    loop {
        match lexer.next_token()? {
            Token::RParen => return Ok(flags),
            Token::Space => {}
            Token::Atom(word) => flags.insert(Flag::parse(word)),
            token => return Err(lexer.error(&format!("unexpected {token:?} in flag list"))),
        }
    }
}

/// Parses the message numbers of a SEARCH response.
pub fn parse_search(lexer: &mut Lexer<'_>) -> Result<Vec<SeqNum>> {
    let mut ids = Vec::new();
    while lexer.eat(b' ') {
        match lexer.next_token()? {
            Token::Number(n) => ids.extend(SeqNum::new(n)),
            // Trailing space before CRLF, seen on some servers.
            Token::Crlf | Token::Eof => break,
            // ESEARCH-style modifiers such as (MODSEQ 123) are not requested.
            token => return Err(lexer.error(&format!("unexpected {token:?} in SEARCH"))),
        }
    }
    Ok(ids)
}
