//! Tokenizer for complete IMAP responses.
//!
//! Input is one response as delivered by the framed reader, i.e. a line
//! with any literals already inlined after their `{n}\r\n` headers.

#![allow(clippy::missing_errors_doc)]

mod token;

pub use token::Token;

use crate::{Error, Result};

/// Cursor over a response buffer.
pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer at the start of `input`.
    #[must_use]
    pub const fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Current byte offset.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Unconsumed input.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.input[self.pos..]
    }

    /// True once all input is consumed.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Next byte without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Consumes one byte.
    pub fn advance(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    /// Consumes up to `n` bytes.
    pub fn skip(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    /// Consumes the next byte if it equals `b`.
    pub fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Reads the next token.
    pub fn next_token(&mut self) -> Result<Token<'a>> {
        let Some(b) = self.peek() else {
            return Ok(Token::Eof);
        };

        let single = match b {
            b' ' => Some(Token::Space),
            b'(' => Some(Token::LParen),
            b')' => Some(Token::RParen),
            b'[' => Some(Token::LBracket),
            b']' => Some(Token::RBracket),
            b'*' => Some(Token::Asterisk),
            b'+' => Some(Token::Plus),
            _ => None,
        };
        if let Some(token) = single {
            self.pos += 1;
            return Ok(token);
        }

        match b {
            b'\r' => {
                if self.input.get(self.pos + 1) == Some(&b'\n') {
                    self.pos += 2;
                    Ok(Token::Crlf)
                } else {
                    Err(self.error("bare CR"))
                }
            }
            b'\n' => {
                // Tolerate servers that end lines with a bare LF.
                self.pos += 1;
                Ok(Token::Crlf)
            }
            b'"' => self.quoted(),
            b'{' => self.literal(),
            _ if is_atom_char(b) => Ok(self.atom()),
            _ => Err(self.error(&format!("unexpected byte {b:#04x}"))),
        }
    }

    fn quoted(&mut self) -> Result<Token<'a>> {
        self.pos += 1;
        let mut out = Vec::new();
        loop {
            match self.advance() {
                Some(b'"') => break,
                Some(b'\\') => match self.advance() {
                    Some(escaped) => out.push(escaped),
                    None => return Err(self.error("unterminated quoted string")),
                },
                Some(b'\r' | b'\n') | None => {
                    return Err(self.error("unterminated quoted string"));
                }
                Some(other) => out.push(other),
            }
        }
        Ok(Token::Quoted(String::from_utf8_lossy(&out).into_owned()))
    }

    fn literal(&mut self) -> Result<Token<'a>> {
        self.pos += 1;
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        let digits = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| self.error("invalid literal length"))?;
        let len: usize = digits
            .parse()
            .map_err(|_| self.error("invalid literal length"))?;

        // Servers never send LITERAL+, but be lenient.
        self.eat(b'+');
        if !self.eat(b'}') {
            return Err(self.error("expected '}' after literal length"));
        }
        if !(self.eat(b'\r') && self.eat(b'\n')) {
            return Err(self.error("expected CRLF after literal length"));
        }

        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.input.len())
            .ok_or_else(|| self.error("literal shorter than announced"))?;
        let data = self.input[self.pos..end].to_vec();
        self.pos = end;
        Ok(Token::Literal(data))
    }

    fn atom(&mut self) -> Token<'a> {
        let start = self.pos;
        // `\*` appears in PERMANENTFLAGS and is the only place `*` is part of a word.
        if self.peek() == Some(b'\\') && self.input.get(self.pos + 1) == Some(&b'*') {
            self.pos += 2;
        }
        while self.peek().is_some_and(is_atom_char) {
            self.pos += 1;
        }

        // Atom characters are ASCII, so this cannot fail.
        let word = std::str::from_utf8(&self.input[start..self.pos]).unwrap_or_default();

        if word.eq_ignore_ascii_case("NIL") {
            Token::Nil
        } else if word.bytes().all(|b| b.is_ascii_digit()) {
            word.parse().map_or(Token::Atom(word), Token::Number)
        } else {
            Token::Atom(word)
        }
    }

    /// Consumes the next token and checks that it matches `expected`.
    #[allow(clippy::needless_pass_by_value)]
    pub fn expect(&mut self, expected: Token<'_>) -> Result<()> {
        let token = self.next_token()?;
        if std::mem::discriminant(&token) == std::mem::discriminant(&expected) {
            Ok(())
        } else {
            Err(self.error(&format!("expected {expected:?}, got {token:?}")))
        }
    }

    /// Consumes a single space.
    pub fn expect_space(&mut self) -> Result<()> {
        self.expect(Token::Space)
    }

    /// Reads a number.
    pub fn read_number(&mut self) -> Result<u32> {
        match self.next_token()? {
            Token::Number(n) => Ok(n),
            token => Err(self.error(&format!("expected number, got {token:?}"))),
        }
    }

    /// Reads an atom.
    pub fn read_atom(&mut self) -> Result<&'a str> {
        match self.next_token()? {
            Token::Atom(s) => Ok(s),
            token => Err(self.error(&format!("expected atom, got {token:?}"))),
        }
    }

    /// Reads an nstring as raw bytes.
    pub fn read_nstring(&mut self) -> Result<Option<Vec<u8>>> {
        match self.next_token()? {
            Token::Nil => Ok(None),
            Token::Quoted(s) => Ok(Some(s.into_bytes())),
            Token::Literal(data) => Ok(Some(data)),
            token => Err(self.error(&format!("expected nstring, got {token:?}"))),
        }
    }

    /// Skips one value of any shape: a word, a string, a literal, or a
    /// parenthesized list (nested lists included).
    pub fn skip_value(&mut self) -> Result<()> {
        let mut depth = 0usize;
        loop {
            match self.next_token()? {
                Token::LParen => depth += 1,
                Token::RParen if depth > 0 => depth -= 1,
                Token::Crlf | Token::Eof | Token::RParen => {
                    return Err(self.error("truncated value"));
                }
                _ => {}
            }
            if depth == 0 {
                return Ok(());
            }
        }
    }

    /// Returns the rest of the line as text and consumes the line ending.
    pub fn rest_of_line(&mut self) -> String {
        let rest = self.remaining();
        let end = rest
            .iter()
            .position(|&b| b == b'\r' || b == b'\n')
            .unwrap_or(rest.len());
        let text = String::from_utf8_lossy(&rest[..end]).into_owned();
        self.pos += end;
        self.eat(b'\r');
        self.eat(b'\n');
        text
    }

    /// Builds a parse error at the current position.
    #[must_use]
    pub fn error(&self, message: &str) -> Error {
        Error::Parse {
            position: self.pos,
            message: message.to_string(),
        }
    }
}

/// True for bytes that may appear inside an atom in a server response.
///
/// Includes `\` so flags lex as one word, and excludes `[` so that section
/// specifiers and response codes are delimited.
#[must_use]
pub const fn is_atom_char(b: u8) -> bool {
    matches!(b, 0x21..=0x7E)
        && !matches!(b, b'(' | b')' | b'{' | b'"' | b'%' | b'*' | b'[' | b']')
}
