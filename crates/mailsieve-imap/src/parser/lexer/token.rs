//! Lexical tokens.

/// A token of an IMAP server response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Bare word, including flags such as `\Seen`.
    Atom(&'a str),
    /// Unsigned 32-bit number.
    Number(u32),
    /// Quoted string with escapes resolved.
    Quoted(String),
    /// Literal payload (`{n}\r\n` followed by n bytes).
    Literal(Vec<u8>),
    /// `NIL`
    Nil,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// A single space.
    Space,
    /// `*`, the untagged prefix.
    Asterisk,
    /// `+`, the continuation prefix.
    Plus,
    /// Line terminator.
    Crlf,
    /// End of input.
    Eof,
}
