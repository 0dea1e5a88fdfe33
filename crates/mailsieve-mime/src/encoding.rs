//! Transfer and header decoding.
//!
//! Supports Base64, Quoted-Printable and RFC 2047 encoded words.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};

use crate::error::{Error, Result};

/// Decodes Base64, ignoring embedded whitespace and missing padding.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    let cleaned: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    match STANDARD.decode(&cleaned) {
        Ok(bytes) => Ok(bytes),
        Err(err) => STANDARD_NO_PAD
            .decode(cleaned.trim_end_matches('='))
            .map_err(|_| err.into()),
    }
}

/// Decodes Quoted-Printable (RFC 2045) into raw bytes.
///
/// Soft line breaks (`=` at end of line, CRLF or LF) are removed.
///
/// # Errors
///
/// Returns an error on a truncated or non-hex escape sequence.
pub fn decode_quoted_printable(text: &str) -> Result<Vec<u8>> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'=' {
            out.push(bytes[i]);
            i += 1;
            continue;
        }

        let rest = &bytes[i + 1..];
        if rest.starts_with(b"\r\n") {
            i += 3;
        } else if rest.starts_with(b"\n") {
            i += 2;
        } else {
            match rest {
                [hi, lo, ..] if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
                    out.push((hex_value(*hi) << 4) | hex_value(*lo));
                    i += 3;
                }
                _ => {
                    return Err(Error::InvalidEncoding(format!(
                        "bad quoted-printable escape at byte {i}"
                    )));
                }
            }
        }
    }

    Ok(out)
}

const fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}

/// Decodes every RFC 2047 encoded word in a header value.
///
/// Text outside encoded words is kept as is. Whitespace between two
/// adjacent encoded words is dropped, as the RFC requires. Sequences that
/// merely look like the start of an encoded word are left untouched.
///
/// # Errors
///
/// Returns an error if a well-formed encoded word carries an unknown
/// encoding or an undecodable payload.
pub fn decode_rfc2047(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut after_word = false;

    while let Some(start) = rest.find("=?") {
        let (before, candidate) = rest.split_at(start);
        if let Some((word, consumed)) = EncodedWord::parse(candidate) {
            if !(after_word && before.chars().all(char::is_whitespace)) {
                out.push_str(before);
            }
            out.push_str(&word.decode()?);
            rest = &candidate[consumed..];
            after_word = true;
        } else {
            out.push_str(before);
            out.push_str("=?");
            rest = &candidate[2..];
            after_word = false;
        }
    }

    out.push_str(rest);
    Ok(out)
}

/// `=?charset?encoding?payload?=`
struct EncodedWord<'a> {
    charset: &'a str,
    encoding: char,
    payload: &'a str,
}

impl<'a> EncodedWord<'a> {
    /// Parses a word at the start of `s`, returning it and its length.
    fn parse(s: &'a str) -> Option<(Self, usize)> {
        let body = s.strip_prefix("=?")?;
        let charset_end = body.find('?')?;
        let charset = &body[..charset_end];

        let after = &body[charset_end + 1..];
        let mut chars = after.chars();
        let encoding = chars.next()?;
        if chars.next() != Some('?') {
            return None;
        }
        let payload_area = &after[encoding.len_utf8() + 1..];
        let payload_end = payload_area.find("?=")?;
        let payload = &payload_area[..payload_end];

        let valid = !charset.is_empty()
            && !charset.contains(char::is_whitespace)
            && !payload.contains(char::is_whitespace);
        if !valid {
            return None;
        }

        let consumed = 2 + charset_end + 1 + encoding.len_utf8() + 1 + payload_end + 2;
        Some((
            Self {
                charset,
                encoding,
                payload,
            },
            consumed,
        ))
    }

    fn decode(&self) -> Result<String> {
        let bytes = match self.encoding {
            'B' | 'b' => decode_base64(self.payload)?,
            'Q' | 'q' => decode_quoted_printable(&self.payload.replace('_', " "))?,
            other => {
                return Err(Error::InvalidEncoding(format!(
                    "unknown encoded-word encoding {other:?}"
                )));
            }
        };
        Ok(decode_charset(&bytes, self.charset))
    }
}

/// Converts bytes in `charset` to a string. Unknown charsets are treated
/// as UTF-8, lossily.
fn decode_charset(bytes: &[u8], charset: &str) -> String {
    // RFC 2231 allows a language suffix: `utf-8*en`.
    let charset = charset.split('*').next().unwrap_or(charset);
    if charset.eq_ignore_ascii_case("iso-8859-1") || charset.eq_ignore_ascii_case("latin1") {
        bytes.iter().map(|&b| char::from(b)).collect()
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}
