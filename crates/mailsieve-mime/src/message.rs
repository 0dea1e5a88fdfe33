//! Parsed RFC 822 message.

use chrono::{DateTime, FixedOffset};

use crate::encoding::decode_rfc2047;
use crate::error::{Error, Result};
use crate::header::Headers;

/// A message split into its header fields and raw body.
#[derive(Debug, Clone)]
pub struct Message {
    headers: Headers,
    body: Vec<u8>,
}

impl Message {
    /// Parses a complete message as returned by `FETCH RFC822`.
    ///
    /// The header block ends at the first empty line (CRLF or LF). Bytes in
    /// the header block that are not UTF-8 are replaced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Empty`] if the input is empty or whitespace only.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Err(Error::Empty);
        }

        let (head, body) = split_header_block(raw);
        let headers = Headers::parse(&String::from_utf8_lossy(head));

        Ok(Self {
            headers,
            body: body.to_vec(),
        })
    }

    /// All header fields.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Undecoded body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// First value of `name` exactly as it appeared (unfolded, not decoded).
    #[must_use]
    pub fn raw_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// `From`, with encoded words decoded.
    #[must_use]
    pub fn from(&self) -> Option<String> {
        self.decoded("from")
    }

    /// `Subject`, with encoded words decoded.
    #[must_use]
    pub fn subject(&self) -> Option<String> {
        self.decoded("subject")
    }

    /// `Date` as written.
    #[must_use]
    pub fn date(&self) -> Option<String> {
        self.decoded("date")
    }

    /// `Date` parsed as an RFC 2822 timestamp.
    ///
    /// Returns `None` if the field is missing or cannot be parsed.
    #[must_use]
    pub fn date_time(&self) -> Option<DateTime<FixedOffset>> {
        self.raw_header("date").and_then(parse_date)
    }

    fn decoded(&self, name: &str) -> Option<String> {
        let raw = self.raw_header(name)?;
        // A broken encoded word should not hide the rest of the field.
        Some(decode_rfc2047(raw).unwrap_or_else(|_| raw.to_string()))
    }
}

fn split_header_block(raw: &[u8]) -> (&[u8], &[u8]) {
    let crlf = raw.windows(4).position(|w| w == b"\r\n\r\n").map(|p| (p, 4));
    let lf = raw.windows(2).position(|w| w == b"\n\n").map(|p| (p, 2));

    let split = match (crlf, lf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    };

    match split {
        Some((pos, len)) => (&raw[..pos], &raw[pos + len..]),
        None => (raw, &[]),
    }
}

/// Parses an RFC 2822 date, tolerating a trailing comment such as `(UTC)`
/// and irregular whitespace. The day-of-week is dropped unchecked, since
/// bulk senders often get it wrong while the date itself is fine.
pub(crate) fn parse_date(value: &str) -> Option<DateTime<FixedOffset>> {
    let mut value = value.trim();
    if value.ends_with(')')
        && let Some(open) = value.rfind('(')
    {
        value = value[..open].trim_end();
    }
    if let Some((weekday, rest)) = value.split_once(',')
        && !weekday.is_empty()
        && weekday.bytes().all(|b| b.is_ascii_alphabetic())
    {
        value = rest;
    }
    let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ");
    DateTime::parse_from_rfc2822(&normalized).ok()
}
