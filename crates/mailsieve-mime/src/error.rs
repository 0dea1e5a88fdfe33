//! Reasons a fetched message could not be read.

/// Failure while decoding a message header block.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Nothing but whitespace came back from the server.
    #[error("message is empty")]
    Empty,

    /// A quoted-printable escape or an encoded word is malformed.
    #[error("bad header encoding: {0}")]
    InvalidEncoding(String),

    /// The payload of a `B` encoded word is not Base64.
    #[error("bad base64 payload: {0}")]
    Base64Decode(#[from] base64::DecodeError),
}

/// Result of a decoding step.
pub type Result<T> = std::result::Result<T, Error>;
