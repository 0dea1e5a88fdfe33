//! Everything that can end an IMAP exchange badly.

use thiserror::Error;

/// Failure reported by the client or by the server.
#[derive(Debug, Error)]
pub enum Error {
    /// Socket failure, including the server hanging up mid-response.
    #[error("connection failed: {0}")]
    Io(#[from] std::io::Error),

    /// Handshake or record-layer failure in rustls.
    #[error("tls: {0}")]
    Tls(#[from] rustls::Error),

    /// The configured host is not a name rustls can verify.
    #[error("invalid server name: {0}")]
    InvalidDnsName(#[from] rustls::pki_types::InvalidDnsNameError),

    /// A response did not follow the grammar.
    #[error("malformed response at byte {position}: {message}")]
    Parse {
        /// Offset where the lexer gave up.
        position: usize,
        /// Description of the problem.
        message: String,
    },

    /// Tagged `NO`: the command failed, the session is intact.
    #[error("server refused: {0}")]
    No(String),

    /// Tagged `BAD`: the server did not understand the command.
    #[error("server rejected command: {0}")]
    Bad(String),

    /// `BYE`: the server is closing the connection.
    #[error("server closed the session: {0}")]
    Bye(String),

    /// Anything else that does not fit the conversation.
    #[error("protocol violation: {0}")]
    Protocol(String),
}

impl Error {
    /// `NO` and `BAD` leave the connection usable; everything else does not
    /// promise that.
    #[must_use]
    pub const fn is_refusal(&self) -> bool {
        matches!(self, Self::No(_) | Self::Bad(_))
    }
}

/// Outcome of a client call.
pub type Result<T> = std::result::Result<T, Error>;
