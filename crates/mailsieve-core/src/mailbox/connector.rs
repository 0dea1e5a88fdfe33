//! Transport factory for [`MailboxClient`](super::MailboxClient).

use std::future::Future;

use mailsieve_imap::ImapStream;
use tokio::io::{AsyncRead, AsyncWrite};

/// Opens the byte stream an IMAP session runs over.
pub trait Connector {
    /// Stream type produced by this connector.
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    /// Connects to `host:port`.
    fn connect(
        &self,
        host: &str,
        port: u16,
    ) -> impl Future<Output = mailsieve_imap::Result<Self::Stream>> + Send;
}

/// Implicit TLS with the webpki root store.
#[derive(Debug, Clone, Copy, Default)]
pub struct TlsConnector;

impl Connector for TlsConnector {
    type Stream = ImapStream;

    async fn connect(&self, host: &str, port: u16) -> mailsieve_imap::Result<ImapStream> {
        mailsieve_imap::connection::connect_tls(host, port).await
    }
}
