//! Byte transports under the framed reader.
//!
//! Production traffic always goes over implicit TLS on port 993. The plain
//! variant exists so integration tests can point the client at a local
//! listener.

#![allow(clippy::missing_errors_doc)]

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use rustls::pki_types::ServerName;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;

use crate::Result;

/// Socket to an IMAP server.
pub enum ImapStream {
    /// Cleartext socket, local testing only.
    Plain(TcpStream),
    /// Implicit TLS. Boxed because the session state is large.
    Tls(Box<TlsStream<TcpStream>>),
}

/// Forwards a poll call to whichever socket is inside.
macro_rules! forward {
    ($this:expr, |$io:ident| $call:expr) => {
        match $this.get_mut() {
            ImapStream::Plain(inner) => {
                let $io = Pin::new(inner);
                $call
            }
            ImapStream::Tls(inner) => {
                let $io = Pin::new(inner.as_mut());
                $call
            }
        }
    };
}

impl ImapStream {
    /// Whether traffic on this socket is encrypted.
    #[must_use]
    pub const fn is_tls(&self) -> bool {
        matches!(self, Self::Tls(_))
    }
}

impl std::fmt::Debug for ImapStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.is_tls() { "tls" } else { "plain" };
        f.debug_tuple("ImapStream").field(&kind).finish()
    }
}

impl AsyncRead for ImapStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        forward!(self, |io| io.poll_read(cx, buf))
    }
}

impl AsyncWrite for ImapStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        forward!(self, |io| io.poll_write(cx, buf))
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        forward!(self, |io| io.poll_flush(cx))
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        forward!(self, |io| io.poll_shutdown(cx))
    }
}

/// TLS client setup verifying servers against the bundled webpki roots.
#[must_use]
pub fn create_tls_connector() -> TlsConnector {
    let mut roots = rustls::RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    TlsConnector::from(Arc::new(
        rustls::ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth(),
    ))
}

/// Dials `host:port` and negotiates TLS before any IMAP traffic.
///
/// The host name is validated first, so a malformed name fails without
/// touching the network.
pub async fn connect_tls(host: &str, port: u16) -> Result<ImapStream> {
    let name = ServerName::try_from(host.to_owned())?;
    let socket = TcpStream::connect((host, port)).await?;
    tracing::debug!(host, port, "socket open, negotiating TLS");
    let session = create_tls_connector().connect(name, socket).await?;
    Ok(ImapStream::Tls(Box::new(session)))
}

/// Dials `host:port` without encryption.
pub async fn connect_plain(host: &str, port: u16) -> Result<ImapStream> {
    TcpStream::connect((host, port))
        .await
        .map(ImapStream::Plain)
        .map_err(Into::into)
}
