//! From a bare socket to a logged-in session.

use tokio::io::{AsyncRead, AsyncWrite};

use super::Client;
use super::states::{Authenticated, NotAuthenticated};
use crate::command::{Command, TagGenerator};
use crate::connection::framed::FramedStream;
use crate::parser::{Response, ResponseParser, UntaggedResponse};
use crate::types::{Capability, ResponseCode};
use crate::{Error, Result};

/// Checks that the first line from the server lets us proceed and pulls any
/// capability list out of it.
fn read_greeting(line: &[u8]) -> Result<Vec<Capability>> {
    let greeting = match ResponseParser::parse(line)? {
        Response::Untagged(greeting) => greeting,
        other => return Err(Error::Protocol(format!("expected a greeting, got {other:?}"))),
    };

    match greeting {
        UntaggedResponse::Ok { code, .. } | UntaggedResponse::PreAuth { code, .. } => {
            Ok(match code {
                Some(ResponseCode::Capability(caps)) => caps,
                _ => Vec::new(),
            })
        }
        UntaggedResponse::Bye { text, .. } => Err(Error::Bye(text)),
        other => Err(Error::Protocol(format!("expected a greeting, got {other:?}"))),
    }
}

impl<S> Client<S, NotAuthenticated>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Waits for the greeting on a new connection.
    ///
    /// A server that answers with BYE yields [`Error::Bye`].
    pub async fn from_stream(stream: S) -> Result<Self> {
        let mut stream = FramedStream::new(stream);
        let capabilities = read_greeting(&stream.read_response().await?)?;
        Ok(Self {
            stream,
            tag_gen: TagGenerator::default(),
            capabilities,
            state: NotAuthenticated,
        })
    }

    /// Sends LOGIN.
    ///
    /// Credentials that cannot travel as quoted strings are sent as
    /// synchronizing literals. Neither the command's `Debug` output nor the
    /// log line carries the password.
    pub async fn login(mut self, username: &str, password: &str) -> Result<Client<S, Authenticated>> {
        let login = Command::Login {
            username: username.to_owned(),
            password: password.to_owned(),
        };
        let replies = self.execute(&login).await?;
        self.absorb_capabilities(&replies);
        tracing::debug!(username, "authenticated");
        Ok(self.into_state(Authenticated))
    }
}
