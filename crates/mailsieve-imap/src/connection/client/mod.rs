//! Type-state IMAP client.
//!
//! A [`Client`] is parameterized by its protocol state so that commands
//! are only callable where RFC 3501 allows them:
//!
//! - [`NotAuthenticated`]: right after the greeting
//! - [`Authenticated`]: after LOGIN
//! - [`Selected`]: after SELECT, carrying the mailbox name and status

#![allow(clippy::missing_errors_doc)]

mod authenticated;
mod not_authenticated;
mod selected;
mod states;

use std::io;

use tokio::io::{AsyncRead, AsyncWrite};

pub use self::states::{Authenticated, NotAuthenticated, Selected};
use super::framed::{FramedStream, ResponseAccumulator, is_tagged_with};
use crate::command::{Command, TagGenerator};
use crate::parser::{Response, ResponseParser, UntaggedResponse};
use crate::types::{Capability, Status};
use crate::{Error, Result};

/// IMAP connection in protocol state `State`.
pub struct Client<S, State> {
    stream: FramedStream<S>,
    tag_gen: TagGenerator,
    capabilities: Vec<Capability>,
    state: State,
}

impl<S, State: std::fmt::Debug> std::fmt::Debug for Client<S, State> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("state", &self.state)
            .field("tag_gen", &self.tag_gen)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

/// A state transition the server refused.
///
/// The client comes back in the state the connection is actually in, so
/// it can still be logged out.
#[derive(Debug)]
pub struct Rejected<C> {
    /// The connection, still usable.
    pub client: C,
    /// Why the transition failed.
    pub error: Error,
}

impl<C> From<Rejected<C>> for Error {
    fn from(rejected: Rejected<C>) -> Self {
        rejected.error
    }
}

impl<S, State> Client<S, State>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Capabilities the server announced most recently.
    #[must_use]
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// Returns true if the server announced `cap`.
    #[must_use]
    pub fn has_capability(&self, cap: &Capability) -> bool {
        self.capabilities.contains(cap)
    }

    /// Sends NOOP.
    pub async fn noop(&mut self) -> Result<()> {
        self.execute(&Command::Noop).await.map(drop)
    }

    /// Sends CAPABILITY and refreshes the stored list.
    pub async fn capability(&mut self) -> Result<Vec<Capability>> {
        let responses = self.execute(&Command::Capability).await?;
        self.absorb_capabilities(&responses);
        Ok(self.capabilities.clone())
    }

    /// Sends LOGOUT and closes the transport.
    ///
    /// A server that hangs up right after its BYE is not treated as an error.
    pub async fn logout(mut self) -> Result<()> {
        let result = match self.execute(&Command::Logout).await {
            Err(Error::Bye(_)) => Ok(()),
            other => other.map(drop),
        };
        self.stream.shutdown().await;
        result
    }

    /// Moves the connection into another state.
    fn into_state<T>(self, state: T) -> Client<S, T> {
        Client {
            stream: self.stream,
            tag_gen: self.tag_gen,
            capabilities: self.capabilities,
            state,
        }
    }

    /// Sends `command` under a fresh tag and returns every response up to
    /// and including the tagged completion, which must be OK.
    async fn execute(&mut self, command: &Command) -> Result<Vec<Vec<u8>>> {
        let tag = self.tag_gen.next();
        tracing::debug!(tag = %tag, command = command.name(), "sending");
        self.send_command(command, &tag).await?;

        let mut accumulator = ResponseAccumulator::new(tag.as_str());
        let responses = match accumulator.read_until_tagged(&mut self.stream).await {
            Ok(responses) => responses,
            Err(Error::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(bye_reason(accumulator.responses())
                    .map_or(Error::Io(e), Error::Bye));
            }
            Err(e) => return Err(e),
        };

        check_tagged_ok(&responses, &tag)?;
        Ok(responses)
    }

    /// Writes the command chunk by chunk, waiting for a continuation
    /// request after each synchronizing literal header.
    async fn send_command(&mut self, command: &Command, tag: &str) -> Result<()> {
        let chunks = command.serialize_chunks(tag);
        let last = chunks.len().saturating_sub(1);

        for (i, chunk) in chunks.iter().enumerate() {
            self.stream.write_command(chunk).await?;
            if i == last {
                break;
            }
            loop {
                let raw = self.stream.read_response().await?;
                if is_tagged_with(&raw, tag) {
                    // The server refused the command before reading the literal.
                    check_tagged_ok(std::slice::from_ref(&raw), tag)?;
                    return Err(Error::Protocol(
                        "command completed before all literals were sent".to_string(),
                    ));
                }
                match ResponseParser::parse(&raw)? {
                    Response::Continuation { .. } => break,
                    Response::Untagged(UntaggedResponse::Bye { text, .. }) => {
                        return Err(Error::Bye(text));
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn absorb_capabilities(&mut self, responses: &[Vec<u8>]) {
        for raw in responses {
            if let Ok(Response::Untagged(UntaggedResponse::Capability(caps))) =
                ResponseParser::parse(raw)
            {
                self.capabilities = caps;
            }
        }
    }
}

/// Maps the tagged completion for `tag` to `Ok(())` or the matching error.
fn check_tagged_ok(responses: &[Vec<u8>], tag: &str) -> Result<()> {
    for raw in responses.iter().rev() {
        if let Ok(Response::Tagged {
            tag: resp_tag,
            status,
            text,
            ..
        }) = ResponseParser::parse(raw)
            && resp_tag.as_str() == tag
        {
            return match status {
                Status::Ok | Status::PreAuth => Ok(()),
                Status::No => Err(Error::No(text)),
                Status::Bad => Err(Error::Bad(text)),
                Status::Bye => Err(Error::Bye(text)),
            };
        }
    }
    Err(Error::Protocol("missing tagged response".to_string()))
}

fn bye_reason(responses: &[Vec<u8>]) -> Option<String> {
    responses.iter().find_map(|raw| match ResponseParser::parse(raw) {
        Ok(Response::Untagged(UntaggedResponse::Bye { text, .. })) => Some(text),
        _ => None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn tagged_status_mapping() {
        let ok = vec![b"* 1 EXISTS\r\n".to_vec(), b"A0001 OK done\r\n".to_vec()];
        assert!(check_tagged_ok(&ok, "A0001").is_ok());

        let no = vec![b"A0002 NO [TRYCREATE] missing\r\n".to_vec()];
        assert!(matches!(check_tagged_ok(&no, "A0002"), Err(Error::No(t)) if t == "missing"));

        let bad = vec![b"A0003 BAD syntax\r\n".to_vec()];
        assert!(matches!(check_tagged_ok(&bad, "A0003"), Err(Error::Bad(_))));

        assert!(matches!(check_tagged_ok(&ok, "A0009"), Err(Error::Protocol(_))));
    }

    #[test]
    fn bye_text_is_found() {
        let responses = vec![b"* BYE idle timeout\r\n".to_vec()];
        assert_eq!(bye_reason(&responses).as_deref(), Some("idle timeout"));
        assert_eq!(bye_reason(&[]), None);
    }
}
