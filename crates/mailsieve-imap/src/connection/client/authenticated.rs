//! Mailbox selection.

use tokio::io::{AsyncRead, AsyncWrite};

use super::states::{Authenticated, Selected};
use super::{Client, Rejected};
use crate::command::Command;
use crate::parser::{Response, ResponseParser, UntaggedResponse};
use crate::types::{MailboxStatus, ResponseCode, Status};
use crate::Result;

/// Result of a SELECT that either opens the mailbox or hands the
/// connection back in the authenticated state.
pub type SelectResult<S, From> =
    std::result::Result<(Client<S, Selected>, MailboxStatus), Rejected<Client<S, From>>>;

impl<S> Client<S, Authenticated>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Opens `mailbox` read-write.
    pub async fn select(mut self, mailbox: &str) -> SelectResult<S, Authenticated> {
        match self.run_select(mailbox).await {
            Ok(status) => {
                let selected = Selected::new(mailbox, status.clone());
                Ok((self.into_state(selected), status))
            }
            Err(error) => Err(Rejected { client: self, error }),
        }
    }
}

impl<S, State> Client<S, State>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub(super) async fn run_select(&mut self, mailbox: &str) -> Result<MailboxStatus> {
        let command = Command::Select {
            mailbox: mailbox.to_string(),
        };
        let responses = self.execute(&command).await?;
        Ok(parse_mailbox_status(&responses))
    }
}

/// Folds the untagged SELECT data into a [`MailboxStatus`].
pub(super) fn parse_mailbox_status(responses: &[Vec<u8>]) -> MailboxStatus {
    let mut status = MailboxStatus::default();

    for raw in responses {
        let code = match ResponseParser::parse(raw) {
            Ok(Response::Untagged(untagged)) => match untagged {
                UntaggedResponse::Exists(n) => {
                    status.exists = n;
                    continue;
                }
                UntaggedResponse::Recent(n) => {
                    status.recent = n;
                    continue;
                }
                UntaggedResponse::Flags(flags) => {
                    status.flags = flags;
                    continue;
                }
                UntaggedResponse::Ok { code, .. } => code,
                _ => continue,
            },
            Ok(Response::Tagged {
                status: Status::Ok,
                code,
                ..
            }) => code,
            _ => continue,
        };

        match code {
            Some(ResponseCode::Unseen(n)) => status.unseen = Some(n),
            Some(ResponseCode::UidValidity(v)) => status.uid_validity = Some(v),
            Some(ResponseCode::UidNext(u)) => status.uid_next = Some(u),
            Some(ResponseCode::PermanentFlags(flags)) => status.permanent_flags = flags,
            Some(ResponseCode::ReadOnly) => status.read_only = true,
            Some(ResponseCode::ReadWrite) => status.read_only = false,
            _ => {}
        }
    }

    status
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Flag, SeqNum, Uid};

    #[test]
    fn select_responses_fold_into_status() {
        let responses: Vec<Vec<u8>> = [
            &b"* 172 EXISTS\r\n"[..],
            b"* 1 RECENT\r\n",
            b"* OK [UNSEEN 12] Message 12 is first unseen\r\n",
            b"* OK [UIDVALIDITY 3857529045] UIDs valid\r\n",
            b"* OK [UIDNEXT 4392] Predicted next UID\r\n",
            b"* FLAGS (\\Answered \\Flagged \\Deleted \\Seen \\Draft)\r\n",
            b"* OK [PERMANENTFLAGS (\\Deleted \\Seen \\*)] Limited\r\n",
            b"A0002 OK [READ-WRITE] SELECT completed\r\n",
        ]
        .iter()
        .map(|r| r.to_vec())
        .collect();

        let status = parse_mailbox_status(&responses);
        assert_eq!(status.exists, 172);
        assert_eq!(status.recent, 1);
        assert_eq!(status.unseen, SeqNum::new(12));
        assert_eq!(status.uid_validity, Some(3_857_529_045));
        assert_eq!(status.uid_next, Uid::new(4392));
        assert_eq!(status.flags.len(), 5);
        assert!(status.permanent_flags.contains(&Flag::Deleted));
        assert!(!status.read_only);
    }

    #[test]
    fn read_only_select() {
        let responses = vec![
            b"* 0 EXISTS\r\n".to_vec(),
            b"A0001 OK [READ-ONLY] done\r\n".to_vec(),
        ];
        let status = parse_mailbox_status(&responses);
        assert!(status.is_empty());
        assert!(status.read_only);
    }
}
