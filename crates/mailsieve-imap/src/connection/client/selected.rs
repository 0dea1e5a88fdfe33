//! Operations on the selected mailbox.

use tokio::io::{AsyncRead, AsyncWrite};

use super::authenticated::SelectResult;
use super::states::{Authenticated, Selected};
use super::{Client, Rejected};
use crate::command::{Command, FetchItems, SearchCriteria, StoreAction};
use crate::parser::{FetchItem, Response, ResponseParser, UntaggedResponse};
use crate::types::{SeqNum, SequenceSet};
use crate::Result;

impl<S> Client<S, Selected>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Name of the selected mailbox.
    #[must_use]
    pub fn mailbox(&self) -> &str {
        self.state.mailbox()
    }

    /// Current view of the mailbox status.
    #[must_use]
    pub const fn status(&self) -> &crate::types::MailboxStatus {
        self.state.status()
    }

    /// Selects another mailbox.
    ///
    /// A failed SELECT leaves no mailbox selected (RFC 3501 §6.3.1), so a
    /// refusal hands back an authenticated client.
    pub async fn select(mut self, mailbox: &str) -> SelectResult<S, Authenticated> {
        match self.run_select(mailbox).await {
            Ok(status) => {
                let selected = Selected::new(mailbox, status.clone());
                Ok((self.into_state(selected), status))
            }
            Err(error) => Err(Rejected {
                client: self.into_state(Authenticated),
                error,
            }),
        }
    }

    /// Runs SEARCH and returns matching sequence numbers in server order.
    pub async fn search(&mut self, criteria: &SearchCriteria) -> Result<Vec<SeqNum>> {
        let command = Command::Search {
            criteria: criteria.clone(),
        };
        let responses = self.execute(&command).await?;
        self.track_untagged(&responses);

        let mut ids = Vec::new();
        for raw in &responses {
            if let Ok(Response::Untagged(UntaggedResponse::Search(found))) =
                ResponseParser::parse(raw)
            {
                ids.extend(found);
            }
        }
        Ok(ids)
    }

    /// Runs FETCH and returns the data items per message.
    ///
    /// Unsolicited FETCH responses for other messages are included as the
    /// server sent them.
    pub async fn fetch(
        &mut self,
        sequence: &SequenceSet,
        items: FetchItems,
    ) -> Result<Vec<(SeqNum, Vec<FetchItem>)>> {
        let command = Command::Fetch {
            sequence: sequence.clone(),
            items,
        };
        let responses = self.execute(&command).await?;
        self.track_untagged(&responses);

        let mut fetched = Vec::new();
        for raw in &responses {
            match ResponseParser::parse(raw) {
                Ok(Response::Untagged(UntaggedResponse::Fetch { seq, items })) => {
                    fetched.push((seq, items));
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "skipping unparsable FETCH response"),
            }
        }
        Ok(fetched)
    }

    /// Changes flags with STORE .SILENT.
    pub async fn store(&mut self, sequence: &SequenceSet, action: StoreAction) -> Result<()> {
        let command = Command::Store {
            sequence: sequence.clone(),
            action,
            silent: true,
        };
        let responses = self.execute(&command).await?;
        self.track_untagged(&responses);
        Ok(())
    }

    /// Permanently removes `\Deleted` messages and returns the reported
    /// sequence numbers in the order the server sent them.
    pub async fn expunge(&mut self) -> Result<Vec<SeqNum>> {
        let responses = self.execute(&Command::Expunge).await?;
        self.track_untagged(&responses);

        Ok(responses
            .iter()
            .filter_map(|raw| match ResponseParser::parse(raw) {
                Ok(Response::Untagged(UntaggedResponse::Expunge(seq))) => Some(seq),
                _ => None,
            })
            .collect())
    }

    /// Closes the mailbox, which also expunges it, and returns to the
    /// authenticated state.
    pub async fn close(
        mut self,
    ) -> std::result::Result<Client<S, Authenticated>, Rejected<Client<S, Authenticated>>> {
        match self.execute(&Command::Close).await {
            Ok(_) => Ok(self.into_state(Authenticated)),
            Err(error) => Err(Rejected {
                client: self.into_state(Authenticated),
                error,
            }),
        }
    }

    /// Applies EXISTS and EXPUNGE updates to the cached status.
    fn track_untagged(&mut self, responses: &[Vec<u8>]) {
        let status = self.state.status_mut();
        for raw in responses {
            match ResponseParser::parse(raw) {
                Ok(Response::Untagged(UntaggedResponse::Exists(n))) => status.exists = n,
                Ok(Response::Untagged(UntaggedResponse::Expunge(_))) => {
                    status.exists = status.exists.saturating_sub(1);
                }
                _ => {}
            }
        }
    }
}
