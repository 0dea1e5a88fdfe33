//! The mailbox client.

use std::fmt;
use std::time::Instant;

use chrono::{DateTime, FixedOffset};
use mailsieve_imap::{
    Authenticated, Client, FetchItem, FetchItems, Rejected, SearchCriteria, Selected, SeqNum,
    SequenceSet, StoreAction,
};
use mailsieve_mime::Message;
use tracing::{debug, info, warn};

use super::connector::{Connector, TlsConnector};
use super::report::{Operation, PassOutcome, PassReport, PassStats};
use super::{DeletionScope, MailboxError};
use crate::config::MailboxConfig;
use crate::policy::{TrustPolicy, extract_sender};
use crate::senders::SenderRepository;

type PassResult = std::result::Result<(), MailboxError>;

/// An open session, with or without a selected folder.
enum Session<S> {
    Authenticated(Client<S, Authenticated>),
    Selected(Client<S, Selected>),
}

/// A message considered by a deletion pass.
struct Candidate {
    id: SeqNum,
    sender: Option<String>,
    date: Option<DateTime<FixedOffset>>,
}

/// Owns one IMAP session for one account.
///
/// Constructed disconnected. [`connect`](Self::connect) and
/// [`disconnect`](Self::disconnect) never fail past their own boundary;
/// the passes connect and disconnect by themselves.
pub struct MailboxClient<C: Connector = TlsConnector> {
    config: MailboxConfig,
    connector: C,
    session: Option<Session<C::Stream>>,
}

impl MailboxClient<TlsConnector> {
    /// Creates a client that connects over implicit TLS.
    #[must_use]
    pub const fn new(config: MailboxConfig) -> Self {
        Self::with_connector(config, TlsConnector)
    }
}

impl<C: Connector> MailboxClient<C> {
    /// Creates a client using `connector` for the transport.
    #[must_use]
    pub const fn with_connector(config: MailboxConfig, connector: C) -> Self {
        Self {
            config,
            connector,
            session: None,
        }
    }

    /// Account settings.
    #[must_use]
    pub const fn config(&self) -> &MailboxConfig {
        &self.config
    }

    /// True while a session is open.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Opens and authenticates a session. Returns whether the client is
    /// connected afterwards.
    ///
    /// Calling this while already connected keeps the existing session.
    pub async fn connect(&mut self) -> bool {
        if self.session.is_some() {
            return true;
        }

        let host = &self.config.host;
        match self.open_session().await {
            Ok(client) => {
                self.session = Some(Session::Authenticated(client));
                info!("Connected to {host}");
                true
            }
            Err(e) => {
                warn!(host = %host, error = %e, "IMAP login failed");
                false
            }
        }
    }

    async fn open_session(&self) -> Result<Client<C::Stream, Authenticated>, MailboxError> {
        let stream = self
            .connector
            .connect(&self.config.host, self.config.port)
            .await?;
        let client = Client::from_stream(stream).await?;
        Ok(client
            .login(&self.config.account, self.config.secret.expose())
            .await?)
    }

    /// Closes the selected folder, if any, then logs out.
    ///
    /// A failed CLOSE does not prevent the LOGOUT. Safe to call at any time;
    /// without a session it does nothing.
    pub async fn disconnect(&mut self) {
        let Some(session) = self.session.take() else {
            debug!("disconnect without a session");
            return;
        };

        let client = match session {
            Session::Authenticated(client) => client,
            Session::Selected(client) => {
                let folder = client.mailbox().to_string();
                match client.close().await {
                    Ok(client) => client,
                    Err(Rejected { client, error }) => {
                        warn!(folder, error = %error, "failed to close folder");
                        client
                    }
                }
            }
        };

        match client.logout().await {
            Ok(()) => info!("Disconnected from the email server."),
            Err(e) => warn!(error = %e, "logout failed"),
        }
    }

    /// Runs `body` inside a session: connects first and disconnects after,
    /// whatever `body` returned.
    ///
    /// Returns `None` without running `body` if the connection failed.
    pub async fn session<T>(&mut self, body: impl AsyncFnOnce(&mut Self) -> T) -> Option<T> {
        if !self.connect().await {
            return None;
        }
        let value = body(self).await;
        self.disconnect().await;
        Some(value)
    }

    /// Selects `folder` and returns every message sequence number in it.
    ///
    /// Failures are logged and yield an empty list.
    pub async fn fetch_message_ids(&mut self, folder: &str) -> Vec<SeqNum> {
        match self.try_fetch_message_ids(folder).await {
            Ok(ids) => {
                if ids.is_empty() {
                    info!(folder, "No emails found.");
                }
                ids
            }
            Err(MailboxError::NotConnected) => {
                warn!("Not connected to the email server.");
                Vec::new()
            }
            Err(e) => {
                warn!(folder, error = %e, "failed to list messages");
                Vec::new()
            }
        }
    }

    /// Fetches and parses one message of the selected folder.
    ///
    /// Failures are logged and yield `None`.
    pub async fn fetch_message(&mut self, id: SeqNum) -> Option<Message> {
        match self.try_fetch_message(id).await {
            Ok(message) => Some(message),
            Err(e) => {
                warn!(id = %id, error = %e, "failed to fetch message");
                None
            }
        }
    }

    /// Classifies the sender of every message in `folder` and records the
    /// verdict in `store`.
    ///
    /// `trusted_domains` overrides the configured list for this pass.
    pub async fn categorize_senders(
        &mut self,
        folder: &str,
        trusted_domains: Option<&[String]>,
        store: &SenderRepository,
    ) -> PassReport {
        let domains = trusted_domains.unwrap_or(self.config.trusted_domains.as_slice());
        let policy = TrustPolicy::new(domains);
        let started = Instant::now();
        let mut stats = PassStats::default();

        let result = self
            .session(async |client: &mut Self| {
                client
                    .run_categorize(folder, &policy, store, &mut stats)
                    .await
            })
            .await;

        finish(Operation::Categorize, folder, result, stats, started)
    }

    /// Flags and expunges messages in `folder` whose sender is not marked
    /// important in `store`.
    ///
    /// With [`DeletionScope::MostRecent`] only the newest messages by `Date`
    /// header are eligible. `progress` is called with the running count
    /// after every flagged message.
    pub async fn delete_unimportant(
        &mut self,
        folder: &str,
        scope: DeletionScope,
        store: &SenderRepository,
        progress: &mut dyn FnMut(usize),
    ) -> PassReport {
        let started = Instant::now();
        let mut stats = PassStats::default();

        let result = self
            .session(async |client: &mut Self| {
                client
                    .run_delete(folder, scope, store, progress, &mut stats)
                    .await
            })
            .await;

        finish(Operation::Delete, folder, result, stats, started)
    }

    async fn run_categorize(
        &mut self,
        folder: &str,
        policy: &TrustPolicy,
        store: &SenderRepository,
        stats: &mut PassStats,
    ) -> PassResult {
        let ids = self.try_fetch_message_ids(folder).await?;
        if ids.is_empty() {
            info!(folder, "No emails found.");
            return Ok(());
        }

        for id in ids {
            stats.examined += 1;
            let message = match self.try_fetch_message(id).await {
                Ok(message) => message,
                Err(e) if e.is_connection_lost() => return Err(e),
                Err(e) => {
                    warn!(id = %id, error = %e, "skipping message");
                    stats.skipped += 1;
                    continue;
                }
            };

            let Some(sender) = message.from().as_deref().and_then(extract_sender) else {
                warn!(id = %id, "skipping message without a sender address");
                stats.skipped += 1;
                continue;
            };
            let subject = message.subject().unwrap_or_default();

            let verdict = policy.classify(&sender, &subject);
            store.set_importance(&sender, verdict.is_important()).await?;
            debug!(sender = %sender, %verdict, "sender categorized");

            if verdict.is_important() {
                stats.important += 1;
            } else {
                stats.unimportant += 1;
            }
        }

        Ok(())
    }

    async fn run_delete(
        &mut self,
        folder: &str,
        scope: DeletionScope,
        store: &SenderRepository,
        progress: &mut dyn FnMut(usize),
        stats: &mut PassStats,
    ) -> PassResult {
        let ids = self.try_fetch_message_ids(folder).await?;
        if ids.is_empty() {
            info!(folder, "No emails found to delete.");
            return Ok(());
        }

        let mut candidates = self.collect_candidates(ids, scope, stats).await?;

        if let DeletionScope::MostRecent(limit) = scope {
            candidates.retain(|c| {
                if c.date.is_none() {
                    warn!(id = %c.id, "message has no parseable Date header, leaving it alone");
                    stats.undated += 1;
                }
                c.date.is_some()
            });
            candidates.sort_by(|a, b| b.date.cmp(&a.date));
            candidates.truncate(limit);
        }

        for candidate in candidates {
            let Some(sender) = candidate.sender else {
                stats.skipped += 1;
                continue;
            };

            match store.is_important(&sender).await {
                Ok(true) => continue,
                Ok(false) => {}
                Err(e) => {
                    warn!(sender = %sender, error = %e, "sender lookup failed, keeping message");
                    stats.skipped += 1;
                    continue;
                }
            }

            let client = self.selected_mut()?;
            match client
                .store(&SequenceSet::Single(candidate.id), StoreAction::mark_deleted())
                .await
            {
                Ok(()) => {
                    stats.flagged += 1;
                    debug!(id = %candidate.id, sender = %sender, "flagged for deletion");
                    progress(stats.flagged);
                }
                Err(e) => {
                    let e = MailboxError::from(e);
                    if e.is_connection_lost() {
                        return Err(e);
                    }
                    warn!(id = %candidate.id, error = %e, "failed to flag message");
                    stats.skipped += 1;
                }
            }
        }

        if stats.flagged > 0 {
            let expunged = self.selected_mut()?.expunge().await?;
            stats.expunged = expunged.len();
            debug!(count = stats.expunged, "expunged");
        }

        Ok(())
    }

    /// Fetches every message once and keeps what the deletion pass needs.
    async fn collect_candidates(
        &mut self,
        ids: Vec<SeqNum>,
        scope: DeletionScope,
        stats: &mut PassStats,
    ) -> Result<Vec<Candidate>, MailboxError> {
        let mut candidates = Vec::with_capacity(ids.len());

        for id in ids {
            stats.examined += 1;
            let message = match self.try_fetch_message(id).await {
                Ok(message) => message,
                Err(e) if e.is_connection_lost() => return Err(e),
                Err(e) => {
                    warn!(id = %id, error = %e, "skipping message");
                    stats.skipped += 1;
                    continue;
                }
            };

            let sender = message.from().as_deref().and_then(extract_sender);
            if sender.is_none() {
                warn!(id = %id, "message has no sender address");
            }
            let date = match scope {
                DeletionScope::All => None,
                DeletionScope::MostRecent(_) => message.date_time(),
            };
            candidates.push(Candidate { id, sender, date });
        }

        Ok(candidates)
    }

    async fn try_fetch_message_ids(&mut self, folder: &str) -> Result<Vec<SeqNum>, MailboxError> {
        self.select(folder).await?;
        Ok(self.selected_mut()?.search(&SearchCriteria::All).await?)
    }

    async fn try_fetch_message(&mut self, id: SeqNum) -> Result<Message, MailboxError> {
        let fetched = self
            .selected_mut()?
            .fetch(&SequenceSet::Single(id), FetchItems::Rfc822)
            .await?;

        let raw = fetched
            .iter()
            .filter(|(seq, _)| *seq == id)
            .flat_map(|(_, items)| items)
            .find_map(FetchItem::full_message)
            .ok_or(MailboxError::MissingMessage(id.get()))?;

        Ok(Message::parse(raw)?)
    }

    /// Selects `folder`, replacing any current selection. A refused SELECT
    /// leaves the session authenticated.
    async fn select(&mut self, folder: &str) -> Result<(), MailboxError> {
        let session = self.session.take().ok_or(MailboxError::NotConnected)?;
        let result = match session {
            Session::Authenticated(client) => client.select(folder).await,
            Session::Selected(client) => client.select(folder).await,
        };

        match result {
            Ok((client, status)) => {
                debug!(folder, exists = status.exists, "folder selected");
                if !status.accepts_deletions() {
                    warn!(folder, "Server will not keep deletion flags in this folder");
                }
                self.session = Some(Session::Selected(client));
                Ok(())
            }
            Err(Rejected { client, error }) => {
                self.session = Some(Session::Authenticated(client));
                Err(error.into())
            }
        }
    }

    fn selected_mut(&mut self) -> Result<&mut Client<C::Stream, Selected>, MailboxError> {
        match &mut self.session {
            Some(Session::Selected(client)) => Ok(client),
            Some(Session::Authenticated(_)) => Err(MailboxError::NoFolderSelected),
            None => Err(MailboxError::NotConnected),
        }
    }
}

fn finish(
    operation: Operation,
    folder: &str,
    result: Option<PassResult>,
    stats: PassStats,
    started: Instant,
) -> PassReport {
    let outcome = match result {
        None => PassOutcome::NotConnected,
        Some(Ok(())) => PassOutcome::Completed,
        Some(Err(e)) => {
            warn!(folder, error = %e, "pass aborted");
            PassOutcome::Failed(e.to_string())
        }
    };

    PassReport {
        operation,
        folder: folder.to_string(),
        outcome,
        stats,
        elapsed: started.elapsed(),
    }
}

impl<C: Connector> fmt::Debug for MailboxClient<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailboxClient")
            .field("config", &self.config)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

impl<C: Connector> Drop for MailboxClient<C> {
    fn drop(&mut self) {
        if self.session.is_some() {
            warn!(
                host = %self.config.host,
                "mailbox client dropped while connected, closing transport without LOGOUT"
            );
        }
    }
}
