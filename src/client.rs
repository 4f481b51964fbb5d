//! Gmail IMAP client
//!
//! [`MailSession`] is the set of mailbox operations the command loop
//! needs. [`GmailClient`] implements it over a single logged-in IMAP
//! session that stays open until [`MailSession::logout`].

use crate::account::Credential;
use crate::config::ImapConfig;
use crate::connection::{self, ImapSession};
use crate::error::{Error, Result};
use crate::message::{Metadata, MessageId, decode_body};
use async_imap::types::Fetch;
use futures::StreamExt;
use std::future::Future;
use tracing::{debug, info, warn};

const INBOX: &str = "INBOX";

/// Only the two header fields shown while browsing. `PEEK` keeps the
/// `\Seen` flag untouched.
const HEADER_QUERY: &str = "(BODY.PEEK[HEADER.FIELDS (FROM SUBJECT)])";

/// The complete raw message.
const BODY_QUERY: &str = "(BODY.PEEK[])";

/// Mailbox operations used by the command loop.
pub trait MailSession {
    /// UIDs of every INBOX message, oldest first. Empty for an empty inbox.
    fn message_ids(&mut self) -> impl Future<Output = Result<Vec<MessageId>>>;

    /// Decoded `From` and `Subject` of one message.
    fn metadata(&mut self, id: MessageId) -> impl Future<Output = Result<Metadata>>;

    /// The whole raw message (headers and body) as text.
    fn body(&mut self, id: MessageId) -> impl Future<Output = Result<String>>;

    /// Close the session. Calling it again does nothing.
    fn logout(&mut self) -> impl Future<Output = ()>;
}

#[derive(Clone, Copy)]
enum Section {
    Header,
    Full,
}

impl Section {
    const fn query(self) -> &'static str {
        match self {
            Self::Header => HEADER_QUERY,
            Self::Full => BODY_QUERY,
        }
    }

    fn extract(self, fetch: &Fetch) -> Option<Vec<u8>> {
        let data = match self {
            Self::Header => fetch.header().or_else(|| fetch.body()),
            Self::Full => fetch.body(),
        };
        data.map(<[u8]>::to_vec)
    }
}

/// Read-only IMAP client for a Gmail account
pub struct GmailClient {
    session: Option<ImapSession>,
}

impl GmailClient {
    /// Connect and authenticate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Login`] if the server is unreachable or rejects
    /// the credentials, and [`Error::Tls`] if the TLS setup fails.
    pub async fn login(config: &ImapConfig, credential: &Credential) -> Result<Self> {
        let session = connection::connect(config, credential).await?;
        Ok(Self {
            session: Some(session),
        })
    }

    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    fn session(&mut self) -> Result<&mut ImapSession> {
        self.session
            .as_mut()
            .ok_or_else(|| Error::Fetch("Session already logged out".into()))
    }

    async fn fetch_section(&mut self, id: MessageId, section: Section) -> Result<Vec<u8>> {
        let session = self.session()?;
        let mut messages = session
            .uid_fetch(id.to_string(), section.query())
            .await
            .map_err(|e| Error::Fetch(format!("Fetch of UID {id} failed: {e}")))?;

        // Drain the whole response so the next command starts clean.
        let mut data = None;
        while let Some(msg_result) = messages.next().await {
            let msg = msg_result.map_err(|e| Error::Fetch(format!("Fetch error: {e}")))?;
            if data.is_none() {
                data = section.extract(&msg);
            }
        }
        drop(messages);

        data.ok_or_else(|| Error::Fetch(format!("No message found for UID {id}")))
    }
}

impl MailSession for GmailClient {
    async fn message_ids(&mut self) -> Result<Vec<MessageId>> {
        let session = self.session()?;
        connection::select(session, INBOX).await?;

        let uids = session
            .uid_search("ALL")
            .await
            .map_err(|e| Error::Fetch(format!("Search failed: {e}")))?;

        let mut ids: Vec<MessageId> = uids.into_iter().map(MessageId).collect();
        ids.sort_unstable();

        info!("Found {} messages in {}", ids.len(), INBOX);
        Ok(ids)
    }

    async fn metadata(&mut self, id: MessageId) -> Result<Metadata> {
        let raw = self.fetch_section(id, Section::Header).await?;
        Ok(Metadata::from_header_block(&raw))
    }

    async fn body(&mut self, id: MessageId) -> Result<String> {
        let raw = self.fetch_section(id, Section::Full).await?;
        debug!("Fetched {} bytes for UID {}", raw.len(), id);
        Ok(decode_body(&raw))
    }

    async fn logout(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        match session.logout().await {
            Ok(()) => debug!("Logged out"),
            Err(e) => warn!("Logout failed: {}", e),
        }
    }
}
