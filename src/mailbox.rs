//! IMAP mailbox source: fetches unseen messages for the pipeline

use crate::error::MailboxError;
use crate::types::RawMessage;
use native_tls::TlsConnector;
use tracing::{debug, warn};

const IMAP_PORT: u16 = 993;

/// One configured IMAP account, polled for unseen mail.
///
/// Each fetch opens a fresh TLS session and logs out afterwards, so a
/// dropped connection never outlives a poll cycle. The fetch uses
/// `RFC822` rather than `BODY.PEEK[]`: retrieving a message is what
/// marks it seen, which is the boundary's idempotency mechanism.
pub struct ImapMailbox {
    server: String,
    user: String,
    password: String,
}

impl ImapMailbox {
    pub fn new(
        server: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server: server.into(),
            user: user.into(),
            password: password.into(),
        }
    }

    /// Fetch all unseen messages from INBOX, oldest first.
    ///
    /// A message that cannot be parsed is logged and skipped; only
    /// connection-level failures abort the cycle.
    pub fn fetch_unseen(&self) -> Result<Vec<RawMessage>, MailboxError> {
        let tls = TlsConnector::builder().build()?;
        let client = imap::connect(
            (self.server.as_str(), IMAP_PORT),
            self.server.as_str(),
            &tls,
        )?;
        let mut session = client
            .login(&self.user, &self.password)
            .map_err(|(e, _client)| e)?;

        session.select("INBOX")?;

        let mut uids: Vec<u32> = session.uid_search("UNSEEN")?.into_iter().collect();
        uids.sort_unstable();
        debug!(unseen = uids.len(), "searched INBOX");

        let mut messages = Vec::with_capacity(uids.len());
        for uid in uids {
            let fetches = session.uid_fetch(uid.to_string(), "RFC822")?;
            let Some(fetch) = fetches.iter().next() else {
                warn!(uid, "UID vanished between search and fetch");
                continue;
            };
            let Some(raw) = fetch.body() else {
                warn!(uid, "fetch returned no message body");
                continue;
            };
            match RawMessage::parse(uid, raw) {
                Ok(message) => messages.push(message),
                Err(e) => warn!(uid, error = %e, "skipping unparseable message"),
            }
        }

        session.logout()?;
        Ok(messages)
    }
}
