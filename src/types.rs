//! Core types for fetched and processed messages

use crate::error::{PipelineError, Result};
use chrono::{DateTime, Utc};
use std::fmt;
use tracing::warn;

/// Placeholder used when a message carries no decodable subject.
pub const NO_SUBJECT: &str = "(no subject)";

/// Placeholder used when a message carries no From header.
pub const NO_SENDER: &str = "(unknown sender)";

/// An immutable, parsed representation of one mailbox item.
///
/// Created once per fetched message and discarded after processing.
/// The MIME tree is flattened depth-first into `parts` at construction
/// time; a non-multipart message yields exactly one part.
#[derive(Debug, Clone)]
pub struct RawMessage {
    /// IMAP UID of the fetched message
    pub uid: u32,

    /// Decoded subject line, or [`NO_SUBJECT`]
    pub subject: String,

    /// Raw From header value, or [`NO_SENDER`]
    pub from: String,

    /// Date header, falling back to the fetch time
    pub date: DateTime<Utc>,

    /// Leaf MIME parts in traversal order
    pub parts: Vec<MessagePart>,
}

/// One leaf segment of a message body.
///
/// `bytes` are transfer-decoded (base64 / quoted-printable already
/// undone) but not charset-decoded; the extractor owns that step.
#[derive(Debug, Clone)]
pub struct MessagePart {
    /// Lowercased MIME type, e.g. `text/plain` or `image/png`
    pub content_type: String,

    /// Whether the part was marked for inline display or download
    pub disposition: Disposition,

    /// Declared charset label, if the part declared one
    pub charset: Option<String>,

    /// Filename from Content-Disposition or Content-Type, if any
    pub filename: Option<String>,

    /// Transfer-decoded payload bytes
    pub bytes: Vec<u8>,
}

/// Content-Disposition of a MIME part, reduced to the two cases the
/// relay distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Inline,
    Attachment,
}

/// Flavor of a textual body part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Plain,
    Html,
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "text/plain"),
            Self::Html => write!(f, "text/html"),
        }
    }
}

/// Textual body and extractable attachments derived from a [`RawMessage`].
///
/// A part selected as the primary body never also appears in
/// `attachments`.
#[derive(Debug, Clone, Default)]
pub struct ExtractedContent {
    /// The selected textual body, if the message has one
    pub body: Option<(BodyKind, String)>,

    /// Attachment blobs in traversal order
    pub attachments: Vec<Attachment>,
}

/// A binary attachment ready for document delivery.
#[derive(Debug, Clone)]
pub struct Attachment {
    /// Original filename, or a synthesized `image.<subtype>` name
    pub filename: String,

    /// Original payload bytes, untouched by text processing
    pub bytes: Vec<u8>,
}

/// Final output of the pipeline for one message.
#[derive(Debug, Clone)]
pub struct ProcessedMessage {
    /// Normalized, bounded text, or `None` when the message had no
    /// extractable textual body
    pub text: Option<String>,

    /// Attachments, unaffected by text truncation
    pub attachments: Vec<Attachment>,
}

impl RawMessage {
    /// Parse raw RFC 822 bytes into a flattened message.
    ///
    /// Never fails for malformed individual parts; a part whose payload
    /// cannot be transfer-decoded is logged and skipped so the rest of
    /// the message still goes through.
    pub fn parse(uid: u32, raw: &[u8]) -> Result<Self> {
        let parsed =
            mailparse::parse_mail(raw).map_err(|e| PipelineError::Structure(e.to_string()))?;

        let subject = header_value(&parsed.headers, "subject")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| NO_SUBJECT.to_string());

        let from = header_value(&parsed.headers, "from")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| NO_SENDER.to_string());

        let date = header_value(&parsed.headers, "date")
            .and_then(|v| DateTime::parse_from_rfc2822(&v).ok())
            .map_or_else(Utc::now, |dt| dt.with_timezone(&Utc));

        let mut parts = Vec::new();
        collect_parts(uid, &parsed, &mut parts);

        Ok(Self {
            uid,
            subject,
            from,
            date,
            parts,
        })
    }
}

fn header_value(headers: &[mailparse::MailHeader], name: &str) -> Option<String> {
    headers
        .iter()
        .find(|h| h.get_key().to_lowercase() == name)
        .map(mailparse::MailHeader::get_value)
}

fn collect_parts(uid: u32, mail: &mailparse::ParsedMail, out: &mut Vec<MessagePart>) {
    if mail.subparts.is_empty() {
        match mail.get_body_raw() {
            Ok(bytes) => out.push(make_part(mail, bytes)),
            Err(e) => {
                warn!(uid, error = %e, "skipping undecodable MIME part");
            }
        }
        return;
    }
    for part in &mail.subparts {
        collect_parts(uid, part, out);
    }
}

fn make_part(mail: &mailparse::ParsedMail, bytes: Vec<u8>) -> MessagePart {
    let disposition = match mail.get_content_disposition().disposition {
        mailparse::DispositionType::Attachment => Disposition::Attachment,
        _ => Disposition::Inline,
    };

    let filename = mail
        .get_content_disposition()
        .params
        .get("filename")
        .cloned()
        .or_else(|| mail.ctype.params.get("name").cloned());

    let charset = mail
        .ctype
        .params
        .get("charset")
        .map(|_| mail.ctype.charset.clone());

    MessagePart {
        content_type: mail.ctype.mimetype.to_lowercase(),
        disposition,
        charset,
        filename,
        bytes,
    }
}
