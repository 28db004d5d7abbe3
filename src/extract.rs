//! MIME content extraction: body selection and attachment collection

use crate::types::{Attachment, BodyKind, Disposition, ExtractedContent, MessagePart, RawMessage};
use encoding_rs::Encoding;
use tracing::{debug, warn};

/// Derive the primary textual body and the attachment list from a
/// fetched message.
///
/// Body selection scans the flattened parts in order and keeps the
/// *last* inline `text/plain` or `text/html` part, so in a
/// `multipart/alternative` group the richer rendition listed later
/// replaces the earlier one. Parts marked as attachments, and inline
/// images, are collected as attachments with their original bytes.
///
/// Never fails: charset problems degrade to a lossy decode against
/// `fallback` and are logged.
#[must_use]
pub fn extract_content(message: &RawMessage, fallback: &'static Encoding) -> ExtractedContent {
    let mut content = ExtractedContent::default();

    for part in &message.parts {
        let kind = body_kind(&part.content_type);

        if part.disposition != Disposition::Attachment
            && let Some(kind) = kind
        {
            // Last qualifying part wins.
            content.body = Some((kind, decode_part(message.uid, part, fallback)));
        }

        if part.disposition == Disposition::Attachment || part.content_type.starts_with("image/") {
            content.attachments.push(Attachment {
                filename: attachment_filename(part),
                bytes: part.bytes.clone(),
            });
        }
    }

    debug!(
        uid = message.uid,
        has_body = content.body.is_some(),
        attachments = content.attachments.len(),
        "extracted message content"
    );

    content
}

fn body_kind(content_type: &str) -> Option<BodyKind> {
    match content_type {
        "text/plain" => Some(BodyKind::Plain),
        "text/html" => Some(BodyKind::Html),
        _ => None,
    }
}

/// Decode a part's payload using its declared charset.
///
/// Unknown labels fall back to the configured default encoding;
/// undecodable byte sequences are replaced rather than failing. Both
/// degradations are logged so the fallback stays a visible branch.
fn decode_part(uid: u32, part: &MessagePart, fallback: &'static Encoding) -> String {
    let encoding = match part.charset.as_deref() {
        Some(label) => Encoding::for_label(label.as_bytes()).unwrap_or_else(|| {
            warn!(uid, charset = label, "unknown charset label, using fallback");
            fallback
        }),
        None => fallback,
    };

    let (text, used, had_errors) = encoding.decode(&part.bytes);
    if had_errors {
        warn!(uid, charset = used.name(), "lossy decode of message part");
    }
    text.into_owned()
}

fn attachment_filename(part: &MessagePart) -> String {
    part.filename.clone().unwrap_or_else(|| {
        let subtype = part.content_type.rsplit('/').next().unwrap_or("bin");
        format!("image.{subtype}")
    })
}
