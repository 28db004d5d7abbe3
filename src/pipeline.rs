//! Pipeline orchestration: extract, reduce, normalize, deliver

use crate::error::{DeliveryError, PipelineError};
use crate::extract::extract_content;
use crate::normalize::{normalize_text, truncate_with_marker};
use crate::reduce::reduce_markup;
use crate::types::{ProcessedMessage, RawMessage};
use encoding_rs::Encoding;
use tracing::{debug, error, info};

/// Outbound channel for relayed content.
///
/// Constructed by the caller and injected into the [`Pipeline`]; the
/// pipeline never reaches for an ambient client. Implementations own
/// rate limiting and retry; the pipeline only guarantees bounded text
/// and attachment/text separation.
pub trait DeliverySink {
    /// Post a text message to the destination channel.
    fn post_text(&self, text: &str) -> Result<(), DeliveryError>;

    /// Post a binary document to the destination channel.
    fn post_document(&self, filename: &str, bytes: &[u8]) -> Result<(), DeliveryError>;
}

/// Per-message processing pipeline in front of a delivery sink.
///
/// The only component aware of the length limit and of the metadata
/// header lines prepended before delivery. Stateless between messages.
pub struct Pipeline<S> {
    sink: S,
    max_text_len: usize,
    fallback_charset: &'static Encoding,
}

impl<S: DeliverySink> Pipeline<S> {
    pub const fn new(sink: S, max_text_len: usize, fallback_charset: &'static Encoding) -> Self {
        Self {
            sink,
            max_text_len,
            fallback_charset,
        }
    }

    /// Run the pure stages for one message: extraction, markup
    /// reduction, normalization.
    ///
    /// `text` is `None` when the message has no extractable textual
    /// body or the body normalizes to nothing. Attachments are
    /// returned regardless.
    #[must_use]
    pub fn process(&self, message: &RawMessage) -> ProcessedMessage {
        let extracted = extract_content(message, self.fallback_charset);

        let text = extracted.body.and_then(|(kind, raw)| {
            let reduced = reduce_markup(kind, &raw);
            let normalized = normalize_text(&reduced);
            if normalized.is_empty() {
                None
            } else {
                Some(normalized)
            }
        });

        ProcessedMessage {
            text,
            attachments: extracted.attachments,
        }
    }

    /// Process one message and hand it to the sink: one text post
    /// (skipped for empty bodies), then one document post per
    /// attachment.
    pub fn relay(&self, message: &RawMessage) -> Result<(), PipelineError> {
        let processed = self.process(message);

        if let Some(body) = processed.text.as_deref() {
            let payload = self.compose_payload(message, body);
            self.sink.post_text(&payload)?;
        } else {
            debug!(uid = message.uid, "no textual body, skipping text post");
        }

        for attachment in &processed.attachments {
            self.sink.post_document(&attachment.filename, &attachment.bytes)?;
        }

        info!(
            uid = message.uid,
            attachments = processed.attachments.len(),
            "relayed message"
        );
        Ok(())
    }

    /// Relay a batch of messages with per-message isolation: a failure
    /// is logged with its message identifier and cause, and the rest
    /// of the batch still runs. Returns the number of messages
    /// relayed.
    pub fn relay_batch(&self, messages: &[RawMessage]) -> usize {
        let mut relayed = 0;
        for message in messages {
            match self.relay(message) {
                Ok(()) => relayed += 1,
                Err(e) => {
                    error!(
                        uid = message.uid,
                        subject = %message.subject,
                        error = %e,
                        "skipping message after stage failure"
                    );
                }
            }
        }
        relayed
    }

    /// Prepend the sender/subject/date header lines and bound the
    /// composed payload. Truncation applies to the whole payload, so
    /// the delivered text never exceeds the limit by more than the
    /// marker.
    fn compose_payload(&self, message: &RawMessage, body: &str) -> String {
        let payload = format!(
            "From: {}\nSubject: {}\nDate: {}\n\n{}",
            escape_metadata(&message.from),
            escape_metadata(&message.subject),
            message.date.format("%Y-%m-%d %H:%M UTC"),
            body,
        );
        truncate_with_marker(&payload, self.max_text_len)
    }
}

/// Escape markup-significant characters in header metadata. Sender
/// names like `John <john@example.com>` would otherwise read as tags
/// to the destination channel's renderer.
fn escape_metadata(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
