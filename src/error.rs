//! Error types for the mail relay

use thiserror::Error;

/// Errors raised while turning one mailbox item into a relayed post.
///
/// Markup reduction and text normalization are total functions over
/// strings, so malformed markup never surfaces here; it degrades inside
/// the reducer instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The raw message bytes could not be parsed as a MIME structure
    #[error("failed to parse message structure: {0}")]
    Structure(String),

    /// The delivery sink rejected a post for this message
    #[error("delivery failed: {0}")]
    Delivery(#[from] DeliveryError),
}

/// Errors from the outbound delivery channel.
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// Transport-level HTTP failure
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The Bot API answered with a non-success status
    #[error("Telegram API rejected the request ({status}): {description}")]
    Api { status: u16, description: String },
}

/// Errors from the mailbox boundary; fatal to one poll cycle only.
#[derive(Error, Debug)]
pub enum MailboxError {
    /// IMAP protocol or connection failure
    #[error("IMAP error: {0}")]
    Imap(#[from] imap::error::Error),

    /// TLS connector setup failure
    #[error("TLS setup failed: {0}")]
    Tls(#[from] native_tls::Error),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
