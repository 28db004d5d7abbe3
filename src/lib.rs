// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Mail-to-Telegram relay
//!
//! Polls an IMAP mailbox for unseen messages and relays each one to a
//! Telegram chat: MIME extraction, HTML markup reduction down to the
//! inline tags Telegram renders, text normalization and bounded
//! delivery with attachments forwarded as documents.
//!
//! # Example
//!
//! ```rust
//! use mailgram::{BodyKind, normalize_text, reduce_markup};
//!
//! let html = "<p>Hello <b>world</b></p><script>evil()</script>";
//! let reduced = reduce_markup(BodyKind::Html, html);
//! assert_eq!(normalize_text(&reduced), "Hello <b>world</b>");
//! ```

mod config;
mod error;
mod extract;
mod mailbox;
mod normalize;
mod pipeline;
mod reduce;
mod telegram;
mod types;

pub use config::Config;
pub use error::{DeliveryError, MailboxError, PipelineError, Result};
pub use extract::extract_content;
pub use mailbox::ImapMailbox;
pub use normalize::{TRUNCATION_MARKER, normalize_text, truncate_with_marker};
pub use pipeline::{DeliverySink, Pipeline};
pub use reduce::{ALLOWED_TAGS, reduce_markup};
pub use telegram::TelegramSink;
pub use types::*;
