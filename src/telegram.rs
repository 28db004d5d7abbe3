//! Telegram Bot API delivery sink

use crate::error::DeliveryError;
use crate::pipeline::DeliverySink;
use reqwest::blocking::{Client, Response, multipart};
use tracing::debug;

const API_BASE: &str = "https://api.telegram.org";

/// Posts text and documents to one Telegram chat via the Bot API.
///
/// Text goes out with `parse_mode=HTML`; the reducer's allow list is
/// exactly the inline tag set the Bot API renders.
pub struct TelegramSink {
    http: Client,
    token: String,
    chat_id: String,
}

impl TelegramSink {
    #[must_use]
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            token: token.into(),
            chat_id: chat_id.into(),
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{API_BASE}/bot{}/{method}", self.token)
    }

    fn check(response: Response) -> Result<(), DeliveryError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(DeliveryError::Api {
            status: status.as_u16(),
            description: response.text().unwrap_or_default(),
        })
    }
}

impl DeliverySink for TelegramSink {
    fn post_text(&self, text: &str) -> Result<(), DeliveryError> {
        debug!(chars = text.chars().count(), "posting text message");
        let response = self
            .http
            .post(self.endpoint("sendMessage"))
            .form(&[
                ("chat_id", self.chat_id.as_str()),
                ("text", text),
                ("parse_mode", "HTML"),
            ])
            .send()?;
        Self::check(response)
    }

    fn post_document(&self, filename: &str, bytes: &[u8]) -> Result<(), DeliveryError> {
        debug!(filename, size = bytes.len(), "posting document");
        let part = multipart::Part::bytes(bytes.to_vec()).file_name(filename.to_string());
        let form = multipart::Form::new()
            .text("chat_id", self.chat_id.clone())
            .part("document", part);
        let response = self
            .http
            .post(self.endpoint("sendDocument"))
            .multipart(form)
            .send()?;
        Self::check(response)
    }
}
