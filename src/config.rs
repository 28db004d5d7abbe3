//! TOML configuration for the relay daemon

use anyhow::{Result, bail};
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const fn default_max_text_len() -> usize {
    4000
}

const fn default_poll_interval_secs() -> u64 {
    60
}

fn default_fallback_charset() -> String {
    "utf-8".to_string()
}

/// Relay configuration, loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub imap_server: String,
    pub imap_user: String,
    pub imap_password: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,

    /// Upper bound on delivered text length, in characters
    #[serde(default = "default_max_text_len")]
    pub max_text_len: usize,

    /// Seconds between mailbox checks
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Charset label used when a part declares none or an unknown one
    #[serde(default = "default_fallback_charset")]
    pub fallback_charset: String,
}

impl Config {
    /// Load the configuration from `path`.
    ///
    /// When the file does not exist, a template is written there and
    /// an error tells the user to edit it first.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            let template = Self {
                imap_server: "imap.example.com".to_string(),
                imap_user: "you@example.com".to_string(),
                imap_password: "app-password".to_string(),
                telegram_token: "123456:bot-token".to_string(),
                telegram_chat_id: "@your_channel".to_string(),
                max_text_len: default_max_text_len(),
                poll_interval_secs: default_poll_interval_secs(),
                fallback_charset: default_fallback_charset(),
            };
            fs::write(path, toml::to_string_pretty(&template)?)?;
            bail!(
                "created template config at {}; edit it and run again",
                path.display()
            );
        }

        let raw = fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Resolve the configured fallback charset label, defaulting to
    /// UTF-8 for labels encoding_rs does not know.
    #[must_use]
    pub fn fallback_encoding(&self) -> &'static Encoding {
        Encoding::for_label(self.fallback_charset.as_bytes()).unwrap_or(encoding_rs::UTF_8)
    }
}
