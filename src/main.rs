//! Relay daemon: poll the mailbox, push through the pipeline, sleep

use anyhow::{Context, Result};
use clap::Parser;
use mailgram::{Config, ImapMailbox, Pipeline, TelegramSink};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Relay unseen IMAP mail to a Telegram chat")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "mailgram.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    let sink = TelegramSink::new(&config.telegram_token, &config.telegram_chat_id);
    let mailbox = ImapMailbox::new(
        &config.imap_server,
        &config.imap_user,
        &config.imap_password,
    );
    let pipeline = Pipeline::new(sink, config.max_text_len, config.fallback_encoding());

    info!(
        server = %config.imap_server,
        interval = config.poll_interval_secs,
        "relay started"
    );

    loop {
        match mailbox.fetch_unseen() {
            Ok(messages) if messages.is_empty() => {}
            Ok(messages) => {
                let total = messages.len();
                let relayed = pipeline.relay_batch(&messages);
                info!(relayed, total, "poll cycle finished");
            }
            Err(e) => error!(error = %e, "poll cycle failed"),
        }
        thread::sleep(Duration::from_secs(config.poll_interval_secs));
    }
}
