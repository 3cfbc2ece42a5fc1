//! Terminal front-end for the cricket chat.

use chrono::Local;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;

use cricket_service::client::commands::{Command, HELP, parse_command};
use cricket_service::client::{
    ConversationClient, ConversationState, ConversationView, HttpProxyApi, SAMPLE_QUESTIONS,
    Sender,
};
use cricket_service::config::load_config;
use cricket_service::i18n::I18n;

/// Prints each message once, plus a typing line while a reply is pending
struct TerminalView {
    shown: usize,
    was_awaiting: bool,
    last_pending: String,
    thinking: String,
}

impl TerminalView {
    fn new(thinking: String) -> Self {
        Self {
            shown: 0,
            was_awaiting: false,
            last_pending: String::new(),
            thinking,
        }
    }
}

impl ConversationView for TerminalView {
    fn render(&mut self, state: &ConversationState) {
        let mut out = std::io::stdout().lock();

        for message in &state.messages()[self.shown..] {
            let who = match message.sender {
                Sender::User => "You",
                Sender::Assistant => "Cricket AI",
            };
            let time = message.timestamp.with_timezone(&Local).format("%H:%M");
            let _ = writeln!(out, "[{}] {}: {}", time, who, message.content);
        }
        self.shown = state.messages().len();

        if state.is_awaiting_reply() && !self.was_awaiting {
            let _ = writeln!(out, "{}", self.thinking);
        }
        self.was_awaiting = state.is_awaiting_reply();

        if state.pending_input() != self.last_pending {
            if !state.pending_input().is_empty() {
                let _ = writeln!(out, "> {}  (press enter to send)", state.pending_input());
            }
            self.last_pending = state.pending_input().to_string();
        }
    }

    fn scroll_to_bottom(&mut self) {
        let _ = std::io::stdout().flush();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = load_config()?;
    let i18n = Arc::new(I18n::new());
    let api = HttpProxyApi::new(&config.client)?;
    info!(proxy = %config.client.proxy_url, "Starting chat");

    let view = TerminalView::new(i18n.get("en", "chat-thinking", None));
    let client = ConversationClient::new(api, view, i18n.clone(), config.client.reply_delay());
    let (tx, rx) = mpsc::channel(16);
    let conversation = tokio::spawn(client.run(rx));

    println!("{}", i18n.get("en", "chat-welcome", None));
    println!("{}\n", i18n.get("en", "chat-welcome-hint", None));
    print_samples();
    println!("\n{}\n", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Ok(Command::Action(action)) => {
                if tx.send(action).await.is_err() {
                    break;
                }
            }
            Ok(Command::ShowSamples) => print_samples(),
            Ok(Command::Help) => println!("{}", HELP),
            Ok(Command::Quit) => break,
            Err(message) => eprintln!("{}", message),
        }
    }

    drop(tx);
    let state = conversation.await?;
    info!(messages = state.messages().len(), "Chat closed");

    Ok(())
}

fn print_samples() {
    for (i, sample) in SAMPLE_QUESTIONS.iter().enumerate() {
        println!("  {}. {}: {}", i + 1, sample.title, sample.question);
    }
}

fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    // Chat output owns stdout; logs go to stderr and stay quiet by default
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cricket_service=warn,cricket_chat=warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
