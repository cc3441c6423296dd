//! Page Widgets terminal host
//!
//! Mounts the components on an in-memory page and prints what they render.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use page_widgets::chat::{ChatClient, HttpTransport};
use page_widgets::config::{AppConfig, Cli, Command};
use page_widgets::dom::SubmitEvent;
use page_widgets::scheduler::TokioScheduler;
use page_widgets::todo::TodoList;
use page_widgets::typewriter::{Step, TypewriterRenderer};
use page_widgets::{pages, telemetry, widgets};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    let cli = Cli::parse();
    let config = AppConfig::from_cli(&cli).context("failed to load configuration")?;
    telemetry::init(&config.logging);

    let command = cli.command.clone().unwrap_or(Command::Type {
        text: None,
        plain: false,
    });
    match command {
        Command::Type { text, .. } => {
            let text = text.unwrap_or_else(|| config.typewriter.text.clone());
            run_typewriter(&config, &text).await
        }
        Command::Chat => run_chat(&config).await,
        Command::Todo => run_todo().await,
    }
}

async fn run_typewriter(config: &AppConfig, text: &str) -> anyhow::Result<()> {
    let page = pages::home(text);
    let renderer = TypewriterRenderer::mount(&page, &config.typewriter)
        .context("typewriter target missing")?;

    let report = renderer
        .run_with(&TokioScheduler, |step| {
            let mut out = std::io::stdout().lock();
            let _ = match step {
                Step::Char(ch) => write!(out, "{ch}"),
                Step::LineBreak => writeln!(out),
            };
            let _ = out.flush();
        })
        .await;
    println!();

    info!(name: "host.typewriter.done", steps = report.steps(), "Typewriter host finished");
    Ok(())
}

async fn run_chat(config: &AppConfig) -> anyhow::Result<()> {
    let transport = Arc::new(HttpTransport::from_config(&config.chat)?);
    info!(
        name: "host.chat.ready",
        endpoint = %transport.endpoint(),
        "Chat host ready"
    );

    let page = pages::chat(&config.chat.cookie);
    let chat: ChatClient = widgets::mount_all(&page, config, transport)
        .chat
        .context("chat elements missing")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown = 0;
    while let Some(line) = lines.next_line().await? {
        page.set_value(chat.context().input(), line);
        chat.send().await;

        let transcript = chat.transcript();
        for message in transcript.iter().skip(shown) {
            println!("[{}] {}", message.role, message.text);
        }
        shown = transcript.len();
    }
    Ok(())
}

async fn run_todo() -> anyhow::Result<()> {
    let page = pages::todo();
    let todo = TodoList::mount(&page)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        page.set_value(todo.input(), line);
        todo.submit(&mut SubmitEvent::new());

        for (n, item) in todo.items().iter().enumerate() {
            println!("{}. {item}", n + 1);
        }
    }
    Ok(())
}
