use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::markup::MarkupPolicy;
use crate::typewriter::TypewriterMode;

/// Text revealed by `page-widgets type` when none is given.
pub const DEFAULT_TYPEWRITER_TEXT: &str =
    "Привіт! Я баскетбольний AI-асистент.<br>Запитай мене про гру, команди чи гравців.";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Base URL of the server hosting the chat endpoint
    #[arg(long, env = "CHAT_BASE_URL")]
    pub base_url: Option<String>,

    /// Log output format
    #[arg(long, value_enum, env = "LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Render markup unescaped
    #[arg(long)]
    pub raw_markup: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Reveal text one unit at a time
    Type {
        /// Text to reveal (`<br>` renders as a line break)
        text: Option<String>,
        /// Ignore the line-break marker
        #[arg(long)]
        plain: bool,
    },
    /// Chat with the server, one message per stdin line
    Chat,
    /// Append one to-do entry per stdin line
    Todo,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub chat: ChatConfig,
    pub typewriter: TypewriterConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    pub base_url: String,
    pub endpoint: String,
    pub csrf_cookie: String,
    pub csrf_header: String,
    /// `document.cookie` of the hosted page.
    pub cookie: String,
    pub markup: MarkupPolicy,
    /// Render only the reply to the most recent send.
    pub discard_stale_replies: bool,
    pub timeout_secs: Option<u64>,
}

impl ChatConfig {
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            endpoint: "/chat/".to_string(),
            csrf_cookie: "csrftoken".to_string(),
            csrf_header: "X-CSRFToken".to_string(),
            cookie: String::new(),
            markup: MarkupPolicy::default(),
            discard_stale_replies: false,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TypewriterConfig {
    pub tick_ms: u64,
    pub mode: TypewriterMode,
    pub markup: MarkupPolicy,
    pub text: String,
}

impl TypewriterConfig {
    #[must_use]
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            tick_ms: 25,
            mode: TypewriterMode::default(),
            markup: MarkupPolicy::default(),
            text: DEFAULT_TYPEWRITER_TEXT.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl AppConfig {
    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Self::from_cli(&cli)
    }

    pub fn from_cli(cli: &Cli) -> Result<Self, config::ConfigError> {
        let chat = ChatConfig::default();
        let typewriter = TypewriterConfig::default();

        // 1. Defaults
        let mut builder = Config::builder()
            .set_default("chat.base_url", chat.base_url)?
            .set_default("chat.endpoint", chat.endpoint)?
            .set_default("chat.csrf_cookie", chat.csrf_cookie)?
            .set_default("chat.csrf_header", chat.csrf_header)?
            .set_default("chat.cookie", chat.cookie)?
            .set_default("chat.markup", "sanitized")?
            .set_default("chat.discard_stale_replies", chat.discard_stale_replies)?
            .set_default("typewriter.tick_ms", typewriter.tick_ms)?
            .set_default("typewriter.mode", "marker_aware")?
            .set_default("typewriter.markup", "sanitized")?
            .set_default("typewriter.text", typewriter.text)?
            .set_default("logging.format", LogFormat::default().as_str())?
            .set_default("logging.filter", "info")?;

        // 2. Config file: explicit path must exist, ./page-widgets.{yaml,toml,json} may
        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path).required(true)),
            None => builder.add_source(File::with_name("page-widgets").required(false)),
        };

        // 3. Environment, e.g. WIDGETS_CHAT__BASE_URL
        builder = builder.add_source(
            Environment::with_prefix("WIDGETS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI flags win
        if let Some(url) = &cli.base_url {
            builder = builder.set_override("chat.base_url", url.as_str())?;
        }
        if let Some(format) = cli.log_format {
            builder = builder.set_override("logging.format", format.as_str())?;
        }
        if cli.raw_markup {
            builder = builder
                .set_override("chat.markup", "raw")?
                .set_override("typewriter.markup", "raw")?;
        }
        if let Some(Command::Type { plain: true, .. }) = &cli.command {
            builder = builder.set_override("typewriter.mode", "plain")?;
        }

        builder.build()?.try_deserialize()
    }
}
