//! Counsel application binary - composition root.
//!
//! Ties together all Counsel crates into a terminal chat client:
//! 1. Load configuration from TOML
//! 2. Open the persisted chat store (JSON snapshot on disk)
//! 3. Wire the HTTP backend client and the PDF extractor
//! 4. Run a line-oriented chat loop with slash commands

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use counsel_chat::{SendOutcome, SessionOrchestrator};
use counsel_client::{AssistantBackend, HttpAssistantClient};
use counsel_core::config::CounselConfig;
use counsel_core::types::Chat;
use counsel_extract::{AttachedFile, DocumentExtractor, PdfExtractor, PDF_MIME_TYPE};
use counsel_store::{ChatStore, JsonFileAdapter};

mod cli;
use cli::CliArgs;

const HELP: &str = "\
Commands:
  /new              start a new chat
  /list             list chats
  /open <n>         open chat n from /list
  /delete <n>       delete chat n from /list
  /attach <path>    attach a PDF to the next message
  /files            show pending attachments
  /detach <n>       remove pending attachment n
  /health           query backend health
  /help             show this help
  /quit             exit
Anything else is sent as a message.";

/// Expand a leading `~/` to the user's home directory.
fn resolve_data_dir(raw: &str) -> PathBuf {
    if raw.starts_with("~/") || raw.starts_with("~\\") {
        #[cfg(target_os = "windows")]
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string());
        #[cfg(not(target_os = "windows"))]
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        return PathBuf::from(home).join(&raw[2..]);
    }
    PathBuf::from(raw)
}

struct App {
    store: Arc<ChatStore>,
    extractor: Arc<dyn DocumentExtractor>,
    backend: Arc<dyn AssistantBackend>,
    client: Arc<HttpAssistantClient>,
    config: CounselConfig,
    orchestrator: SessionOrchestrator,
}

impl App {
    /// Build a fresh orchestrator, as when a chat view is (re)opened. The
    /// previous session id and its server-side document context are dropped.
    fn reopen_view(&mut self) {
        self.orchestrator = SessionOrchestrator::new(
            Arc::clone(&self.store),
            Arc::clone(&self.extractor),
            Arc::clone(&self.backend),
            self.config.upload.clone(),
        );
    }

    fn nth_chat(&self, arg: &str) -> Option<Chat> {
        let n: usize = arg.trim().parse().ok()?;
        self.store.chats().ok()?.into_iter().nth(n.checked_sub(1)?)
    }

    async fn handle_command(&mut self, line: &str) -> Result<bool, Box<dyn std::error::Error>> {
        let (command, arg) = match line.split_once(' ') {
            Some((c, a)) => (c, a.trim()),
            None => (line, ""),
        };

        match command {
            "/quit" | "/exit" => return Ok(false),
            "/help" => println!("{}", HELP),
            "/new" => {
                let chat = Chat::new("New Chat");
                let id = chat.id;
                self.store.add_chat(chat)?;
                self.store.set_current_chat(Some(id))?;
                self.reopen_view();
                println!("Started a new chat.");
            }
            "/list" => {
                let current = self.store.current_chat_id()?;
                for (i, chat) in self.store.chats()?.iter().enumerate() {
                    let marker = if current == Some(chat.id) { "*" } else { " " };
                    println!(
                        "{} {:>3}. {} ({} messages)",
                        marker,
                        i + 1,
                        chat.title,
                        chat.messages.len()
                    );
                }
            }
            "/open" => match self.nth_chat(arg) {
                Some(chat) => {
                    self.store.set_current_chat(Some(chat.id))?;
                    self.reopen_view();
                    for message in &chat.messages {
                        let who = if message.is_user { "you" } else { "counsel" };
                        println!("[{}] {}: {}", message.timestamp, who, message.text);
                    }
                }
                None => println!("No such chat. Use /list."),
            },
            "/delete" => match self.nth_chat(arg) {
                Some(chat) => {
                    let was_active = self.store.current_chat_id()? == Some(chat.id);
                    self.store.delete_chat(chat.id)?;
                    if was_active {
                        // The view the orchestrator belonged to is gone.
                        self.reopen_view();
                    }
                    println!("Deleted \"{}\".", chat.title);
                }
                None => println!("No such chat. Use /list."),
            },
            "/attach" => {
                if arg.is_empty() {
                    println!("Usage: /attach <path-to-pdf>");
                } else {
                    match std::fs::read(arg) {
                        Ok(bytes) => {
                            let name = PathBuf::from(arg)
                                .file_name()
                                .map(|n| n.to_string_lossy().to_string())
                                .unwrap_or_else(|| arg.to_string());
                            let file = AttachedFile::new(name, PDF_MIME_TYPE, bytes);
                            let outcome = self.orchestrator.select_files(vec![file])?;
                            if let Some(notice) = outcome.notice {
                                println!("{}", notice);
                            } else if outcome.accepted == 1 {
                                println!("Attached.");
                            }
                        }
                        Err(e) => println!("Cannot read {}: {}", arg, e),
                    }
                }
            }
            "/files" => {
                let names = self.orchestrator.attachment_names()?;
                if names.is_empty() {
                    println!("No pending attachments.");
                }
                for (i, name) in names.iter().enumerate() {
                    println!("{:>3}. {}", i + 1, name);
                }
            }
            "/detach" => {
                if let Ok(n) = arg.parse::<usize>() {
                    if n >= 1 {
                        self.orchestrator.remove_attachment(n - 1)?;
                    }
                }
            }
            "/health" => match self.client.health().await {
                Ok(health) => println!(
                    "status={} documents_loaded={} using={}",
                    health.status, health.documents_loaded, health.using
                ),
                Err(e) => println!("Backend unreachable: {}", e.user_message()),
            },
            _ => println!("Unknown command. /help for the list."),
        }
        Ok(true)
    }

    async fn handle_message(&mut self, line: &str) -> Result<(), Box<dyn std::error::Error>> {
        if self.store.current_chat()?.is_none() {
            let chat = Chat::new("New Chat");
            let id = chat.id;
            self.store.add_chat(chat)?;
            self.store.set_current_chat(Some(id))?;
        }

        self.orchestrator.set_draft(line)?;
        match self.orchestrator.send().await {
            Ok(SendOutcome::Completed) => {
                if let Some(chat) = self.store.current_chat()? {
                    if let Some(reply) = chat.messages.iter().rev().find(|m| !m.is_user) {
                        println!("counsel: {}", reply.text);
                    }
                }
            }
            Ok(SendOutcome::Ignored) => {}
            Err(e) => println!("{}", e),
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config first so the log level can come from it.
    let config_file = args.resolve_config_path();
    let mut config = CounselConfig::load_or_default(&config_file);
    config.backend.base_url = args.resolve_base_url(&config.backend.base_url);
    if let Some(dir) = args.resolve_data_dir() {
        config.general.data_dir = dir;
    }
    if let Some(level) = args.resolve_log_level() {
        config.general.log_level = level;
    }

    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting Counsel v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Storage.
    let data_dir = resolve_data_dir(&config.general.data_dir);
    std::fs::create_dir_all(&data_dir)?;
    let snapshot_path = data_dir.join("chat-storage.json");
    let store = Arc::new(ChatStore::new(Arc::new(JsonFileAdapter::new(
        &snapshot_path,
    )))?);
    tracing::info!(path = %snapshot_path.display(), "Chat store opened");

    // Backend client and extractor.
    let client = Arc::new(HttpAssistantClient::new(
        config.backend.base_url.clone(),
        Duration::from_secs(config.backend.timeout_secs),
    )?);
    let extractor: Arc<dyn DocumentExtractor> =
        Arc::new(PdfExtractor::new(config.upload.min_extracted_chars));
    let backend: Arc<dyn AssistantBackend> = client.clone();

    let orchestrator = SessionOrchestrator::new(
        Arc::clone(&store),
        Arc::clone(&extractor),
        Arc::clone(&backend),
        config.upload.clone(),
    );
    let mut app = App {
        store,
        extractor,
        backend,
        client,
        config,
        orchestrator,
    };

    println!("Counsel ready. /help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('/') {
            if !app.handle_command(&line).await? {
                break;
            }
        } else {
            app.handle_message(&line).await?;
        }
    }

    tracing::info!("Counsel shutting down");
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
