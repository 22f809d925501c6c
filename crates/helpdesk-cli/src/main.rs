//! `helpdesk` — command-line client for the helpdesk API.
//!
//! # Usage
//!
//! ```text
//! helpdesk submit --title "Cannot login" --priority high
//! helpdesk list --status open
//! helpdesk comment 12 --staff --name Sam
//! helpdesk resolve 12
//! helpdesk --url http://helpdesk.internal:3000 dashboard
//! ```

mod app;
mod client;
mod render;

use std::{io, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use helpdesk_core::{
  form::{CommentDraft, TicketDraft},
  ticket::{QuickAction, TicketId, TicketPriority, TicketStatus},
};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:3000";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "helpdesk", about = "Submit and manage support tickets")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the helpdesk server (default: http://localhost:3000).
  #[arg(long, env = "HELPDESK_URL")]
  url: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List tickets, newest first.
  List {
    /// all, open, in_progress, or resolved.
    #[arg(long)]
    status: Option<String>,
  },
  /// Show a ticket and its comments.
  Show { id: TicketId },
  /// Ticket counts and the most recently updated tickets.
  Dashboard,
  /// Submit a new ticket. Blank fields are prompted for.
  Submit {
    #[arg(long)]
    title:       Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long, default_value = "medium", value_parser = TicketPriority::parse)]
    priority:    TicketPriority,
    #[arg(long)]
    name:        Option<String>,
    #[arg(long)]
    email:       Option<String>,
  },
  /// Add a comment to a ticket.
  Comment {
    id:    TicketId,
    #[arg(long)]
    name:  Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    text:  Option<String>,
    /// Post as a staff member.
    #[arg(long)]
    staff: bool,
  },
  /// Set a ticket's status.
  Status {
    id:     TicketId,
    #[arg(value_parser = TicketStatus::parse)]
    status: TicketStatus,
  },
  /// Move a ticket to in progress.
  Start { id: TicketId },
  /// Mark a ticket as resolved.
  Resolve { id: TicketId },
  /// Reopen a ticket.
  Reopen { id: TicketId },
  /// Assign a ticket to a staff member.
  Assign { id: TicketId, name: String },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

/// CLI flags override config file, which overrides defaults.
fn resolve_url(flag: Option<String>, file: &ConfigFile) -> String {
  flag
    .or_else(|| (!file.url.is_empty()).then(|| file.url.clone()))
    .unwrap_or_else(|| DEFAULT_URL.to_string())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  match run(Args::parse()).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("error: {e}");
      for cause in e.chain().skip(1) {
        eprintln!("  caused by: {cause}");
      }
      ExitCode::FAILURE
    }
  }
}

async fn run(args: Args) -> Result<()> {
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let client = ApiClient::new(ApiConfig { base_url: resolve_url(args.url, &file_cfg) })?;
  let app = App::new(client);

  let stdin = io::stdin();
  let mut input = stdin.lock();
  let mut output = io::stdout();

  let shown = match args.command {
    Command::List { status } => app.list(status.as_deref()).await?,
    Command::Show { id } => app.show(id, false).await?,
    Command::Dashboard => app.dashboard().await?,
    Command::Submit { title, description, priority, name, email } => {
      let draft = TicketDraft {
        title: title.unwrap_or_default(),
        description: description.unwrap_or_default(),
        priority,
        customer_name: name.unwrap_or_default(),
        customer_email: email.unwrap_or_default(),
      };
      app.submit(draft, &mut input, &mut output).await?
    }
    Command::Comment { id, name, email, text, staff } => {
      let draft = CommentDraft {
        author_name: name.unwrap_or_default(),
        author_email: email.unwrap_or_default(),
        comment: text.unwrap_or_default(),
        is_staff: staff,
        ..CommentDraft::new(id)
      };
      app.comment(draft, &mut input, &mut output).await?
    }
    Command::Status { id, status } => app.set_status(id, status).await?,
    Command::Start { id } => app.set_status(id, QuickAction::StartWorking.target()).await?,
    Command::Resolve { id } => app.set_status(id, QuickAction::MarkResolved.target()).await?,
    Command::Reopen { id } => app.set_status(id, QuickAction::Reopen.target()).await?,
    Command::Assign { id, name } => app.assign(id, &name).await?,
  };

  print!("{shown}");
  Ok(())
}
