//! Session Todos - Main Entry Point
//!
//! Runs one interactive todo session on stdin/stdout.
//! The actual implementation is in the `session_todos` library.

use anyhow::Result;
use clap::Parser;
use session_todos::config::{Config, IdScheme};
use session_todos::formatting::format_notification;
use session_todos::notification::{Notification, TimedSurface};
use session_todos::{MemorySessionStore, Shell, TodoList, logging};
use std::path::PathBuf;
use tokio::io::BufReader;

/// Session Todos - a todo list that lives as long as the session
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Session storage allotment in bytes
    #[arg(long)]
    quota_bytes: Option<usize>,

    /// Auto-dismiss delay for notifications, in milliseconds
    #[arg(long)]
    notification_ms: Option<u64>,

    /// Use short "#n" ids instead of UUIDs
    #[arg(long)]
    sequential_ids: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(quota_bytes) = args.quota_bytes {
        config.quota_bytes = quota_bytes;
    }
    if let Some(notification_ms) = args.notification_ms {
        config.notification_ms = notification_ms;
    }
    if args.sequential_ids {
        config.id_scheme = IdScheme::Sequential;
    }
    logging::init(&config.log_level)?;

    let list = TodoList::new(
        MemorySessionStore::with_quota(config.quota_bytes),
        config.id_generator(),
    );
    let surface = TimedSurface::new(|notification: &Notification| {
        println!("{}", format_notification(notification));
    });
    let (shell, dismissals) = Shell::new(list, surface, config.notification_duration());

    shell
        .run(BufReader::new(tokio::io::stdin()), dismissals)
        .await
}
