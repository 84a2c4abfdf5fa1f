use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::inbox::list::DEFAULT_LIMIT;

#[derive(Parser)]
#[command(
    name = "google-email",
    version,
    about = "Triage Gmail offline: pull unread mail, queue actions, apply them later",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Data directory (default: resolved from env, config, or ~/Documents/google-email)
    #[arg(long, global = true, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse the local mailbox
    #[command(subcommand)]
    Inbox(InboxCommands),

    /// Queue an email for archive
    Archive {
        /// Email id, filename, or unique id prefix
        id: String,
    },

    /// Queue an email to move to a label
    Move {
        /// Email id, filename, or unique id prefix
        id: String,

        /// Target label name (created on apply if missing)
        folder: String,
    },

    /// Queue an email for delete (moved to Gmail trash)
    Delete {
        /// Email id, filename, or unique id prefix
        id: String,
    },

    /// Review queued actions
    Plan,

    /// Apply queued actions to Gmail
    Apply {
        /// Show what would be applied without contacting Gmail
        #[arg(long)]
        dry_run: bool,

        /// Stop clearing applied actions after the first failure in the run
        #[arg(long)]
        strict: bool,
    },

    /// Fetch unread inbox mail into the local store
    Pull {
        /// Earliest date: YYYY-MM-DD, today, yesterday, or "N days ago"
        #[arg(long)]
        since: String,

        /// Process at most N emails
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Gmail OAuth setup
    Auth,

    /// Show command reference
    Help {
        /// Filter commands by name (or --dev)
        #[arg(allow_hyphen_values = true)]
        filter: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum InboxCommands {
    /// Show counts for the local store
    Summary,

    /// List emails, newest first
    List {
        /// Maximum number of emails to show
        #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        /// Only emails received on or after DATE
        #[arg(long)]
        since: Option<String>,

        /// Include read emails and emails queued to leave the inbox
        #[arg(long)]
        all: bool,
    },

    /// Print a stored email
    View {
        /// Email id, filename, or unique id prefix
        id: String,
    },

    /// Mark an email as read
    Read {
        /// Email id, filename, or unique id prefix
        id: String,
    },

    /// Mark an email as unread
    Unread {
        /// Email id, filename, or unique id prefix
        id: String,
    },
}
