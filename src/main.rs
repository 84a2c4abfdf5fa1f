use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use google_email::cli::{Cli, Commands, InboxCommands};
use google_email::ledger::Action;

fn init_logging() {
    let filter = EnvFilter::try_from_env("GOOGLE_EMAIL_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    if let Some(dir) = cli.data_dir {
        google_email::resolve::set_data_dir(dir);
    }

    match cli.command {
        Commands::Inbox(cmd) => match cmd {
            InboxCommands::Summary => google_email::inbox::summary::run(),
            InboxCommands::List { limit, since, all } => {
                google_email::inbox::list::run(limit, since.as_deref(), all)
            }
            InboxCommands::View { id } => google_email::inbox::view::run(&id),
            InboxCommands::Read { id } => google_email::queue::run(&id, Action::Read),
            InboxCommands::Unread { id } => google_email::queue::run(&id, Action::Unread),
        },
        Commands::Archive { id } => google_email::queue::run(&id, Action::Archive),
        Commands::Move { id, folder } => google_email::queue::run(&id, Action::Move(folder)),
        Commands::Delete { id } => google_email::queue::run(&id, Action::Delete),
        Commands::Plan => google_email::plan::run(),
        Commands::Apply { dry_run, strict } => google_email::apply::run(dry_run, strict),
        Commands::Pull { since, limit } => google_email::pull::run(&since, limit),
        Commands::Auth => google_email::remote::auth::run(),
        Commands::Help { filter } => google_email::help::run(filter.as_deref()),
    }
}
