//! Command reference for google-email.

use anyhow::Result;

const COMMANDS: &[(&str, &str)] = &[
    ("pull --since DATE [--limit N]", "Fetch unread inbox mail into the local store"),
    ("plan", "Review queued actions"),
    ("apply [--dry-run] [--strict]", "Apply queued actions to Gmail"),
    ("archive ID", "Queue an email for archive"),
    ("move ID FOLDER", "Queue a move to a label"),
    ("delete ID", "Queue an email for delete (trash)"),
    ("auth", "Gmail OAuth setup"),
    ("help [FILTER]", "Show this reference"),
];

const INBOX_COMMANDS: &[(&str, &str)] = &[
    ("inbox summary", "Counts for the local store"),
    ("inbox list [--limit N] [--since DATE] [--all]", "List emails, newest first"),
    ("inbox view ID", "Print a stored email"),
    ("inbox read ID", "Mark an email as read"),
    ("inbox unread ID", "Mark an email as unread"),
];

const DEV_COMMANDS: &[(&str, &str)] = &[
    ("cargo test", "Run tests"),
    ("cargo clippy", "Lint"),
    ("cargo fmt", "Format"),
];

pub fn run(filter: Option<&str>) -> Result<()> {
    if let Some(filter) = filter {
        if filter != "--dev" {
            let matches: Vec<(&str, &str)> = COMMANDS
                .iter()
                .chain(INBOX_COMMANDS.iter())
                .chain(DEV_COMMANDS.iter())
                .copied()
                .filter(|(name, _)| name.contains(filter))
                .collect();
            if matches.is_empty() {
                println!("No command matching '{}'", filter);
                std::process::exit(1);
            }
            print_table(&matches);
            return Ok(());
        }
    }

    println!("google-email commands\n");
    print_table(COMMANDS);

    println!("\ninbox commands\n");
    print_table(INBOX_COMMANDS);

    println!("\nDates: YYYY-MM-DD, today, yesterday, or \"N days ago\".");

    if filter == Some("--dev") || filter.is_none() {
        println!("\ndev commands\n");
        print_table(DEV_COMMANDS);
    }

    Ok(())
}

fn print_table(rows: &[(&str, &str)]) {
    let name_w = rows.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
    for (name, desc) in rows {
        println!("  {:<width$}  {}", name, desc, width = name_w);
    }
}
