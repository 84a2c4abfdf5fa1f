//! Pull unread Gmail messages into the local store.
//!
//! One-way: existing files are never rewritten, so queued offline actions are
//! left alone.

pub mod normalize;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sha1::{Digest, Sha1};

use crate::remote::Remote;
use crate::remote::auth;
use crate::store::Store;
use crate::store::email::Email;
use crate::util::{gmail_date, parse_date_arg, short_id, truncate};

use self::normalize::normalize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PullSummary {
    pub available: usize,
    pub processed: usize,
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Storage id for a Gmail message: lowercase hex SHA-1 of its native id.
pub fn storage_id(gmail_id: &str) -> String {
    hex::encode(Sha1::digest(gmail_id.as_bytes()))
}

pub fn unread_query(since: NaiveDate) -> String {
    format!("is:unread in:inbox after:{}", gmail_date(since))
}

/// Fetch every unread inbox message since `since`, newest first.
///
/// A listing failure aborts the pull; a failure fetching one message's
/// detail only drops that message.
pub fn fetch_unread(
    remote: &mut dyn Remote,
    since: NaiveDate,
) -> crate::error::Result<Vec<Email>> {
    let query = unread_query(since);
    let mut emails = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let page = remote.list_messages(&query, page_token.as_deref())?;
        for msg in &page.messages {
            match remote.get_message(&msg.id) {
                Ok(full) => emails.push(normalize(&full)),
                Err(e) => tracing::warn!("Failed to fetch message {}: {}", msg.id, e),
            }
        }
        page_token = page.next_page_token.filter(|t| !t.is_empty());
        if page_token.is_none() {
            break;
        }
    }

    emails.sort_by(|a, b| b.received_date_time.cmp(&a.received_date_time));
    Ok(emails)
}

fn email_ref(id: &str, subject: &str) -> String {
    format!("({}+{})", short_id(id), truncate(subject, 64))
}

/// Write one pulled email unless a file for it already exists.
/// Returns `true` if it was written.
pub fn store_email(
    store: &Store,
    email: &Email,
    now: DateTime<Utc>,
) -> crate::error::Result<bool> {
    let id = storage_id(&email.gmail_id);
    if store.exists(&id) {
        println!("\u{2298} Skipped (exists): {}", email_ref(&id, &email.subject));
        return Ok(false);
    }
    let mut stored = email.clone();
    stored.stored_id = Some(id.clone());
    stored.stored_at = Some(now);
    store.save(&id, &stored)?;
    println!("\u{2713} Stored: {}", email_ref(&id, &email.subject));
    Ok(true)
}

/// Fetch and store unread messages. `limit` caps how many are processed.
/// A write failure for one email is reported and counted; the rest go on.
pub fn ingest(
    remote: &mut dyn Remote,
    store: &Store,
    since: NaiveDate,
    limit: Option<usize>,
) -> Result<PullSummary> {
    store.ensure_dir()?;
    let emails = fetch_unread(remote, since)?;
    let mut summary = PullSummary {
        available: emails.len(),
        ..Default::default()
    };

    if emails.is_empty() {
        println!("No unread emails found.");
        return Ok(summary);
    }
    println!("Found {} unread emails.", emails.len());

    for email in &emails {
        if let Some(limit) = limit {
            if summary.processed >= limit {
                println!("\nReached processing limit of {}. Stopping.", limit);
                break;
            }
        }
        match store_email(store, email, Utc::now()) {
            Ok(true) => summary.written += 1,
            Ok(false) => summary.skipped += 1,
            Err(e) => {
                let id = storage_id(&email.gmail_id);
                println!("\u{2717} Failed: {}: {}", email_ref(&id, &email.subject), e);
                tracing::warn!(gmail_id = %email.gmail_id, "failed to store email: {}", e);
                summary.failed += 1;
            }
        }
        summary.processed += 1;
    }
    Ok(summary)
}

/// google-email pull --since DATE [--limit N]
pub fn run(since: &str, limit: Option<usize>) -> Result<()> {
    let since = parse_date_arg(since)?;
    if limit == Some(0) {
        anyhow::bail!("--limit must be a positive number");
    }
    auth::require_credentials()?;

    println!("Fetching unread emails since: {}", since.format("%Y-%m-%d"));
    if let Some(limit) = limit {
        println!("Processing limit: {}", limit);
    }

    let mut client = auth::connect()?;
    let store = Store::open();
    let summary = ingest(&mut client, &store, since, limit)?;

    if summary.available > 0 {
        println!("\nSummary:");
        println!("  Available:  {}", summary.available);
        println!("  Processed:  {}", summary.processed);
        println!("  Written:    {}", summary.written);
        println!("  Skipped:    {}", summary.skipped);
        if summary.failed > 0 {
            println!("  Failed:     {}", summary.failed);
        }
    }
    Ok(())
}
