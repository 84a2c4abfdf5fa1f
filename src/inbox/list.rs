//! List emails from the local store, newest first.

use anyhow::Result;
use chrono::{NaiveDate, Utc};

use super::is_visible;
use crate::store::Store;
use crate::store::email::StoredEmail;
use crate::util::{format_age, format_sender, parse_date_arg, short_id, truncate};

pub const DEFAULT_LIMIT: usize = 10;

/// Pick the emails to show: visible ones unless `all`, received on or after
/// `since`, newest first, at most `limit`.
pub fn select(
    mut emails: Vec<StoredEmail>,
    since: Option<NaiveDate>,
    all: bool,
    limit: usize,
) -> Vec<StoredEmail> {
    emails.retain(|s| all || is_visible(&s.email));
    if let Some(since) = since {
        emails.retain(|s| {
            s.email
                .received_date_time
                .is_some_and(|at| at.date_naive() >= since)
        });
    }
    emails.sort_by(|a, b| {
        b.email
            .received_date_time
            .cmp(&a.email.received_date_time)
            .then_with(|| a.id.cmp(&b.id))
    });
    emails.truncate(limit);
    emails
}

/// google-email inbox list [--limit N] [--since DATE] [--all]
pub fn run(limit: usize, since: Option<&str>, all: bool) -> Result<()> {
    if limit == 0 {
        anyhow::bail!("--limit must be a positive number");
    }
    let since = since.map(parse_date_arg).transpose()?;
    let store = Store::open();
    let emails = select(store.load_all()?, since, all, limit);

    if emails.is_empty() {
        if all {
            println!("No emails in {}", store.dir().display());
        } else {
            println!("No unread emails.");
        }
        println!("Run 'google-email pull --since DATE' to fetch mail.");
        return Ok(());
    }

    let now = Utc::now();
    let senders: Vec<String> = emails
        .iter()
        .map(|s| truncate(&format_sender(&s.email), 24))
        .collect();
    let sender_w = senders.iter().map(|s| s.chars().count()).max().unwrap_or(0);

    for (i, (stored, sender)) in emails.iter().zip(&senders).enumerate() {
        let age = stored
            .email
            .received_date_time
            .map(|at| format_age(at, now))
            .unwrap_or_else(|| "?".to_string());
        println!(
            "{:>3}. {}  {:>4}  {:<width$}  {}",
            i + 1,
            short_id(&stored.id),
            age,
            sender,
            truncate(stored.email.display_subject(), 50),
            width = sender_w
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Action;
    use crate::store::email::Email;
    use chrono::TimeZone;

    fn stored(id: &str, day: u32, is_read: bool) -> StoredEmail {
        StoredEmail {
            id: id.to_string(),
            email: Email {
                subject: format!("Subject {}", id),
                received_date_time: Some(Utc.with_ymd_and_hms(2026, 2, day, 9, 0, 0).unwrap()),
                is_read,
                ..Default::default()
            },
        }
    }

    fn ids(emails: &[StoredEmail]) -> Vec<&str> {
        emails.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_select_newest_first_and_limit() {
        let emails = vec![stored("a", 1, false), stored("b", 3, false), stored("c", 2, false)];
        assert_eq!(ids(&select(emails, None, false, 2)), vec!["b", "c"]);
    }

    #[test]
    fn test_select_hides_read_and_queued_removals() {
        let mut queued_read = stored("r", 4, false);
        queued_read.email.offline.queue(&Action::Read, Utc::now());
        let mut archived = stored("x", 5, false);
        archived.email.offline.queue(&Action::Archive, Utc::now());
        let mut reopened = stored("u", 6, true);
        reopened.email.offline.queue(&Action::Unread, Utc::now());
        let emails = vec![
            stored("a", 1, false),
            stored("b", 2, true),
            queued_read,
            archived,
            reopened,
        ];

        assert_eq!(ids(&select(emails.clone(), None, false, 10)), vec!["u", "a"]);
        assert_eq!(select(emails, None, true, 10).len(), 5);
    }

    #[test]
    fn test_select_since() {
        let emails = vec![stored("a", 1, false), stored("b", 3, false), stored("c", 2, false)];
        let since = NaiveDate::from_ymd_opt(2026, 2, 2).unwrap();
        assert_eq!(ids(&select(emails, Some(since), false, 10)), vec!["b", "c"]);
    }
}
