//! Counts over the local store.

use anyhow::Result;

use crate::store::Store;
use crate::store::email::StoredEmail;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InboxCounts {
    pub total: usize,
    pub unread: usize,
    pub read: usize,
    pub pending: usize,
}

pub fn count(emails: &[StoredEmail]) -> InboxCounts {
    let mut counts = InboxCounts {
        total: emails.len(),
        ..Default::default()
    };
    for stored in emails {
        if stored.email.is_read_locally() {
            counts.read += 1;
        } else {
            counts.unread += 1;
        }
        if !stored.email.offline.is_empty() {
            counts.pending += 1;
        }
    }
    counts
}

/// google-email inbox summary
pub fn run() -> Result<()> {
    let store = Store::open();
    let counts = count(&store.load_all()?);

    println!("Inbox: {}\n", store.dir().display());
    println!("  Total:    {}", counts.total);
    println!("  Unread:   {}", counts.unread);
    println!("  Read:     {}", counts.read);
    println!("  Pending:  {} email(s) with queued actions", counts.pending);
    if counts.pending > 0 {
        println!("\nRun 'google-email plan' to review queued actions.");
    }
    Ok(())
}
