//! Queue offline actions against a stored email.

use anyhow::Result;
use chrono::Utc;

use crate::ledger::{Action, QueueOutcome};
use crate::store::Store;
use crate::store::email::StoredEmail;
use crate::util::{short_id, truncate};

/// Queue `action` on the email at `id`, saving it on success.
pub fn queue_action(
    store: &Store,
    id: &str,
    action: &Action,
) -> Result<(StoredEmail, QueueOutcome)> {
    let StoredEmail { id, mut email } = store.find(id)?;
    let outcome = email.offline.queue(action, Utc::now());
    if outcome == QueueOutcome::Queued {
        store.save(&id, &email)?;
    }
    Ok((StoredEmail { id, email }, outcome))
}

/// google-email archive|move|delete|inbox read|inbox unread <id>
pub fn run(id: &str, action: Action) -> Result<()> {
    let store = Store::open();
    let (stored, outcome) = queue_action(&store, id, &action)?;
    let subject = truncate(stored.email.display_subject(), 60);

    match outcome {
        QueueOutcome::AlreadyQueued => {
            println!(
                "\u{2298} Already queued ({}): {}",
                action.describe(),
                short_id(&stored.id)
            );
            println!("  {}", subject);
        }
        QueueOutcome::Queued => {
            println!("\u{2713} {}: {}", action.queued_phrase(), short_id(&stored.id));
            println!("  {}", subject);
            println!("\nRun 'google-email plan' to review, 'google-email apply' to sync to Gmail.");
        }
    }
    Ok(())
}
