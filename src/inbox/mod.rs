//! Browse the local mailbox.

pub mod list;
pub mod summary;
pub mod view;

use crate::store::email::Email;

/// Whether an email shows up in the default inbox listing: unread locally
/// and not queued to leave the inbox.
pub fn is_visible(email: &Email) -> bool {
    !email.is_read_locally() && !email.has_pending_removal()
}
