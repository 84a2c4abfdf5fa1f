//! Remote mailbox client: the operations the reconciler and the ingestor need.

pub mod auth;
pub mod gmail;
pub mod types;

use crate::error::Result;

use self::types::{Label, ListMessagesResponse, Message};

pub const UNREAD: &str = "UNREAD";
pub const INBOX: &str = "INBOX";

pub trait Remote {
    /// One page of message ids matching a Gmail search query.
    fn list_messages(&mut self, query: &str, page_token: Option<&str>)
        -> Result<ListMessagesResponse>;

    /// Full message detail, including the MIME payload.
    fn get_message(&mut self, id: &str) -> Result<Message>;

    /// Add and remove labels in one call.
    fn modify_message(&mut self, id: &str, add: &[&str], remove: &[&str]) -> Result<()>;

    fn trash_message(&mut self, id: &str) -> Result<()>;

    fn list_labels(&mut self) -> Result<Vec<Label>>;

    /// Create a user label visible in both the label list and message list.
    fn create_label(&mut self, name: &str) -> Result<Label>;
}
