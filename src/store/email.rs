//! Email record types as stored in the front matter of each `.md` file.
//!
//! Keys are camelCase so files written by earlier versions of the tool load
//! unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::Offline;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Html,
    Text,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Html => "html",
            ContentType::Text => "text",
        }
    }
}

/// Message body. Only the content type goes into the front matter; the content
/// itself is written as a fenced block after it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[serde(default)]
    pub content_type: ContentType,
    #[serde(skip)]
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
    /// Gmail's own message id. Remote calls are made against this.
    #[serde(rename = "id", default)]
    pub gmail_id: String,
    #[serde(default)]
    pub thread_id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub from: Option<Address>,
    #[serde(default)]
    pub to_recipients: Vec<Address>,
    #[serde(default)]
    pub cc_recipients: Vec<Address>,
    #[serde(default)]
    pub bcc_recipients: Vec<Address>,
    #[serde(default)]
    pub received_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub label_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(default)]
    pub web_link: String,
    #[serde(rename = "_stored_id", default, skip_serializing_if = "Option::is_none")]
    pub stored_id: Option<String>,
    #[serde(rename = "_stored_at", default, skip_serializing_if = "Option::is_none")]
    pub stored_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Offline::is_empty")]
    pub offline: Offline,
    #[serde(default)]
    pub body: Body,
}

impl Email {
    /// Subject for display, with the placeholder used for empty subjects.
    pub fn display_subject(&self) -> &str {
        if self.subject.is_empty() {
            "(No Subject)"
        } else {
            &self.subject
        }
    }

    /// Whether the email counts as read locally: a queued read wins, then a
    /// queued unread, then the flag last seen on the server.
    pub fn is_read_locally(&self) -> bool {
        if self.offline.read.is_some() {
            return true;
        }
        if self.offline.unread.is_some() {
            return false;
        }
        self.is_read
    }

    /// Whether a queued action would take the email out of the inbox.
    pub fn has_pending_removal(&self) -> bool {
        self.offline.archive.is_some()
            || self.offline.move_to.is_some()
            || self.offline.delete.is_some()
    }
}

/// An email together with its storage id (the filename stem).
#[derive(Debug, Clone, PartialEq)]
pub struct StoredEmail {
    pub id: String,
    pub email: Email,
}
