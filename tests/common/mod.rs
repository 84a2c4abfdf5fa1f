//! Shared test fixtures and helpers.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use google_email::error::{Error, Result};
use google_email::ledger::Action;
use google_email::remote::Remote;
use google_email::remote::types::{
    Header, Label, ListMessagesResponse, Message, MessagePart, MessagePartBody, MessageRef,
};
use google_email::store::Store;
use google_email::store::email::{Address, Body, ContentType, Email};

/// Create a temporary data directory with an empty storage/ subdirectory.
pub fn temp_data_dir() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().expect("failed to create temp dir");
    let data_dir = tmp.path().to_path_buf();
    std::fs::create_dir_all(data_dir.join("storage")).unwrap();
    (tmp, data_dir)
}

pub fn temp_store() -> (TempDir, Store) {
    let (tmp, data_dir) = temp_data_dir();
    (tmp, Store::new(data_dir.join("storage")))
}

/// Write a placeholder credentials.json into a data directory.
pub fn write_credentials(data_dir: &std::path::Path) {
    std::fs::write(
        data_dir.join("credentials.json"),
        r#"{"installed": {"client_id": "id", "client_secret": "secret"}}"#,
    )
    .unwrap();
}

/// A plain unread inbox email with a Gmail id derived from `id`.
pub fn sample_email(id: &str, subject: &str) -> Email {
    Email {
        gmail_id: format!("gm-{}", id),
        thread_id: format!("th-{}", id),
        subject: subject.to_string(),
        from: Some(Address {
            name: "Alice".to_string(),
            address: "alice@example.com".to_string(),
        }),
        to_recipients: vec![Address {
            name: String::new(),
            address: "me@example.com".to_string(),
        }],
        received_date_time: Some(Utc.with_ymd_and_hms(2026, 2, 10, 9, 30, 0).unwrap()),
        is_read: false,
        label_ids: vec!["INBOX".to_string(), "UNREAD".to_string()],
        web_link: format!("https://mail.google.com/mail/u/0/#inbox/gm-{}", id),
        body: Body {
            content_type: ContentType::Text,
            content: format!("Body of {}", subject),
        },
        ..Default::default()
    }
}

/// Save `email` under `id` after queuing `actions` on it.
pub fn seed(store: &Store, id: &str, subject: &str, actions: &[Action]) -> Email {
    let mut email = sample_email(id, subject);
    for action in actions {
        email.offline.queue(action, Utc::now());
    }
    store.save(id, &email).unwrap();
    email
}

// ---------------------------------------------------------------------------
// In-memory remote
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListMessages(String),
    GetMessage(String),
    Modify {
        id: String,
        add: Vec<String>,
        remove: Vec<String>,
    },
    Trash(String),
    ListLabels,
    CreateLabel(String),
}

/// In-memory `Remote` that records every call and fails on request.
#[derive(Debug, Default)]
pub struct FakeRemote {
    pub calls: Vec<Call>,
    pub labels: Vec<Label>,
    pub messages: Vec<Message>,
    /// Gmail ids whose modify/trash calls fail.
    pub failing_ids: HashSet<String>,
    /// Gmail ids whose detail fetch fails.
    pub failing_gets: HashSet<String>,
    pub page_size: usize,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self {
            page_size: 50,
            labels: vec![
                Label {
                    id: "INBOX".to_string(),
                    name: "INBOX".to_string(),
                    label_type: Some("system".to_string()),
                },
                Label {
                    id: "UNREAD".to_string(),
                    name: "UNREAD".to_string(),
                    label_type: Some("system".to_string()),
                },
            ],
            ..Default::default()
        }
    }

    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Self::new()
        }
    }

    pub fn fail_on(mut self, gmail_id: &str) -> Self {
        self.failing_ids.insert(gmail_id.to_string());
        self
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    fn check(&self, id: &str, op: &str) -> Result<()> {
        if self.failing_ids.contains(id) {
            return Err(Error::remote(format!("{} {}", op, id), "HTTP 500: backend error"));
        }
        Ok(())
    }
}

impl Remote for FakeRemote {
    fn list_messages(
        &mut self,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<ListMessagesResponse> {
        self.calls.push(Call::ListMessages(query.to_string()));
        let start: usize = page_token.and_then(|t| t.parse().ok()).unwrap_or(0);
        let end = (start + self.page_size).min(self.messages.len());
        let messages = self.messages[start..end]
            .iter()
            .map(|m| MessageRef {
                id: m.id.clone(),
                thread_id: Some(m.thread_id.clone()),
            })
            .collect();
        let next_page_token = (end < self.messages.len()).then(|| end.to_string());
        Ok(ListMessagesResponse {
            messages,
            next_page_token,
        })
    }

    fn get_message(&mut self, id: &str) -> Result<Message> {
        self.calls.push(Call::GetMessage(id.to_string()));
        if self.failing_gets.contains(id) {
            return Err(Error::remote(format!("get message {}", id), "HTTP 404: Not Found"));
        }
        self.messages
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| Error::remote(format!("get message {}", id), "HTTP 404: Not Found"))
    }

    fn modify_message(&mut self, id: &str, add: &[&str], remove: &[&str]) -> Result<()> {
        self.calls.push(Call::Modify {
            id: id.to_string(),
            add: add.iter().map(|s| s.to_string()).collect(),
            remove: remove.iter().map(|s| s.to_string()).collect(),
        });
        self.check(id, "modify message")
    }

    fn trash_message(&mut self, id: &str) -> Result<()> {
        self.calls.push(Call::Trash(id.to_string()));
        self.check(id, "trash message")
    }

    fn list_labels(&mut self) -> Result<Vec<Label>> {
        self.calls.push(Call::ListLabels);
        Ok(self.labels.clone())
    }

    fn create_label(&mut self, name: &str) -> Result<Label> {
        self.calls.push(Call::CreateLabel(name.to_string()));
        let label = Label {
            id: format!("Label_{}", self.labels.len() + 1),
            name: name.to_string(),
            label_type: Some("user".to_string()),
        };
        self.labels.push(label.clone());
        Ok(label)
    }
}

/// A Gmail API message as returned by `messages.get?format=full`.
pub fn gmail_message(id: &str, subject: &str, internal_date_ms: i64) -> Message {
    let headers: HashMap<&str, String> = HashMap::from([
        ("Subject", subject.to_string()),
        ("From", "\"Bob Smith\" <bob@example.com>".to_string()),
        ("To", "me@example.com".to_string()),
    ]);
    Message {
        id: id.to_string(),
        thread_id: format!("th-{}", id),
        label_ids: vec!["INBOX".to_string(), "UNREAD".to_string()],
        snippet: Some(format!("snippet {}", id)),
        internal_date: Some(internal_date_ms.to_string()),
        payload: Some(MessagePart {
            mime_type: Some("text/plain".to_string()),
            headers: headers
                .into_iter()
                .map(|(name, value)| Header {
                    name: name.to_string(),
                    value,
                })
                .collect(),
            body: Some(MessagePartBody {
                // "Hello" in URL-safe base64, unpadded
                data: Some("SGVsbG8".to_string()),
                size: Some(5),
            }),
            parts: Vec::new(),
        }),
    }
}
