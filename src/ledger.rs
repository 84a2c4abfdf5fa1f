//! The `offline` section of an email: queued actions waiting for `apply`.
//!
//! Each kind of action has one optional slot, so an email carries at most one
//! pending action per kind. Pending mutations are always derived from the
//! slots and listed in a fixed order: read, unread, archive, move, delete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A queued action without arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Marker {
    pub queued_at: Option<DateTime<Utc>>,
}

/// A queued move to a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveMarker {
    pub folder: String,
    pub queued_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "OfflineWire", into = "OfflineWire")]
pub struct Offline {
    pub read: Option<Marker>,
    pub unread: Option<Marker>,
    pub archive: Option<Marker>,
    pub move_to: Option<MoveMarker>,
    pub delete: Option<Marker>,
    pub synced_at: Option<DateTime<Utc>>,
}

/// Flat key layout used on disk (`read: true`, `readQueuedAt: ...`).
#[derive(Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OfflineWire {
    #[serde(default, skip_serializing_if = "is_false")]
    read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    read_queued_at: Option<DateTime<Utc>>,
    /// Older files stamp queued reads with `readAt`. Read, never written.
    #[serde(default, skip_serializing)]
    read_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "is_false")]
    unread: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unread_queued_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "is_false")]
    archive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    archive_queued_at: Option<DateTime<Utc>>,
    #[serde(rename = "move", default, skip_serializing_if = "Option::is_none")]
    move_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    move_queued_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "is_false")]
    delete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delete_queued_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    synced_at: Option<DateTime<Utc>>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

fn marker(set: bool, queued_at: Option<DateTime<Utc>>) -> Option<Marker> {
    set.then_some(Marker { queued_at })
}

impl From<OfflineWire> for Offline {
    fn from(w: OfflineWire) -> Self {
        Offline {
            read: marker(w.read, w.read_queued_at.or(w.read_at)),
            unread: marker(w.unread, w.unread_queued_at),
            archive: marker(w.archive, w.archive_queued_at),
            move_to: w
                .move_to
                .filter(|folder| !folder.is_empty())
                .map(|folder| MoveMarker {
                    folder,
                    queued_at: w.move_queued_at,
                }),
            delete: marker(w.delete, w.delete_queued_at),
            synced_at: w.synced_at,
        }
    }
}

impl From<Offline> for OfflineWire {
    fn from(o: Offline) -> Self {
        let (move_to, move_queued_at) = match o.move_to {
            Some(m) => (Some(m.folder), m.queued_at),
            None => (None, None),
        };
        OfflineWire {
            read: o.read.is_some(),
            read_queued_at: o.read.and_then(|m| m.queued_at),
            read_at: None,
            unread: o.unread.is_some(),
            unread_queued_at: o.unread.and_then(|m| m.queued_at),
            archive: o.archive.is_some(),
            archive_queued_at: o.archive.and_then(|m| m.queued_at),
            move_to,
            move_queued_at,
            delete: o.delete.is_some(),
            delete_queued_at: o.delete.and_then(|m| m.queued_at),
            synced_at: o.synced_at,
        }
    }
}

/// One deferred action against the remote mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Read,
    Unread,
    Archive,
    Move(String),
    Delete,
}

impl Action {
    /// Long form used when reviewing the plan.
    pub fn describe(&self) -> String {
        match self {
            Action::Read => "mark as read".to_string(),
            Action::Unread => "mark as unread".to_string(),
            Action::Archive => "archive".to_string(),
            Action::Move(folder) => format!("move to \"{}\"", folder),
            Action::Delete => "delete (trash)".to_string(),
        }
    }

    /// Past-tense phrase for queue confirmations.
    pub fn queued_phrase(&self) -> String {
        match self {
            Action::Read => "Marked as read".to_string(),
            Action::Unread => "Marked as unread".to_string(),
            Action::Archive => "Queued for archive".to_string(),
            Action::Move(folder) => format!("Queued move to \"{}\"", folder),
            Action::Delete => "Queued for delete".to_string(),
        }
    }
}

/// Short form used in apply output.
impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Read => write!(f, "mark read"),
            Action::Unread => write!(f, "mark unread"),
            Action::Archive => write!(f, "archive"),
            Action::Move(folder) => write!(f, "move \u{2192} {}", folder),
            Action::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub action: Action,
    pub queued_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueOutcome {
    Queued,
    AlreadyQueued,
}

impl Offline {
    /// True when no action is pending. `synced_at` alone does not count.
    pub fn is_empty(&self) -> bool {
        self.read.is_none()
            && self.unread.is_none()
            && self.archive.is_none()
            && self.move_to.is_none()
            && self.delete.is_none()
    }

    /// Pending mutations in fixed kind order.
    pub fn pending(&self) -> Vec<Mutation> {
        let mut mutations = Vec::new();
        if let Some(m) = self.read {
            mutations.push(Mutation {
                action: Action::Read,
                queued_at: m.queued_at,
            });
        }
        if let Some(m) = self.unread {
            mutations.push(Mutation {
                action: Action::Unread,
                queued_at: m.queued_at,
            });
        }
        if let Some(m) = self.archive {
            mutations.push(Mutation {
                action: Action::Archive,
                queued_at: m.queued_at,
            });
        }
        if let Some(m) = &self.move_to {
            mutations.push(Mutation {
                action: Action::Move(m.folder.clone()),
                queued_at: m.queued_at,
            });
        }
        if let Some(m) = self.delete {
            mutations.push(Mutation {
                action: Action::Delete,
                queued_at: m.queued_at,
            });
        }
        mutations
    }

    /// Queue an action. Read and unread cancel each other out.
    pub fn queue(&mut self, action: &Action, now: DateTime<Utc>) -> QueueOutcome {
        let stamped = Some(Marker {
            queued_at: Some(now),
        });
        match action {
            Action::Read => {
                if self.read.is_some() {
                    return QueueOutcome::AlreadyQueued;
                }
                self.read = stamped;
                self.unread = None;
            }
            Action::Unread => {
                if self.unread.is_some() {
                    return QueueOutcome::AlreadyQueued;
                }
                self.unread = stamped;
                self.read = None;
            }
            Action::Archive => {
                if self.archive.is_some() {
                    return QueueOutcome::AlreadyQueued;
                }
                self.archive = stamped;
            }
            Action::Move(folder) => {
                if self.move_to.as_ref().map(|m| &m.folder) == Some(folder) {
                    return QueueOutcome::AlreadyQueued;
                }
                self.move_to = Some(MoveMarker {
                    folder: folder.clone(),
                    queued_at: Some(now),
                });
            }
            Action::Delete => {
                if self.delete.is_some() {
                    return QueueOutcome::AlreadyQueued;
                }
                self.delete = stamped;
            }
        }
        QueueOutcome::Queued
    }

    /// Remove applied mutations and stamp `synced_at`. Resets the whole
    /// section once nothing is left pending. Does not persist.
    pub fn clear(&mut self, mutations: &[Mutation], now: DateTime<Utc>) {
        for mutation in mutations {
            match mutation.action {
                Action::Read => self.read = None,
                Action::Unread => self.unread = None,
                Action::Archive => self.archive = None,
                Action::Move(_) => self.move_to = None,
                Action::Delete => self.delete = None,
            }
        }
        self.synced_at = Some(now);
        if self.is_empty() {
            *self = Offline::default();
        }
    }
}
