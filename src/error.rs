//! Error taxonomy shared by the store, ledger, reconciler and remote client.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Email not found: {0}")]
    NotFound(String),

    #[error("Ambiguous id '{prefix}' matches {} emails: {}", .matches.len(), .matches.join(", "))]
    AmbiguousId { prefix: String, matches: Vec<String> },

    #[error(
        "Gmail credentials not found.\n\
         Please download credentials.json from Google Cloud Console\n\
         and place it at: {}",
        .0.display()
    )]
    CredentialsMissing(PathBuf),

    #[error("{operation} failed: {message}")]
    Remote { operation: String, message: String },

    #[error("Failed to load {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("missing front matter")]
    MissingFrontMatter,

    #[error("Invalid date '{0}' (expected YYYY-MM-DD, today, yesterday or \"N days ago\")")]
    InvalidDate(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    pub fn remote(operation: impl Into<String>, message: impl ToString) -> Self {
        Error::Remote {
            operation: operation.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
