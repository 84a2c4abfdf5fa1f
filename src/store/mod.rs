//! File-backed email store: one `<id>.md` file per email in a flat directory.

pub mod email;
pub mod markdown;

use std::path::{Path, PathBuf};

use self::email::{Email, StoredEmail};
use self::markdown::{email_to_markdown, parse_email_markdown};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the resolved storage directory.
    pub fn open() -> Self {
        Self::new(crate::resolve::storage_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.md", id))
    }

    pub fn exists(&self, id: &str) -> bool {
        self.path_for(id).is_file()
    }

    /// Load one email. Returns `Ok(None)` if there is no file for `id`.
    pub fn load(&self, id: &str) -> Result<Option<Email>> {
        let path = self.path_for(id);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        parse_email_markdown(&text)
            .map(Some)
            .map_err(|e| Error::Malformed {
                path,
                reason: e.to_string(),
            })
    }

    /// Write an email, replacing any existing file for `id`.
    pub fn save(&self, id: &str, email: &Email) -> Result<()> {
        std::fs::write(self.path_for(id), email_to_markdown(email)?)?;
        Ok(())
    }

    /// Ids of all stored emails, sorted.
    pub fn ids(&self) -> Result<Vec<String>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut ids: Vec<String> = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Load every email in the store. Files that fail to parse are skipped
    /// with a warning; the rest still load.
    pub fn load_all(&self) -> Result<Vec<StoredEmail>> {
        let mut emails = Vec::new();
        for id in self.ids()? {
            match self.load(&id) {
                Ok(Some(email)) => emails.push(StoredEmail { id, email }),
                Ok(None) => {}
                Err(e) => tracing::warn!("{}", e),
            }
        }
        Ok(emails)
    }

    /// Resolve a full id, a filename or a unique id prefix to a stored email.
    pub fn find(&self, id_or_prefix: &str) -> Result<StoredEmail> {
        let wanted = extract_id(id_or_prefix);
        if wanted.is_empty() {
            return Err(Error::NotFound(id_or_prefix.to_string()));
        }
        let ids = self.ids()?;
        let id = if ids.iter().any(|id| id == wanted) {
            wanted.to_string()
        } else {
            let matches: Vec<String> = ids
                .into_iter()
                .filter(|id| id.starts_with(wanted))
                .collect();
            match matches.len() {
                0 => return Err(Error::NotFound(id_or_prefix.to_string())),
                1 => matches.into_iter().next().unwrap_or_default(),
                _ => {
                    return Err(Error::AmbiguousId {
                        prefix: wanted.to_string(),
                        matches,
                    });
                }
            }
        };
        match self.load(&id)? {
            Some(email) => Ok(StoredEmail { id, email }),
            None => Err(Error::NotFound(id_or_prefix.to_string())),
        }
    }
}

/// Strip any directory and `.md` / `.yml` extension from an id argument.
pub fn extract_id(arg: &str) -> &str {
    let name = arg.rsplit('/').next().unwrap_or(arg);
    name.strip_suffix(".md")
        .or_else(|| name.strip_suffix(".yml"))
        .unwrap_or(name)
}
