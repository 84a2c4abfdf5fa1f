//! Path resolution for the data directory, storage and credentials.
//!
//! Resolution order for the data directory:
//!   1. --data-dir on the command line
//!   2. GOOGLE_EMAIL_DATA environment variable
//!   3. data_dir from the app config
//!   4. the current directory, if it has a storage/ subdirectory
//!   5. ~/Documents/google-email

use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

static DATA_DIR: OnceCell<PathBuf> = OnceCell::new();

/// Pin the data directory for the rest of the process (from `--data-dir`).
pub fn set_data_dir(path: PathBuf) {
    let _ = DATA_DIR.set(path);
}

/// Return the data directory path.
pub fn data_dir() -> PathBuf {
    if let Some(dir) = DATA_DIR.get() {
        return dir.clone();
    }
    if let Ok(env) = std::env::var("GOOGLE_EMAIL_DATA") {
        if !env.is_empty() {
            return expand_tilde(&env);
        }
    }
    if let Ok(config) = crate::config::load() {
        if let Some(dir) = config.data_dir {
            return expand_tilde(&dir);
        }
    }
    if Path::new("storage").is_dir() {
        return PathBuf::from(".");
    }
    home_dir().join("Documents").join("google-email")
}

pub fn storage_dir() -> PathBuf {
    data_dir().join("storage")
}

pub fn credentials_json() -> PathBuf {
    data_dir().join("credentials.json")
}

pub fn token_json() -> PathBuf {
    data_dir().join("token.json")
}

/// Get the user's home directory.
pub fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Expand ~ to home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        home_dir().join(rest)
    } else if path == "~" {
        home_dir()
    } else {
        PathBuf::from(path)
    }
}
