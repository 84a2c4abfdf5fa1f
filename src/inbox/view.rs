//! Print one stored email.

use anyhow::{Context, Result};

use crate::store::Store;

/// google-email inbox view <id>
pub fn run(id: &str) -> Result<()> {
    let store = Store::open();
    let stored = store.find(id)?;
    let path = store.path_for(&stored.id);
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    print!("{}", text);
    if !text.ends_with('\n') {
        println!();
    }
    Ok(())
}
