//! Integration tests for the record store: file layout, round-trip, lookup by
//! prefix and tolerance of malformed files.

mod common;

use google_email::error::Error;
use google_email::ledger::Action;
use google_email::store::Store;
use pretty_assertions::assert_eq;

use common::{sample_email, seed, temp_store};

// ---------------------------------------------------------------------------
// Round-trip
// ---------------------------------------------------------------------------

#[test]
fn test_save_load_round_trip() {
    let (_tmp, store) = temp_store();
    let email = seed(
        &store,
        "a1b2c3",
        "Quarterly report",
        &[Action::Archive, Action::Move("Work/Reports".to_string())],
    );

    let loaded = store.load("a1b2c3").unwrap().unwrap();
    assert_eq!(loaded, email);
}

#[test]
fn test_html_body_gets_tag_breaks() {
    let (_tmp, store) = temp_store();
    let mut email = sample_email("h1", "Newsletter");
    email.body.content_type = google_email::store::email::ContentType::Html;
    email.body.content = "<p>One</p><p>Two</p>".to_string();
    store.save("h1", &email).unwrap();

    let text = std::fs::read_to_string(store.path_for("h1")).unwrap();
    assert!(text.contains("```html\n<p>One</p>\n<p>Two</p>\n```"));
    let loaded = store.load("h1").unwrap().unwrap();
    assert_eq!(loaded.body.content, "<p>One</p>\n<p>Two</p>");
}

#[test]
fn test_empty_offline_section_is_not_written() {
    let (_tmp, store) = temp_store();
    seed(&store, "e1", "Plain", &[]);
    let text = std::fs::read_to_string(store.path_for("e1")).unwrap();
    assert!(!text.contains("offline:"));
}

#[test]
fn test_loads_file_written_by_hand() {
    let (_tmp, store) = temp_store();
    let text = "---\n\
id: 18c2f0\n\
threadId: 18c2f0\n\
subject: Lunch?\n\
from:\n  name: Carol\n  address: carol@example.com\n\
receivedDateTime: 2026-01-05T10:00:00Z\n\
isRead: false\n\
offline:\n  delete: true\n  deleteQueuedAt: 2026-01-06T08:00:00Z\n\
body:\n  contentType: text\n\
---\n\n# Lunch?\n\n```text\nNoon works.\n```\n";
    std::fs::write(store.path_for("cafe01"), text).unwrap();

    let email = store.load("cafe01").unwrap().unwrap();
    assert_eq!(email.gmail_id, "18c2f0");
    assert_eq!(email.body.content, "Noon works.");
    assert_eq!(email.offline.pending().len(), 1);
    assert_eq!(email.offline.pending()[0].action, Action::Delete);
}

// ---------------------------------------------------------------------------
// Listing and lookup
// ---------------------------------------------------------------------------

#[test]
fn test_missing_dir_lists_nothing() {
    let tmp = tempfile::TempDir::new().unwrap();
    let store = Store::new(tmp.path().join("nope"));
    assert!(store.ids().unwrap().is_empty());
    assert!(store.load_all().unwrap().is_empty());
}

#[test]
fn test_malformed_file_is_skipped() {
    let (_tmp, store) = temp_store();
    seed(&store, "aaa111", "Good", &[]);
    std::fs::write(store.path_for("bbb222"), "no front matter here").unwrap();
    std::fs::write(store.path_for("ccc333"), "---\nsubject: [unclosed\n---\n").unwrap();

    let all = store.load_all().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, "aaa111");
    assert!(matches!(store.load("bbb222"), Err(Error::Malformed { .. })));
}

#[test]
fn test_non_markdown_files_are_ignored() {
    let (_tmp, store) = temp_store();
    seed(&store, "aaa111", "Good", &[]);
    std::fs::write(store.dir().join("notes.txt"), "hello").unwrap();
    assert_eq!(store.ids().unwrap(), vec!["aaa111".to_string()]);
}

#[test]
fn test_find_by_prefix_and_filename() {
    let (_tmp, store) = temp_store();
    seed(&store, "abc123", "First", &[]);
    seed(&store, "def456", "Second", &[]);

    assert_eq!(store.find("abc").unwrap().id, "abc123");
    assert_eq!(store.find("def456.md").unwrap().email.subject, "Second");
    assert_eq!(store.find("storage/abc123.md").unwrap().id, "abc123");
}

#[test]
fn test_find_ambiguous_prefix() {
    let (_tmp, store) = temp_store();
    seed(&store, "abc123", "First", &[]);
    seed(&store, "abd456", "Second", &[]);

    match store.find("ab") {
        Err(Error::AmbiguousId { prefix, matches }) => {
            assert_eq!(prefix, "ab");
            assert_eq!(matches, vec!["abc123".to_string(), "abd456".to_string()]);
        }
        other => panic!("expected AmbiguousId, got {:?}", other),
    }
}

#[test]
fn test_find_exact_id_wins_over_prefix() {
    let (_tmp, store) = temp_store();
    seed(&store, "abc", "Short", &[]);
    seed(&store, "abc123", "Long", &[]);
    assert_eq!(store.find("abc").unwrap().email.subject, "Short");
}

#[test]
fn test_find_missing() {
    let (_tmp, store) = temp_store();
    assert!(matches!(store.find("zzz"), Err(Error::NotFound(_))));
}

#[test]
fn test_loads_file_with_both_read_timestamps() {
    let (_tmp, store) = temp_store();
    let text = "---\n\
id: 18c2f0\n\
subject: Mixed\n\
offline:\n  read: true\n  readAt: 2026-01-05T09:00:00Z\n  readQueuedAt: 2026-01-05T11:00:00Z\n\
body:\n  contentType: text\n\
---\n\n# Mixed\n\n```text\nx\n```\n";
    std::fs::write(store.path_for("beef01"), text).unwrap();

    let email = store.load("beef01").unwrap().unwrap();
    assert!(email.offline.read.is_some());
    assert_eq!(store.load_all().unwrap().len(), 1);
}
