//! Review queued offline actions before applying them.

use anyhow::Result;

use crate::ledger::Mutation;
use crate::store::Store;
use crate::store::email::{Email, StoredEmail};
use crate::util::{short_id, truncate};

#[derive(Debug, Clone, PartialEq)]
pub struct PlanEntry {
    pub id: String,
    pub email: Email,
    pub mutations: Vec<Mutation>,
}

/// Pending mutations across the store, one entry per email that has any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    pub entries: Vec<PlanEntry>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of emails with pending mutations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn total_mutations(&self) -> usize {
        self.entries.iter().map(|e| e.mutations.len()).sum()
    }
}

/// Build the plan from loaded emails, sorted by id. Reads only.
pub fn compute_plan(emails: &[StoredEmail]) -> Plan {
    let mut entries: Vec<PlanEntry> = emails
        .iter()
        .filter_map(|stored| {
            let mutations = stored.email.offline.pending();
            if mutations.is_empty() {
                return None;
            }
            Some(PlanEntry {
                id: stored.id.clone(),
                email: stored.email.clone(),
                mutations,
            })
        })
        .collect();
    entries.sort_by(|a, b| a.id.cmp(&b.id));
    Plan { entries }
}

fn print_plan(plan: &Plan) {
    println!("\n{} email(s) with pending mutations:\n", plan.len());
    for entry in &plan.entries {
        println!(
            "  {}\t{}",
            short_id(&entry.id),
            truncate(entry.email.display_subject(), 50)
        );
        for mutation in &entry.mutations {
            match mutation.queued_at {
                Some(at) => println!(
                    "    \u{2192} {}  (queued {})",
                    mutation.action.describe(),
                    at.format("%Y-%m-%d %H:%M")
                ),
                None => println!("    \u{2192} {}", mutation.action.describe()),
            }
        }
        println!();
    }
    println!(
        "Plan: {} action(s) on {} email(s)",
        plan.total_mutations(),
        plan.len()
    );
    println!("\nRun 'google-email apply' to execute these changes on Gmail.");
}

/// google-email plan
pub fn run() -> Result<()> {
    let store = Store::open();
    let plan = compute_plan(&store.load_all()?);

    if plan.is_empty() {
        println!("\n\u{2713} No pending mutations.");
        println!(
            "  Use 'google-email archive', 'google-email move', or 'google-email delete' \
             to queue changes."
        );
        return Ok(());
    }

    print_plan(&plan);
    Ok(())
}
