//! Reconcile queued offline actions against Gmail.
//!
//! Each mutation becomes exactly one modifying remote call. Failures are
//! reported and counted but never abort the run; an email's `offline` section
//! is only cleared and saved when the commit gate allows it.

use anyhow::{Result, bail};
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;

use crate::config;
use crate::ledger::Action;
use crate::plan::{Plan, PlanEntry, compute_plan};
use crate::remote::auth;
use crate::remote::{INBOX, Remote, UNREAD};
use crate::store::Store;
use crate::util::{short_id, truncate};

/// When an email's applied mutations may be cleared from its file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommitGate {
    /// Clear an email once all of its own mutations succeeded.
    #[default]
    PerEmail,
    /// Clear only while no mutation anywhere in the run has failed yet.
    RunWide,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOptions {
    pub dry_run: bool,
    pub gate: CommitGate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub succeeded: usize,
    pub failed: usize,
    pub dry_run: bool,
}

/// Label name to id lookup with get-or-create, cached for one run.
///
/// Not safe against another client creating the same label between our list
/// and create calls; Gmail then rejects the create and the move fails.
#[derive(Debug, Default)]
pub struct LabelResolver {
    labels: Option<HashMap<String, String>>,
}

impl LabelResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(
        &mut self,
        remote: &mut dyn Remote,
        name: &str,
    ) -> crate::error::Result<String> {
        if self.labels.is_none() {
            let listed = remote.list_labels()?;
            self.labels = Some(listed.into_iter().map(|l| (l.name, l.id)).collect());
        }
        let labels = self.labels.get_or_insert_with(HashMap::new);
        if let Some(id) = labels.get(name) {
            return Ok(id.clone());
        }
        let created = remote.create_label(name)?;
        tracing::info!(label = name, id = %created.id, "created label");
        labels.insert(name.to_string(), created.id.clone());
        Ok(created.id)
    }
}

/// Translate one mutation into its remote call.
pub fn apply_mutation(
    remote: &mut dyn Remote,
    labels: &mut LabelResolver,
    gmail_id: &str,
    action: &Action,
) -> crate::error::Result<()> {
    match action {
        Action::Read => remote.modify_message(gmail_id, &[], &[UNREAD]),
        Action::Unread => remote.modify_message(gmail_id, &[UNREAD], &[]),
        Action::Archive => remote.modify_message(gmail_id, &[], &[INBOX]),
        Action::Move(folder) => {
            let label_id = labels.resolve(remote, folder)?;
            remote.modify_message(gmail_id, &[label_id.as_str()], &[INBOX])
        }
        Action::Delete => remote.trash_message(gmail_id),
    }
}

fn print_dry_run(plan: &Plan) -> ApplySummary {
    println!(
        "\nDry run: Would apply {} action(s) to {} email(s):\n",
        plan.total_mutations(),
        plan.len()
    );
    for entry in &plan.entries {
        let subject = truncate(entry.email.display_subject(), 40);
        for mutation in &entry.mutations {
            println!("  {}\t{}\t{}", short_id(&entry.id), mutation.action, subject);
        }
    }
    ApplySummary {
        succeeded: plan.total_mutations(),
        failed: 0,
        dry_run: true,
    }
}

fn apply_entry(
    store: &Store,
    entry: PlanEntry,
    remote: &mut dyn Remote,
    labels: &mut LabelResolver,
    gate: CommitGate,
    summary: &mut ApplySummary,
) {
    let PlanEntry {
        id,
        mut email,
        mutations,
    } = entry;
    let short = short_id(&id);
    let mut email_failed = false;

    for mutation in &mutations {
        match apply_mutation(remote, labels, &email.gmail_id, &mutation.action) {
            Ok(()) => {
                println!("  \u{2713} {}\t{}", short, mutation.action);
                summary.succeeded += 1;
            }
            Err(e) => {
                println!("  \u{2717} {}\t{}\t{}", short, mutation.action, e);
                summary.failed += 1;
                email_failed = true;
            }
        }
    }

    let commit = match gate {
        CommitGate::PerEmail => !email_failed,
        CommitGate::RunWide => summary.failed == 0,
    };
    if !commit {
        tracing::debug!(id = %id, ?gate, "offline state retained");
        return;
    }

    email.offline.clear(&mutations, Utc::now());
    if let Err(e) = store.save(&id, &email) {
        println!("  \u{2717} {}\tsave\t{}", short, e);
        summary.failed += 1;
    }
}

/// Apply a plan. With `options.dry_run` nothing is sent or written and
/// `remote` may be `None`; a live run requires a remote.
pub fn apply(
    store: &Store,
    plan: Plan,
    remote: Option<&mut dyn Remote>,
    options: ApplyOptions,
) -> Result<ApplySummary> {
    if options.dry_run {
        return Ok(print_dry_run(&plan));
    }
    let Some(remote) = remote else {
        bail!("A Gmail connection is required to apply changes");
    };

    println!(
        "\nApplying {} action(s) to {} email(s)...\n",
        plan.total_mutations(),
        plan.len()
    );
    let mut labels = LabelResolver::new();
    let mut summary = ApplySummary::default();
    for entry in plan.entries {
        apply_entry(store, entry, remote, &mut labels, options.gate, &mut summary);
    }
    Ok(summary)
}

pub fn print_summary(summary: &ApplySummary) {
    println!();
    if summary.dry_run {
        println!("Dry run complete. Run without --dry-run to apply changes.");
    } else if summary.failed == 0 {
        println!(
            "\u{2713} Successfully applied {} action(s).",
            summary.succeeded
        );
    } else {
        println!(
            "\u{26a0} Applied {} action(s), {} failed.",
            summary.succeeded, summary.failed
        );
    }
}

/// google-email apply [--dry-run] [--strict]
pub fn run(dry_run: bool, strict: bool) -> Result<()> {
    if !dry_run {
        auth::require_credentials()?;
    }
    let config = config::load()?;
    let gate = if strict {
        CommitGate::RunWide
    } else {
        config.apply.commit_gate
    };
    let options = ApplyOptions { dry_run, gate };

    let store = Store::open();
    let plan = compute_plan(&store.load_all()?);
    if plan.is_empty() {
        println!("\n\u{2713} No pending mutations to apply.");
        return Ok(());
    }

    let summary = if dry_run {
        apply(&store, plan, None, options)?
    } else {
        let mut client = auth::connect()?;
        apply(&store, plan, Some(&mut client), options)?
    };
    print_summary(&summary);
    Ok(())
}
