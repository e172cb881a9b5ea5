//! The reconciliation checks.
//!
//! Each check is a pure function over snapshot rows so the whole suite runs
//! against fixtures in tests exactly as it runs against the store.

use std::collections::{BTreeMap, HashMap, HashSet};

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::fiscal::period::period_key_for;
use crate::ledger::types::{DocumentRef, EntryStatus};

use super::types::{
    AccountSnapshot, AuditFinding, AuditReport, DocumentSnapshot, EntrySnapshot, PostingSnapshot,
};

/// Everything the auditor looks at, loaded in one read-only sweep.
#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    /// All journal entries.
    pub entries: Vec<EntrySnapshot>,
    /// All postings.
    pub postings: Vec<PostingSnapshot>,
    /// All postable document rows across the document tables.
    pub documents: Vec<DocumentSnapshot>,
    /// The chart of accounts.
    pub accounts: Vec<AccountSnapshot>,
    /// Keys of formalized accounting periods.
    pub period_keys: HashSet<String>,
}

impl LedgerSnapshot {
    fn posted_entries(&self) -> impl Iterator<Item = &EntrySnapshot> {
        self.entries
            .iter()
            .filter(|e| e.status == EntryStatus::Posted)
    }
}

/// Balance check: every posted entry's postings sum to zero delta.
#[must_use]
pub fn check_entry_balances(snapshot: &LedgerSnapshot) -> Vec<AuditFinding> {
    let mut deltas: HashMap<Uuid, Decimal> = HashMap::new();
    for posting in &snapshot.postings {
        *deltas.entry(posting.entry_id).or_default() += posting.debit - posting.credit;
    }

    snapshot
        .posted_entries()
        .filter_map(|entry| {
            let delta = deltas.get(&entry.id).copied().unwrap_or_default();
            (delta != Decimal::ZERO).then(|| AuditFinding::UnbalancedEntry {
                entry_id: entry.id,
                entry_number: entry.entry_number,
                delta,
            })
        })
        .collect()
}

/// Orphan check: every entry reference resolves to a document row.
#[must_use]
pub fn check_orphan_references(snapshot: &LedgerSnapshot) -> Vec<AuditFinding> {
    let known: HashSet<DocumentRef> = snapshot.documents.iter().map(|d| d.reference).collect();

    snapshot
        .entries
        .iter()
        .filter(|e| e.status != EntryStatus::Draft)
        .filter_map(|entry| {
            let reference = entry.reference?;
            (!known.contains(&reference)).then_some(AuditFinding::OrphanReference {
                entry_id: entry.id,
                reference,
            })
        })
        .collect()
}

/// Duplicate-link check: no two non-mirror entries share a document
/// reference. Reversal mirrors intentionally repeat the original's
/// reference and are exempt.
#[must_use]
pub fn check_duplicate_references(snapshot: &LedgerSnapshot) -> Vec<AuditFinding> {
    let mut by_reference: BTreeMap<(String, i64), Vec<Uuid>> = BTreeMap::new();
    for entry in &snapshot.entries {
        if entry.status == EntryStatus::Draft || entry.reverses_entry_id.is_some() {
            continue;
        }
        if let Some(reference) = entry.reference {
            by_reference
                .entry((reference.kind.as_str().to_string(), reference.id))
                .or_default()
                .push(entry.id);
        }
    }

    let lookup: HashMap<(String, i64), DocumentRef> = snapshot
        .entries
        .iter()
        .filter_map(|e| e.reference)
        .map(|r| ((r.kind.as_str().to_string(), r.id), r))
        .collect();

    by_reference
        .into_iter()
        .filter(|(_, ids)| ids.len() > 1)
        .filter_map(|(key, entry_ids)| {
            lookup
                .get(&key)
                .map(|&reference| AuditFinding::DuplicateReference {
                    reference,
                    entry_ids,
                })
        })
        .collect()
}

/// Unlinked-document check (warning): every posted document carries a
/// populated link that resolves to a posted entry.
#[must_use]
pub fn check_document_links(snapshot: &LedgerSnapshot) -> Vec<AuditFinding> {
    let entry_status: HashMap<Uuid, EntryStatus> = snapshot
        .entries
        .iter()
        .map(|e| (e.id, e.status))
        .collect();

    snapshot
        .documents
        .iter()
        .filter(|d| d.is_posted)
        .filter_map(|document| match document.journal_entry_id {
            None => Some(AuditFinding::UnlinkedDocument {
                reference: document.reference,
                journal_entry_id: None,
            }),
            Some(entry_id) => match entry_status.get(&entry_id) {
                Some(EntryStatus::Posted) => None,
                // Missing, draft, or reversed target: the link is broken.
                _ => Some(AuditFinding::UnlinkedDocument {
                    reference: document.reference,
                    journal_entry_id: Some(entry_id),
                }),
            },
        })
        .collect()
}

/// Chart drift check: account parent pointers that do not resolve.
#[must_use]
pub fn check_account_parents(snapshot: &LedgerSnapshot) -> Vec<AuditFinding> {
    let ids: HashSet<Uuid> = snapshot.accounts.iter().map(|a| a.id).collect();

    snapshot
        .accounts
        .iter()
        .filter_map(|account| {
            let parent_id = account.parent_id?;
            (!ids.contains(&parent_id) || parent_id == account.id).then(|| {
                AuditFinding::OrphanAccountParent {
                    code: account.code.clone(),
                    parent_id,
                }
            })
        })
        .collect()
}

/// Period coverage check: months carrying posted entries without a
/// formalized period row (open-by-default policy in action).
#[must_use]
pub fn check_period_coverage(snapshot: &LedgerSnapshot) -> Vec<AuditFinding> {
    let mut missing: Vec<String> = snapshot
        .posted_entries()
        .map(|e| period_key_for(e.entry_date))
        .filter(|key| !snapshot.period_keys.contains(key))
        .collect();
    missing.sort();
    missing.dedup();

    missing
        .into_iter()
        .map(|period_key| AuditFinding::UnknownPeriod { period_key })
        .collect()
}

/// Pending-reversal check: mirrors whose original is still posted.
///
/// This is the transient state left if the process dies between posting the
/// mirror and marking the original reversed; the retry of "mark reversed"
/// is idempotent, so this is a warning, not an error.
#[must_use]
pub fn check_pending_reversals(snapshot: &LedgerSnapshot) -> Vec<AuditFinding> {
    let status_by_id: HashMap<Uuid, EntryStatus> = snapshot
        .entries
        .iter()
        .map(|e| (e.id, e.status))
        .collect();

    snapshot
        .posted_entries()
        .filter_map(|mirror| {
            let original_id = mirror.reverses_entry_id?;
            (status_by_id.get(&original_id) == Some(&EntryStatus::Posted)).then_some(
                AuditFinding::PendingReversal {
                    original_id,
                    mirror_id: mirror.id,
                },
            )
        })
        .collect()
}

/// Global trial-balance check: system-wide posted debits equal credits.
#[must_use]
pub fn check_global_balance(snapshot: &LedgerSnapshot) -> Vec<AuditFinding> {
    let posted: HashSet<Uuid> = snapshot.posted_entries().map(|e| e.id).collect();

    let mut total_debit = Decimal::ZERO;
    let mut total_credit = Decimal::ZERO;
    for posting in &snapshot.postings {
        if posted.contains(&posting.entry_id) {
            total_debit += posting.debit;
            total_credit += posting.credit;
        }
    }

    if total_debit == total_credit {
        Vec::new()
    } else {
        vec![AuditFinding::GlobalImbalance {
            total_debit,
            total_credit,
        }]
    }
}

/// Runs the full reconciliation sweep. Checks are independent; every
/// violation is collected, none aborts the run.
#[must_use]
pub fn run_all(snapshot: &LedgerSnapshot) -> AuditReport {
    let mut findings = Vec::new();
    findings.extend(check_entry_balances(snapshot));
    findings.extend(check_orphan_references(snapshot));
    findings.extend(check_duplicate_references(snapshot));
    findings.extend(check_document_links(snapshot));
    findings.extend(check_account_parents(snapshot));
    findings.extend(check_period_coverage(snapshot));
    findings.extend(check_pending_reversals(snapshot));
    findings.extend(check_global_balance(snapshot));

    AuditReport {
        findings,
        entries_checked: snapshot.posted_entries().count(),
        documents_checked: snapshot.documents.len(),
    }
}
