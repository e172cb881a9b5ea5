//! Audit snapshot rows, findings, and the audit report.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::ledger::types::{DocumentRef, EntryStatus};

/// A journal entry as seen by the auditor.
#[derive(Debug, Clone)]
pub struct EntrySnapshot {
    /// Entry id.
    pub id: Uuid,
    /// Entry number (None for drafts).
    pub entry_number: Option<i64>,
    /// Entry status.
    pub status: EntryStatus,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Document reference, when document-driven.
    pub reference: Option<DocumentRef>,
    /// Set when this entry is the mirror of a reversal.
    pub reverses_entry_id: Option<Uuid>,
}

/// A posting line as seen by the auditor.
#[derive(Debug, Clone)]
pub struct PostingSnapshot {
    /// Owning entry id.
    pub entry_id: Uuid,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

/// A business document row as seen by the auditor.
#[derive(Debug, Clone)]
pub struct DocumentSnapshot {
    /// The document's own reference.
    pub reference: DocumentRef,
    /// Whether the document module considers it posted.
    pub is_posted: bool,
    /// The entry link carried by the document, when set.
    pub journal_entry_id: Option<Uuid>,
}

/// A chart-of-accounts row as seen by the auditor.
#[derive(Debug, Clone)]
pub struct AccountSnapshot {
    /// Account id.
    pub id: Uuid,
    /// Account code.
    pub code: String,
    /// Parent pointer, when set.
    pub parent_id: Option<Uuid>,
}

/// Finding severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Invariant violation that needs correction.
    Error,
    /// Operational drift worth surfacing, not an invariant violation.
    Warning,
}

/// A single reconciliation finding.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditFinding {
    /// A posted entry whose postings do not sum to zero delta.
    UnbalancedEntry {
        /// Entry id.
        entry_id: Uuid,
        /// Entry number, when allocated.
        entry_number: Option<i64>,
        /// Debits minus credits.
        delta: Decimal,
    },
    /// An entry reference that resolves to no document row.
    OrphanReference {
        /// Entry id.
        entry_id: Uuid,
        /// The dangling reference.
        reference: DocumentRef,
    },
    /// Two or more non-mirror entries referencing the same document.
    DuplicateReference {
        /// The document referenced more than once.
        reference: DocumentRef,
        /// The entries sharing it.
        entry_ids: Vec<Uuid>,
    },
    /// A posted document with no (or a broken) entry link.
    UnlinkedDocument {
        /// The document missing a valid link.
        reference: DocumentRef,
        /// The link carried by the document, when set but invalid.
        journal_entry_id: Option<Uuid>,
    },
    /// An account whose parent pointer does not resolve.
    OrphanAccountParent {
        /// Account code.
        code: String,
        /// The unresolved parent id.
        parent_id: Uuid,
    },
    /// A month with posted entries but no formalized accounting period.
    UnknownPeriod {
        /// Period key ("YYYY-MM").
        period_key: String,
    },
    /// A reversal mirror whose original is still posted (crash window).
    PendingReversal {
        /// The still-posted original entry.
        original_id: Uuid,
        /// The posted mirror entry.
        mirror_id: Uuid,
    },
    /// System-wide debit/credit totals do not match.
    GlobalImbalance {
        /// Total posted debits.
        total_debit: Decimal,
        /// Total posted credits.
        total_credit: Decimal,
    },
}

impl AuditFinding {
    /// Severity of this finding.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::UnbalancedEntry { .. }
            | Self::OrphanReference { .. }
            | Self::DuplicateReference { .. }
            | Self::GlobalImbalance { .. } => Severity::Error,
            Self::UnlinkedDocument { .. }
            | Self::OrphanAccountParent { .. }
            | Self::UnknownPeriod { .. }
            | Self::PendingReversal { .. } => Severity::Warning,
        }
    }

    /// Stable code identifying the check that produced this finding.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::OrphanReference { .. } => "ORPHAN_REFERENCE",
            Self::DuplicateReference { .. } => "DUPLICATE_REFERENCE",
            Self::UnlinkedDocument { .. } => "UNLINKED_DOCUMENT",
            Self::OrphanAccountParent { .. } => "ORPHAN_ACCOUNT_PARENT",
            Self::UnknownPeriod { .. } => "UNKNOWN_PERIOD",
            Self::PendingReversal { .. } => "PENDING_REVERSAL",
            Self::GlobalImbalance { .. } => "GLOBAL_IMBALANCE",
        }
    }
}

/// The result of one reconciliation sweep.
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    /// All findings, in check order.
    pub findings: Vec<AuditFinding>,
    /// Number of posted entries examined.
    pub entries_checked: usize,
    /// Number of document rows examined.
    pub documents_checked: usize,
}

impl AuditReport {
    /// Returns true when no error-severity findings exist.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.findings
            .iter()
            .all(|f| f.severity() != Severity::Error)
    }

    /// Findings of the given severity.
    #[must_use]
    pub fn with_severity(&self, severity: Severity) -> Vec<&AuditFinding> {
        self.findings
            .iter()
            .filter(|f| f.severity() == severity)
            .collect()
    }
}
