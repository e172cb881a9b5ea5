//! Mirror-entry construction for reversals.
//!
//! History is append-only: a correction is a new posted entry that exactly
//! cancels the original, never an edit. The mirror swaps every line's sides,
//! is dated the day of the reversal (not the original date), and goes
//! through the normal posting path so it is itself validated and balanced.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::LedgerError;
use super::types::{DocumentRef, EntryStatus, LineInput, PostingRequest};

/// What to do with the document's entry link after a reversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelinkPolicy {
    /// Null out the document's `journal_entry_id` so it can be re-posted.
    Clear,
    /// Leave the document pointing at the (now reversed) original entry.
    Keep,
}

/// One line of the entry being reversed.
#[derive(Debug, Clone)]
pub struct OriginalLine {
    /// Account code of the original line.
    pub account_code: String,
    /// Original debit amount.
    pub debit: Decimal,
    /// Original credit amount.
    pub credit: Decimal,
}

/// The posted entry being reversed, as loaded from the store.
#[derive(Debug, Clone)]
pub struct OriginalEntry {
    /// Entry id.
    pub id: Uuid,
    /// Entry number (posted entries always carry one).
    pub entry_number: Option<i64>,
    /// Current status.
    pub status: EntryStatus,
    /// Original description.
    pub description: String,
    /// Branch tag, carried onto the mirror.
    pub branch: Option<String>,
    /// Document reference, carried onto the mirror.
    pub reference: Option<DocumentRef>,
    /// Original lines in order.
    pub lines: Vec<OriginalLine>,
}

/// Validates that an entry is in a reversible state.
///
/// # Errors
///
/// Returns `LedgerError::NotPosted` unless the entry is `posted`.
pub fn validate_reversible(original: &OriginalEntry) -> Result<(), LedgerError> {
    match original.status {
        EntryStatus::Posted => Ok(()),
        other => Err(LedgerError::NotPosted { status: other }),
    }
}

/// Builds the mirror posting request for a reversal.
///
/// Every line's debit/credit are swapped; amounts and account codes are
/// preserved; the description is prefixed so the audit trail reads clearly.
#[must_use]
pub fn build_mirror(original: &OriginalEntry, reversal_date: NaiveDate) -> PostingRequest {
    let lines = original
        .lines
        .iter()
        .map(|line| LineInput {
            account_code: line.account_code.clone(),
            debit: line.credit,
            credit: line.debit,
        })
        .collect();

    let label = original
        .entry_number
        .map_or_else(|| original.id.to_string(), |n| format!("#{n}"));

    PostingRequest {
        description: format!("Reversal of {label}: {}", original.description),
        entry_date: reversal_date,
        branch: original.branch.clone(),
        reference: original.reference,
        lines,
    }
}
