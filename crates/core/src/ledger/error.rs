//! Ledger error types for validation and state errors.
//!
//! Every rejection is a typed variant returned to the calling document
//! module - nothing is swallowed. Only `Store` is worth retrying; all other
//! variants are deterministic and will reproduce on an unchanged input.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use super::types::{DocumentRef, EntryStatus};

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Entry must have at least 2 lines.
    #[error("Entry must have at least 2 lines")]
    EmptyEntry,

    /// A line must carry exactly one positive side.
    #[error("Line {line_no} must have exactly one of debit or credit set")]
    InvalidLine {
        /// 1-based position of the offending line.
        line_no: usize,
    },

    /// Amounts cannot be negative.
    #[error("Line {line_no} has a negative amount")]
    NegativeAmount {
        /// 1-based position of the offending line.
        line_no: usize,
    },

    /// Entry is not balanced (debits != credits).
    #[error("Entry is not balanced. Debit: {debit}, Credit: {credit}")]
    Unbalanced {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    // ========== Period Errors ==========
    /// The accounting period is closed, no posting allowed.
    #[error("Accounting period {period} is closed, no posting allowed")]
    PeriodClosed {
        /// Period key ("YYYY-MM") containing the rejected date.
        period: String,
    },

    // ========== Account Errors ==========
    /// Account code does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Account is inactive and cannot be posted to.
    #[error("Account {0} is inactive")]
    AccountInactive(String),

    /// Account does not accept manual journal entries.
    #[error("Account {0} does not allow manual entries")]
    ManualEntryNotAllowed(String),

    /// Account cannot be deleted while postings reference it.
    #[error("Account {code} has {count} postings and cannot be deleted")]
    HasPostings {
        /// The account code.
        code: String,
        /// Number of postings referencing the account.
        count: u64,
    },

    // ========== Document Linking ==========
    /// The referenced document already carries a journal entry link.
    #[error("{reference} is already linked to a journal entry")]
    AlreadyLinked {
        /// The document reference that is already linked.
        reference: DocumentRef,
    },

    /// The referenced document row does not exist.
    #[error("{reference} does not exist")]
    DocumentNotFound {
        /// The missing document reference.
        reference: DocumentRef,
    },

    // ========== Entry State Errors ==========
    /// Entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(Uuid),

    /// Only posted entries can be reversed.
    #[error("Only posted entries can be reversed (status: {status})")]
    NotPosted {
        /// The entry's actual status.
        status: EntryStatus,
    },

    /// Only draft entries can be modified or deleted.
    #[error("Only draft entries can be modified or deleted (status: {status})")]
    NotDraft {
        /// The entry's actual status.
        status: EntryStatus,
    },

    // ========== Infrastructure ==========
    /// Transient store failure; the caller may retry with backoff.
    #[error("Store unavailable: {0}")]
    Store(String),
}

impl LedgerError {
    /// Returns the stable error code for this error.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyEntry => "EMPTY_ENTRY",
            Self::InvalidLine { .. } => "INVALID_LINE",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::Unbalanced { .. } => "UNBALANCED",
            Self::PeriodClosed { .. } => "PERIOD_CLOSED",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::ManualEntryNotAllowed(_) => "MANUAL_ENTRY_NOT_ALLOWED",
            Self::HasPostings { .. } => "HAS_POSTINGS",
            Self::AlreadyLinked { .. } => "ALREADY_LINKED",
            Self::DocumentNotFound { .. } => "DOCUMENT_NOT_FOUND",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::NotPosted { .. } => "NOT_POSTED",
            Self::NotDraft { .. } => "NOT_DRAFT",
            Self::Store(_) => "STORE_UNAVAILABLE",
        }
    }

    /// Returns true if this error is worth retrying without changing input.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::DocumentKind;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::EmptyEntry.error_code(), "EMPTY_ENTRY");
        assert_eq!(
            LedgerError::Unbalanced {
                debit: dec!(115),
                credit: dec!(114),
            }
            .error_code(),
            "UNBALANCED"
        );
        assert_eq!(
            LedgerError::AccountNotFound("9999".to_string()).error_code(),
            "ACCOUNT_NOT_FOUND"
        );
        assert_eq!(
            LedgerError::Store("connection reset".to_string()).error_code(),
            "STORE_UNAVAILABLE"
        );
    }

    #[test]
    fn test_only_store_errors_are_retryable() {
        assert!(LedgerError::Store("timeout".to_string()).is_retryable());
        assert!(!LedgerError::EmptyEntry.is_retryable());
        assert!(!LedgerError::Unbalanced {
            debit: dec!(1),
            credit: dec!(2),
        }
        .is_retryable());
        assert!(!LedgerError::PeriodClosed {
            period: "2024-03".to_string(),
        }
        .is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = LedgerError::Unbalanced {
            debit: dec!(115.00),
            credit: dec!(114.00),
        };
        assert_eq!(
            err.to_string(),
            "Entry is not balanced. Debit: 115.00, Credit: 114.00"
        );

        let err = LedgerError::AlreadyLinked {
            reference: DocumentRef {
                kind: DocumentKind::Invoice,
                id: 7,
            },
        };
        assert_eq!(
            err.to_string(),
            "invoice #7 is already linked to a journal entry"
        );
    }
}
