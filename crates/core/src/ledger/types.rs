//! Ledger domain types for posting requests and resolution.
//!
//! The posting-line shape is deliberately closed: exactly
//! `{account_code, debit, credit}`, validated exhaustively before anything
//! touches storage.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use corebook_shared::types::AccountId;

/// Lifecycle status of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Entry is being drafted and can be modified or deleted.
    Draft,
    /// Entry has been posted to the ledger (immutable).
    Posted,
    /// Entry has been cancelled by a posted mirror entry (immutable).
    Reversed,
}

impl EntryStatus {
    /// Returns true if the entry can still be modified or deleted.
    #[must_use]
    pub fn is_editable(self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the entry is immutable.
    #[must_use]
    pub fn is_immutable(self) -> bool {
        matches!(self, Self::Posted | Self::Reversed)
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Posted => "posted",
            Self::Reversed => "reversed",
        };
        write!(f, "{s}")
    }
}

/// Kind of business document that can own a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Sales invoice.
    Invoice,
    /// Supplier (purchase) invoice.
    SupplierInvoice,
    /// Expense voucher.
    Expense,
    /// Payroll run.
    PayrollRun,
}

impl DocumentKind {
    /// Stable string form used in `reference_type` columns.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::SupplierInvoice => "supplier_invoice",
            Self::Expense => "expense",
            Self::PayrollRun => "payroll_run",
        }
    }

    /// All document kinds, in a stable order.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [
            Self::Invoice,
            Self::SupplierInvoice,
            Self::Expense,
            Self::PayrollRun,
        ]
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invoice" => Ok(Self::Invoice),
            "supplier_invoice" => Ok(Self::SupplierInvoice),
            "expense" => Ok(Self::Expense),
            "payroll_run" => Ok(Self::PayrollRun),
            other => Err(format!("Unknown document kind: {other}")),
        }
    }
}

/// Reference from a journal entry back to the owning business document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentRef {
    /// The kind of document.
    pub kind: DocumentKind,
    /// The document row id in its own table.
    pub id: i64,
}

impl std::fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} #{}", self.kind, self.id)
    }
}

/// One input line of a posting request.
///
/// Exactly one of `debit`/`credit` must be positive; the other must be zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineInput {
    /// Code of the account to post to.
    pub account_code: String,
    /// Debit amount (>= 0).
    pub debit: Decimal,
    /// Credit amount (>= 0).
    pub credit: Decimal,
}

impl LineInput {
    /// Convenience constructor for a debit line.
    #[must_use]
    pub fn debit(account_code: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account_code: account_code.into(),
            debit: amount,
            credit: Decimal::ZERO,
        }
    }

    /// Convenience constructor for a credit line.
    #[must_use]
    pub fn credit(account_code: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account_code: account_code.into(),
            debit: Decimal::ZERO,
            credit: amount,
        }
    }
}

/// A request to post one balanced journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostingRequest {
    /// Human-readable description of the business event.
    pub description: String,
    /// Accounting date of the entry.
    pub entry_date: NaiveDate,
    /// Optional branch tag for branch-filtered reporting.
    pub branch: Option<String>,
    /// Owning business document, when the entry is document-driven.
    pub reference: Option<DocumentRef>,
    /// Ordered debit/credit lines (at least 2).
    pub lines: Vec<LineInput>,
}

/// A line after validation and account resolution.
#[derive(Debug, Clone)]
pub struct ResolvedLine {
    /// Resolved account id.
    pub account_id: AccountId,
    /// The account code the line was requested with.
    pub account_code: String,
    /// 1-based position preserving request order.
    pub line_no: i16,
    /// Debit amount, quantized to the storage scale.
    pub debit: Decimal,
    /// Credit amount, quantized to the storage scale.
    pub credit: Decimal,
}

/// Totals of a validated entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryTotals {
    /// Sum of all debit amounts.
    pub debit: Decimal,
    /// Sum of all credit amounts.
    pub credit: Decimal,
    /// Whether debits equal credits exactly.
    pub is_balanced: bool,
}

impl EntryTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub fn new(debit: Decimal, credit: Decimal) -> Self {
        Self {
            debit,
            credit,
            is_balanced: debit == credit,
        }
    }

    /// Returns debits minus credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit - self.credit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_entry_status_editable() {
        assert!(EntryStatus::Draft.is_editable());
        assert!(!EntryStatus::Posted.is_editable());
        assert!(!EntryStatus::Reversed.is_editable());
    }

    #[test]
    fn test_entry_status_immutable() {
        assert!(!EntryStatus::Draft.is_immutable());
        assert!(EntryStatus::Posted.is_immutable());
        assert!(EntryStatus::Reversed.is_immutable());
    }

    #[test]
    fn test_document_kind_roundtrip() {
        for kind in DocumentKind::all() {
            assert_eq!(DocumentKind::from_str(kind.as_str()).unwrap(), kind);
        }
        assert!(DocumentKind::from_str("credit_note").is_err());
    }

    #[test]
    fn test_document_ref_display() {
        let reference = DocumentRef {
            kind: DocumentKind::Invoice,
            id: 42,
        };
        assert_eq!(reference.to_string(), "invoice #42");
    }

    #[test]
    fn test_line_constructors() {
        let line = LineInput::debit("1111", dec!(115));
        assert_eq!(line.debit, dec!(115));
        assert_eq!(line.credit, dec!(0));

        let line = LineInput::credit("4111", dec!(100));
        assert_eq!(line.debit, dec!(0));
        assert_eq!(line.credit, dec!(100));
    }

    #[test]
    fn test_totals_balanced() {
        let totals = EntryTotals::new(dec!(115), dec!(115));
        assert!(totals.is_balanced);
        assert_eq!(totals.difference(), dec!(0));
    }

    #[test]
    fn test_totals_unbalanced() {
        let totals = EntryTotals::new(dec!(115), dec!(114));
        assert!(!totals.is_balanced);
        assert_eq!(totals.difference(), dec!(1));
    }
}
