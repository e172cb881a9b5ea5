//! Read-only reconciliation checks.
//!
//! The auditor re-verifies ledger invariants over a snapshot of the store
//! and reports violations as a findings list. It is operational tooling:
//! checks are independent, never fatal to each other, and never run on the
//! write path.

pub mod checks;
pub mod types;

pub use checks::{run_all, LedgerSnapshot};
pub use types::{
    AccountSnapshot, AuditFinding, AuditReport, DocumentSnapshot, EntrySnapshot, PostingSnapshot,
    Severity,
};
