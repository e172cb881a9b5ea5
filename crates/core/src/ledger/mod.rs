//! Double-entry posting logic.
//!
//! This module implements the core ledger functionality:
//! - Posting request types (closed shapes, no dynamic payloads)
//! - Business rule validation (line shape, exact balance)
//! - Resolution of account codes through an injected lookup
//! - Entry lifecycle guards (draft -> posted -> reversed)
//! - Mirror-entry construction for reversals
//! - Error types for ledger operations

pub mod error;
pub mod reversal;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_props;

pub use error::LedgerError;
pub use reversal::{build_mirror, validate_reversible, OriginalEntry, OriginalLine, RelinkPolicy};
pub use service::{AccountRef, LedgerService};
pub use types::{
    DocumentKind, DocumentRef, EntryStatus, EntryTotals, LineInput, PostingRequest, ResolvedLine,
};
pub use validation::validate_lines;
