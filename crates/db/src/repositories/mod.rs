//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations, hiding
//! the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod audit;
pub mod document;
pub mod journal;
pub mod period;
pub mod report;
pub mod reversal;

pub use account::{AccountError, AccountRepository, CreateAccountInput, UpdateAccountInput};
pub use audit::AuditRepository;
pub use document::{DocumentRow, POSTED_STATUS};
pub use journal::{EntryFilter, EntryWithPostings, JournalRepository, PostedEntry};
pub use period::{PeriodError, PeriodRepository};
pub use report::{ReportError, ReportFilter, ReportRepository};
pub use reversal::{ReversalOutcome, ReversalRepository};
