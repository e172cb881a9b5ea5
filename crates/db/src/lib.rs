//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the ledger and document tables
//! - Repository abstractions executing the core's decisions transactionally
//! - Embedded database migrations
//!
//! The store's transaction isolation is the only coordination mechanism:
//! there is no shared in-process ledger state, and every posting runs inside
//! one database transaction.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    AccountRepository, AuditRepository, JournalRepository, PeriodRepository, ReportRepository,
    ReversalRepository,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
