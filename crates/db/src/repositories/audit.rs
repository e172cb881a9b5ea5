//! Audit repository - the reconciliation sweep.
//!
//! Loads a read-only snapshot of the ledger and the document link columns,
//! then runs the core reconciliation checks. Plain reads at the default
//! isolation level, no locks; the sweep is operational batch work and must
//! never starve writers.

use std::collections::HashSet;

use sea_orm::{DatabaseConnection, DbErr, EntityTrait};

use corebook_core::audit::{
    run_all, AccountSnapshot, AuditReport, DocumentSnapshot, EntrySnapshot, LedgerSnapshot,
    PostingSnapshot, Severity,
};

use crate::entities::{accounting_periods, accounts, journal_entries, journal_postings};
use crate::repositories::document;
use crate::repositories::journal::reference_of;

/// Audit repository running reconciliation sweeps.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    db: DatabaseConnection,
}

impl AuditRepository {
    /// Creates a new audit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Runs the full reconciliation sweep and returns the findings.
    ///
    /// Violations are returned (and logged), never raised - the sweep
    /// always runs to completion.
    ///
    /// # Errors
    ///
    /// Returns the underlying database error if the snapshot cannot be
    /// loaded.
    pub async fn run(&self) -> Result<AuditReport, DbErr> {
        let snapshot = self.load_snapshot().await?;
        let report = run_all(&snapshot);

        for finding in &report.findings {
            match finding.severity() {
                Severity::Error => {
                    tracing::error!(code = finding.code(), finding = ?finding, "audit violation");
                }
                Severity::Warning => {
                    tracing::warn!(code = finding.code(), finding = ?finding, "audit warning");
                }
            }
        }
        tracing::info!(
            entries = report.entries_checked,
            documents = report.documents_checked,
            findings = report.findings.len(),
            clean = report.is_clean(),
            "reconciliation sweep finished"
        );

        Ok(report)
    }

    async fn load_snapshot(&self) -> Result<LedgerSnapshot, DbErr> {
        let entries = journal_entries::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|e| EntrySnapshot {
                id: e.id,
                entry_number: e.entry_number,
                status: e.status.into(),
                entry_date: e.entry_date,
                reference: reference_of(&e),
                reverses_entry_id: e.reverses_entry_id,
            })
            .collect();

        let postings = journal_postings::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| PostingSnapshot {
                entry_id: p.entry_id,
                debit: p.debit,
                credit: p.credit,
            })
            .collect();

        let documents = document::load_all(&self.db)
            .await?
            .into_iter()
            .map(|d| DocumentSnapshot {
                reference: d.reference,
                is_posted: d.is_posted,
                journal_entry_id: d.journal_entry_id,
            })
            .collect();

        let account_rows = accounts::Entity::find().all(&self.db).await?;
        let account_snapshots = account_rows
            .into_iter()
            .map(|a| AccountSnapshot {
                id: a.id,
                code: a.code,
                parent_id: a.parent_id,
            })
            .collect();

        let period_keys: HashSet<String> = accounting_periods::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|p| p.period_key)
            .collect();

        Ok(LedgerSnapshot {
            entries,
            postings,
            documents,
            accounts: account_snapshots,
            period_keys,
        })
    }
}
