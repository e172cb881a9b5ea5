//! Access to the document tables' ledger link columns.
//!
//! Each postable document kind lives in its own table (invoices,
//! supplier_invoices, expenses, payroll_runs). The ledger core touches only
//! two things on those rows: the `status` column (read) and the
//! `journal_entry_id` link column (owned by the ledger). All writes happen
//! inside the caller's transaction.

use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use corebook_core::ledger::{DocumentKind, DocumentRef};

use crate::entities::{expenses, invoices, payroll_runs, supplier_invoices};

/// Document-module status value meaning "posted".
pub const POSTED_STATUS: &str = "posted";

/// The slice of a document row the ledger core cares about.
#[derive(Debug, Clone)]
pub struct DocumentRow {
    /// The document's reference.
    pub reference: DocumentRef,
    /// Whether the document module considers it posted.
    pub is_posted: bool,
    /// The entry link, when set.
    pub journal_entry_id: Option<Uuid>,
}

/// Loads a document row with a row-level lock (`SELECT ... FOR UPDATE`).
///
/// The lock serializes concurrent posts for the same document so the
/// `AlreadyLinked` check and the link write are atomic.
///
/// # Errors
///
/// Returns the underlying database error.
pub async fn find_for_update<C: ConnectionTrait>(
    conn: &C,
    reference: DocumentRef,
) -> Result<Option<DocumentRow>, DbErr> {
    let row = match reference.kind {
        DocumentKind::Invoice => invoices::Entity::find_by_id(reference.id)
            .lock_exclusive()
            .one(conn)
            .await?
            .map(|r| (r.status, r.journal_entry_id)),
        DocumentKind::SupplierInvoice => supplier_invoices::Entity::find_by_id(reference.id)
            .lock_exclusive()
            .one(conn)
            .await?
            .map(|r| (r.status, r.journal_entry_id)),
        DocumentKind::Expense => expenses::Entity::find_by_id(reference.id)
            .lock_exclusive()
            .one(conn)
            .await?
            .map(|r| (r.status, r.journal_entry_id)),
        DocumentKind::PayrollRun => payroll_runs::Entity::find_by_id(reference.id)
            .lock_exclusive()
            .one(conn)
            .await?
            .map(|r| (r.status, r.journal_entry_id)),
    };

    Ok(row.map(|(status, journal_entry_id)| DocumentRow {
        reference,
        is_posted: status == POSTED_STATUS,
        journal_entry_id,
    }))
}

/// Sets or clears a document's `journal_entry_id` link.
///
/// # Errors
///
/// Returns the underlying database error; `RecordNotFound` when the
/// document row is missing.
pub async fn set_entry_link<C: ConnectionTrait>(
    conn: &C,
    reference: DocumentRef,
    entry_id: Option<Uuid>,
) -> Result<(), DbErr> {
    let now = chrono::Utc::now().into();

    match reference.kind {
        DocumentKind::Invoice => {
            let row = invoices::Entity::find_by_id(reference.id)
                .one(conn)
                .await?
                .ok_or_else(|| DbErr::RecordNotFound(reference.to_string()))?;
            let mut active: invoices::ActiveModel = row.into();
            active.journal_entry_id = Set(entry_id);
            active.updated_at = Set(now);
            active.update(conn).await?;
        }
        DocumentKind::SupplierInvoice => {
            let row = supplier_invoices::Entity::find_by_id(reference.id)
                .one(conn)
                .await?
                .ok_or_else(|| DbErr::RecordNotFound(reference.to_string()))?;
            let mut active: supplier_invoices::ActiveModel = row.into();
            active.journal_entry_id = Set(entry_id);
            active.updated_at = Set(now);
            active.update(conn).await?;
        }
        DocumentKind::Expense => {
            let row = expenses::Entity::find_by_id(reference.id)
                .one(conn)
                .await?
                .ok_or_else(|| DbErr::RecordNotFound(reference.to_string()))?;
            let mut active: expenses::ActiveModel = row.into();
            active.journal_entry_id = Set(entry_id);
            active.updated_at = Set(now);
            active.update(conn).await?;
        }
        DocumentKind::PayrollRun => {
            let row = payroll_runs::Entity::find_by_id(reference.id)
                .one(conn)
                .await?
                .ok_or_else(|| DbErr::RecordNotFound(reference.to_string()))?;
            let mut active: payroll_runs::ActiveModel = row.into();
            active.journal_entry_id = Set(entry_id);
            active.updated_at = Set(now);
            active.update(conn).await?;
        }
    }

    Ok(())
}

/// Loads the link slice of every row across all document tables.
///
/// Used by the reconciliation audit; plain reads, no locks.
///
/// # Errors
///
/// Returns the underlying database error.
pub async fn load_all<C: ConnectionTrait>(conn: &C) -> Result<Vec<DocumentRow>, DbErr> {
    let mut rows = Vec::new();

    for invoice in invoices::Entity::find()
        .order_by_asc(invoices::Column::Id)
        .all(conn)
        .await?
    {
        rows.push(DocumentRow {
            reference: DocumentRef {
                kind: DocumentKind::Invoice,
                id: invoice.id,
            },
            is_posted: invoice.status == POSTED_STATUS,
            journal_entry_id: invoice.journal_entry_id,
        });
    }

    for supplier_invoice in supplier_invoices::Entity::find()
        .order_by_asc(supplier_invoices::Column::Id)
        .all(conn)
        .await?
    {
        rows.push(DocumentRow {
            reference: DocumentRef {
                kind: DocumentKind::SupplierInvoice,
                id: supplier_invoice.id,
            },
            is_posted: supplier_invoice.status == POSTED_STATUS,
            journal_entry_id: supplier_invoice.journal_entry_id,
        });
    }

    for expense in expenses::Entity::find()
        .order_by_asc(expenses::Column::Id)
        .all(conn)
        .await?
    {
        rows.push(DocumentRow {
            reference: DocumentRef {
                kind: DocumentKind::Expense,
                id: expense.id,
            },
            is_posted: expense.status == POSTED_STATUS,
            journal_entry_id: expense.journal_entry_id,
        });
    }

    for payroll_run in payroll_runs::Entity::find()
        .order_by_asc(payroll_runs::Column::Id)
        .all(conn)
        .await?
    {
        rows.push(DocumentRow {
            reference: DocumentRef {
                kind: DocumentKind::PayrollRun,
                id: payroll_run.id,
            },
            is_posted: payroll_run.status == POSTED_STATUS,
            journal_entry_id: payroll_run.journal_entry_id,
        });
    }

    Ok(rows)
}
