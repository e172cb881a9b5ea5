//! Reversal repository - append-only corrections.
//!
//! A reversal is two sequential transactional steps: post the mirror entry
//! (through the normal posting machinery), then mark the original
//! `reversed` and apply the relink policy. If the process dies between the
//! steps, the mirror exists and the original is still `posted`; re-running
//! `reverse` finds the existing mirror instead of creating a second one,
//! and `mark_reversed` is an idempotent conditional update, so retrying is
//! always safe. The reconciliation audit reports the in-between state as a
//! `PendingReversal` warning.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use corebook_core::ledger::{
    build_mirror, validate_reversible, LedgerError, OriginalEntry, OriginalLine, RelinkPolicy,
};

use crate::entities::{accounts, journal_entries, sea_orm_active_enums::EntryStatus};
use crate::repositories::document;
use crate::repositories::journal::{reference_of, JournalRepository, PostedEntry};

/// Outcome of a reversal.
#[derive(Debug, Clone, Copy)]
pub struct ReversalOutcome {
    /// The reversed original entry.
    pub original_id: Uuid,
    /// The posted mirror entry.
    pub mirror: PostedEntry,
}

/// Reversal repository.
#[derive(Debug, Clone)]
pub struct ReversalRepository {
    db: DatabaseConnection,
    journal: JournalRepository,
}

impl ReversalRepository {
    /// Creates a new reversal repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        let journal = JournalRepository::new(db.clone());
        Self { db, journal }
    }

    /// Creates a reversal repository sharing an existing journal repository.
    #[must_use]
    pub const fn with_journal(db: DatabaseConnection, journal: JournalRepository) -> Self {
        Self { db, journal }
    }

    /// Reverses a posted entry.
    ///
    /// Builds the mirror (debits and credits swapped, dated today), posts
    /// it through the normal posting path, then marks the original
    /// `reversed` and applies the relink policy. Safe to retry after a
    /// crash between the two steps.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotPosted` unless the entry is posted, plus
    /// every rejection the posting path can produce for the mirror.
    pub async fn reverse(
        &self,
        entry_id: Uuid,
        policy: RelinkPolicy,
    ) -> Result<ReversalOutcome, LedgerError> {
        let original = self.load_original(entry_id).await?;
        validate_reversible(&original)?;

        // Crash-window recovery: a mirror may already exist from an
        // interrupted earlier attempt.
        let mirror = match self.find_existing_mirror(entry_id).await? {
            Some(existing) => existing,
            None => {
                let request = build_mirror(&original, Utc::now().date_naive());
                self.journal.post_mirror(request, entry_id).await?
            }
        };

        self.mark_reversed(entry_id, mirror.id, policy).await?;

        tracing::info!(
            original_id = %entry_id,
            mirror_id = %mirror.id,
            mirror_number = mirror.entry_number,
            "entry reversed"
        );

        Ok(ReversalOutcome {
            original_id: entry_id,
            mirror,
        })
    }

    /// Marks the original entry `reversed` and applies the relink policy.
    ///
    /// Idempotent: the status update is conditional on the entry still
    /// being `posted`, and clearing an already-cleared document link is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Store` on infrastructure failure.
    pub async fn mark_reversed(
        &self,
        original_id: Uuid,
        mirror_id: Uuid,
        policy: RelinkPolicy,
    ) -> Result<(), LedgerError> {
        let txn = self.db.begin().await.map_err(store_err)?;

        let original = journal_entries::Entity::find_by_id(original_id)
            .one(&txn)
            .await
            .map_err(store_err)?
            .ok_or(LedgerError::EntryNotFound(original_id))?;

        let reference = reference_of(&original);

        if original.status == EntryStatus::Posted {
            let now = Utc::now().into();
            let mut active: journal_entries::ActiveModel = original.into();
            active.status = Set(EntryStatus::Reversed);
            active.reversed_by_entry_id = Set(Some(mirror_id));
            active.updated_at = Set(now);
            active.update(&txn).await.map_err(store_err)?;
        }

        if policy == RelinkPolicy::Clear {
            if let Some(reference) = reference {
                document::set_entry_link(&txn, reference, None)
                    .await
                    .map_err(store_err)?;
            }
        }

        txn.commit().await.map_err(store_err)
    }

    async fn find_existing_mirror(
        &self,
        original_id: Uuid,
    ) -> Result<Option<PostedEntry>, LedgerError> {
        let mirror = journal_entries::Entity::find()
            .filter(journal_entries::Column::ReversesEntryId.eq(original_id))
            .one(&self.db)
            .await
            .map_err(store_err)?;

        Ok(mirror.and_then(|m| {
            m.entry_number.map(|entry_number| PostedEntry {
                id: m.id,
                entry_number,
            })
        }))
    }

    async fn load_original(&self, entry_id: Uuid) -> Result<OriginalEntry, LedgerError> {
        let loaded = self.journal.get_entry(entry_id).await?;

        let account_ids: Vec<Uuid> = loaded.postings.iter().map(|p| p.account_id).collect();
        let codes: std::collections::HashMap<Uuid, String> = accounts::Entity::find()
            .filter(accounts::Column::Id.is_in(account_ids))
            .all(&self.db)
            .await
            .map_err(store_err)?
            .into_iter()
            .map(|a| (a.id, a.code))
            .collect();

        let lines = loaded
            .postings
            .iter()
            .map(|p| {
                let account_code = codes
                    .get(&p.account_id)
                    .cloned()
                    .ok_or_else(|| LedgerError::AccountNotFound(p.account_id.to_string()))?;
                Ok(OriginalLine {
                    account_code,
                    debit: p.debit,
                    credit: p.credit,
                })
            })
            .collect::<Result<Vec<_>, LedgerError>>()?;

        Ok(OriginalEntry {
            id: loaded.entry.id,
            entry_number: loaded.entry.entry_number,
            status: loaded.entry.status.into(),
            description: loaded.entry.description.clone(),
            branch: loaded.entry.branch.clone(),
            reference: reference_of(&loaded.entry),
            lines,
        })
    }
}

fn store_err(e: sea_orm::DbErr) -> LedgerError {
    LedgerError::Store(e.to_string())
}
