//! Journal repository - the ledger writer.
//!
//! `post` executes the whole posting state machine inside one database
//! transaction: document row lock and `AlreadyLinked` check, entry-number
//! allocation from the store-native sequence, entry + posting inserts, and
//! the entry-id write-back onto the document row. Any failure rolls the
//! entire operation back; a rejected request leaves zero new rows and
//! consumes no entry number.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbBackend, DbErr, EntityTrait, QueryFilter, QueryOrder, SqlErr, Statement, Set,
    TransactionTrait,
};
use uuid::Uuid;

use corebook_core::ledger::{
    AccountRef, DocumentRef, EntryStatus as CoreEntryStatus, LedgerError, LedgerService,
    PostingRequest, ResolvedLine,
};
use corebook_shared::types::AccountId;

use crate::entities::{
    accounts, journal_entries, journal_postings, sea_orm_active_enums::EntryStatus,
};
use crate::repositories::document;
use crate::repositories::period::PeriodRepository;

/// Identity of a freshly posted entry.
#[derive(Debug, Clone, Copy)]
pub struct PostedEntry {
    /// Entry id.
    pub id: Uuid,
    /// Allocated entry number.
    pub entry_number: i64,
}

/// A journal entry with its posting lines.
#[derive(Debug, Clone)]
pub struct EntryWithPostings {
    /// Entry header.
    pub entry: journal_entries::Model,
    /// Lines ordered by line number.
    pub postings: Vec<journal_postings::Model>,
}

/// Filter options for listing entries.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Filter by status.
    pub status: Option<CoreEntryStatus>,
    /// Filter by date range start.
    pub from: Option<NaiveDate>,
    /// Filter by date range end.
    pub to: Option<NaiveDate>,
    /// Filter by branch.
    pub branch: Option<String>,
}

/// Journal repository for posting and entry lifecycle operations.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
    periods: PeriodRepository,
}

impl JournalRepository {
    /// Creates a new journal repository with the open-by-default period
    /// policy.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        let periods = PeriodRepository::new(db.clone());
        Self { db, periods }
    }

    /// Creates a journal repository with an explicit period gate.
    #[must_use]
    pub const fn with_periods(db: DatabaseConnection, periods: PeriodRepository) -> Self {
        Self { db, periods }
    }

    /// Posts a balanced journal entry.
    ///
    /// Validation order follows the writer contract: line shape, exact
    /// balance, period gate, account resolution - all before the
    /// transaction opens, so deterministic rejections consume no entry
    /// number. The atomic part then locks the referenced document row,
    /// rejects `AlreadyLinked`, allocates the entry number, inserts the
    /// entry and its postings, and writes the entry id back onto the
    /// document.
    ///
    /// # Errors
    ///
    /// Returns a `LedgerError` for every rejection in the taxonomy; only
    /// `Store` is retryable.
    pub async fn post(&self, request: PostingRequest) -> Result<PostedEntry, LedgerError> {
        corebook_core::ledger::validate_lines(&request.lines)?;
        self.periods.ensure_open(request.entry_date).await?;

        let lookup = self.account_lookup(&request).await?;
        let (resolved, totals) =
            LedgerService::validate_and_resolve(&request, |code| lookup_in(&lookup, code))?;

        let txn = self.db.begin().await.map_err(store_err)?;

        if let Some(reference) = request.reference {
            ensure_unlinked(&txn, reference).await?;
        }

        let entry_number = next_entry_number(&txn).await?;
        let entry = insert_entry(&txn, &request, entry_number, None).await?;
        insert_postings(&txn, entry.id, &resolved).await?;

        if let Some(reference) = request.reference {
            document::set_entry_link(&txn, reference, Some(entry.id))
                .await
                .map_err(store_err)?;
        }

        txn.commit().await.map_err(|e| commit_err(e, &request))?;

        tracing::info!(
            entry_id = %entry.id,
            entry_number,
            debit = %totals.debit,
            "journal entry posted"
        );

        Ok(PostedEntry {
            id: entry.id,
            entry_number,
        })
    }

    /// Posts the mirror entry of a reversal.
    ///
    /// Same machinery as `post`, except the document-link idempotency check
    /// is skipped: the mirror intentionally repeats the original's
    /// reference and is exempt from the reference unique index via
    /// `reverses_entry_id`.
    pub(crate) async fn post_mirror(
        &self,
        request: PostingRequest,
        reverses_entry_id: Uuid,
    ) -> Result<PostedEntry, LedgerError> {
        corebook_core::ledger::validate_lines(&request.lines)?;
        self.periods.ensure_open(request.entry_date).await?;

        let lookup = self.account_lookup(&request).await?;
        let (resolved, _totals) =
            LedgerService::validate_and_resolve(&request, |code| lookup_in(&lookup, code))?;

        let txn = self.db.begin().await.map_err(store_err)?;

        let entry_number = next_entry_number(&txn).await?;
        let entry = insert_entry(&txn, &request, entry_number, Some(reverses_entry_id)).await?;
        insert_postings(&txn, entry.id, &resolved).await?;

        txn.commit().await.map_err(store_err)?;

        tracing::info!(
            entry_id = %entry.id,
            entry_number,
            reverses = %reverses_entry_id,
            "reversal mirror posted"
        );

        Ok(PostedEntry {
            id: entry.id,
            entry_number,
        })
    }

    /// Saves a draft entry.
    ///
    /// Drafts are validated and their accounts resolved, but they are not
    /// period-gated, carry no entry number, and do not link their document.
    ///
    /// # Errors
    ///
    /// Returns a `LedgerError` when validation or resolution fails.
    pub async fn save_draft(&self, request: PostingRequest) -> Result<Uuid, LedgerError> {
        let lookup = self.account_lookup(&request).await?;
        let (resolved, _totals) =
            LedgerService::validate_and_resolve(&request, |code| lookup_in(&lookup, code))?;

        let txn = self.db.begin().await.map_err(store_err)?;

        let now = Utc::now().into();
        let entry = journal_entries::ActiveModel {
            id: Set(Uuid::now_v7()),
            entry_number: Set(None),
            description: Set(request.description.clone()),
            entry_date: Set(request.entry_date),
            status: Set(EntryStatus::Draft),
            reference_type: Set(request.reference.map(|r| r.kind.as_str().to_string())),
            reference_id: Set(request.reference.map(|r| r.id)),
            branch: Set(request.branch.clone()),
            reverses_entry_id: Set(None),
            reversed_by_entry_id: Set(None),
            posted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let entry = entry.insert(&txn).await.map_err(store_err)?;
        insert_postings(&txn, entry.id, &resolved).await?;

        txn.commit().await.map_err(store_err)?;

        Ok(entry.id)
    }

    /// Promotes a draft entry to posted.
    ///
    /// Re-runs the full posting validation (balance, period gate, account
    /// resolution, document idempotency) and allocates the entry number at
    /// promotion time.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotDraft` unless the entry is a draft, plus
    /// every rejection `post` can produce.
    pub async fn post_draft(&self, entry_id: Uuid) -> Result<PostedEntry, LedgerError> {
        let EntryWithPostings { entry, postings } = self.get_entry(entry_id).await?;
        LedgerService::validate_can_post(entry.status.into())?;

        let request = self.rebuild_request(&entry, &postings).await?;

        corebook_core::ledger::validate_lines(&request.lines)?;
        self.periods.ensure_open(request.entry_date).await?;

        let lookup = self.account_lookup(&request).await?;
        LedgerService::validate_and_resolve(&request, |code| lookup_in(&lookup, code))?;

        let txn = self.db.begin().await.map_err(store_err)?;

        if let Some(reference) = request.reference {
            ensure_unlinked(&txn, reference).await?;
        }

        let entry_number = next_entry_number(&txn).await?;
        let now = Utc::now().into();

        let mut active: journal_entries::ActiveModel = entry.into();
        active.entry_number = Set(Some(entry_number));
        active.status = Set(EntryStatus::Posted);
        active.posted_at = Set(Some(now));
        active.updated_at = Set(now);
        let entry = active.update(&txn).await.map_err(store_err)?;

        if let Some(reference) = request.reference {
            document::set_entry_link(&txn, reference, Some(entry.id))
                .await
                .map_err(store_err)?;
        }

        txn.commit().await.map_err(|e| commit_err(e, &request))?;

        tracing::info!(entry_id = %entry.id, entry_number, "draft promoted to posted");

        Ok(PostedEntry {
            id: entry.id,
            entry_number,
        })
    }

    /// Deletes a draft entry and its postings.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NotDraft` for posted or reversed entries.
    pub async fn delete_draft(&self, entry_id: Uuid) -> Result<(), LedgerError> {
        let EntryWithPostings { entry, .. } = self.get_entry(entry_id).await?;
        LedgerService::validate_can_edit(entry.status.into())?;

        journal_entries::Entity::delete_by_id(entry.id)
            .exec(&self.db)
            .await
            .map_err(store_err)?;

        Ok(())
    }

    /// Loads an entry with its postings.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::EntryNotFound` for an unknown id.
    pub async fn get_entry(&self, entry_id: Uuid) -> Result<EntryWithPostings, LedgerError> {
        let entry = journal_entries::Entity::find_by_id(entry_id)
            .one(&self.db)
            .await
            .map_err(store_err)?
            .ok_or(LedgerError::EntryNotFound(entry_id))?;

        let postings = journal_postings::Entity::find()
            .filter(journal_postings::Column::EntryId.eq(entry_id))
            .order_by_asc(journal_postings::Column::LineNo)
            .all(&self.db)
            .await
            .map_err(store_err)?;

        Ok(EntryWithPostings { entry, postings })
    }

    /// Lists entries with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Store` on infrastructure failure.
    pub async fn list_entries(
        &self,
        filter: EntryFilter,
    ) -> Result<Vec<journal_entries::Model>, LedgerError> {
        let mut query = journal_entries::Entity::find();

        if let Some(status) = filter.status {
            let status: EntryStatus = status.into();
            query = query.filter(journal_entries::Column::Status.eq(status));
        }
        if let Some(from) = filter.from {
            query = query.filter(journal_entries::Column::EntryDate.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(journal_entries::Column::EntryDate.lte(to));
        }
        if let Some(branch) = filter.branch {
            query = query.filter(journal_entries::Column::Branch.eq(branch));
        }

        query
            .order_by_desc(journal_entries::Column::EntryDate)
            .order_by_desc(journal_entries::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(store_err)
    }

    /// Preloads the accounts referenced by a request into a lookup map.
    async fn account_lookup(
        &self,
        request: &PostingRequest,
    ) -> Result<HashMap<String, AccountRef>, LedgerError> {
        let mut codes: Vec<String> = request
            .lines
            .iter()
            .map(|l| l.account_code.clone())
            .collect();
        codes.sort();
        codes.dedup();

        let rows = accounts::Entity::find()
            .filter(accounts::Column::Code.is_in(codes))
            .all(&self.db)
            .await
            .map_err(store_err)?;

        Ok(rows
            .into_iter()
            .map(|a| {
                (
                    a.code.clone(),
                    AccountRef {
                        id: AccountId::from_uuid(a.id),
                        is_active: a.is_active,
                        allow_manual_entry: a.allow_manual_entry,
                    },
                )
            })
            .collect())
    }

    /// Rebuilds a posting request from a stored draft.
    async fn rebuild_request(
        &self,
        entry: &journal_entries::Model,
        postings: &[journal_postings::Model],
    ) -> Result<PostingRequest, LedgerError> {
        let account_ids: Vec<Uuid> = postings.iter().map(|p| p.account_id).collect();
        let codes: HashMap<Uuid, String> = accounts::Entity::find()
            .filter(accounts::Column::Id.is_in(account_ids))
            .all(&self.db)
            .await
            .map_err(store_err)?
            .into_iter()
            .map(|a| (a.id, a.code))
            .collect();

        let lines = postings
            .iter()
            .map(|p| {
                let account_code = codes
                    .get(&p.account_id)
                    .cloned()
                    .ok_or_else(|| LedgerError::AccountNotFound(p.account_id.to_string()))?;
                Ok(corebook_core::ledger::LineInput {
                    account_code,
                    debit: p.debit,
                    credit: p.credit,
                })
            })
            .collect::<Result<Vec<_>, LedgerError>>()?;

        Ok(PostingRequest {
            description: entry.description.clone(),
            entry_date: entry.entry_date,
            branch: entry.branch.clone(),
            reference: reference_of(entry),
            lines,
        })
    }
}

/// Reads an entry row's document reference, if both columns are set.
#[must_use]
pub fn reference_of(entry: &journal_entries::Model) -> Option<DocumentRef> {
    let kind = entry.reference_type.as_deref()?.parse().ok()?;
    let id = entry.reference_id?;
    Some(DocumentRef { kind, id })
}

fn lookup_in(map: &HashMap<String, AccountRef>, code: &str) -> Result<AccountRef, LedgerError> {
    map.get(code)
        .cloned()
        .ok_or_else(|| LedgerError::AccountNotFound(code.to_string()))
}

fn store_err(e: DbErr) -> LedgerError {
    LedgerError::Store(e.to_string())
}

/// Maps a commit failure, surfacing reference unique-index violations as
/// `AlreadyLinked` (the race backstop behind the row lock).
fn commit_err(e: DbErr, request: &PostingRequest) -> LedgerError {
    match (&e.sql_err(), request.reference) {
        (Some(SqlErr::UniqueConstraintViolation(msg)), Some(reference))
            if msg.contains("uq_journal_entries_reference") =>
        {
            LedgerError::AlreadyLinked { reference }
        }
        _ => store_err(e),
    }
}

/// Locks the document row and rejects when it already carries a link.
async fn ensure_unlinked(
    txn: &DatabaseTransaction,
    reference: DocumentRef,
) -> Result<(), LedgerError> {
    let row = document::find_for_update(txn, reference)
        .await
        .map_err(store_err)?
        .ok_or(LedgerError::DocumentNotFound { reference })?;

    if row.journal_entry_id.is_some() {
        return Err(LedgerError::AlreadyLinked { reference });
    }
    Ok(())
}

/// Allocates the next entry number from the store-native sequence.
///
/// Runs inside the posting transaction; duplicates are impossible under
/// concurrent posting, and rejected requests never reach this point.
async fn next_entry_number(txn: &DatabaseTransaction) -> Result<i64, LedgerError> {
    let row = txn
        .query_one(Statement::from_string(
            DbBackend::Postgres,
            "SELECT nextval('journal_entry_number_seq') AS entry_number".to_string(),
        ))
        .await
        .map_err(store_err)?
        .ok_or_else(|| LedgerError::Store("entry number sequence returned no row".to_string()))?;

    row.try_get::<i64>("", "entry_number").map_err(store_err)
}

/// Inserts a posted entry header.
async fn insert_entry(
    txn: &DatabaseTransaction,
    request: &PostingRequest,
    entry_number: i64,
    reverses_entry_id: Option<Uuid>,
) -> Result<journal_entries::Model, LedgerError> {
    let now = Utc::now().into();

    let entry = journal_entries::ActiveModel {
        id: Set(Uuid::now_v7()),
        entry_number: Set(Some(entry_number)),
        description: Set(request.description.clone()),
        entry_date: Set(request.entry_date),
        status: Set(EntryStatus::Posted),
        reference_type: Set(request.reference.map(|r| r.kind.as_str().to_string())),
        reference_id: Set(request.reference.map(|r| r.id)),
        branch: Set(request.branch.clone()),
        reverses_entry_id: Set(reverses_entry_id),
        reversed_by_entry_id: Set(None),
        posted_at: Set(Some(now)),
        created_at: Set(now),
        updated_at: Set(now),
    };

    entry
        .insert(txn)
        .await
        .map_err(|e| commit_err(e, request))
}

/// Inserts the resolved posting lines.
async fn insert_postings(
    txn: &DatabaseTransaction,
    entry_id: Uuid,
    resolved: &[ResolvedLine],
) -> Result<(), LedgerError> {
    let now = Utc::now().into();

    for line in resolved {
        let posting = journal_postings::ActiveModel {
            id: Set(Uuid::now_v7()),
            entry_id: Set(entry_id),
            account_id: Set(line.account_id.into_inner()),
            line_no: Set(line.line_no),
            debit: Set(line.debit),
            credit: Set(line.credit),
            created_at: Set(now),
        };
        posting.insert(txn).await.map_err(store_err)?;
    }

    Ok(())
}
