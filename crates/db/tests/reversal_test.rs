//! Integration tests for reversal: append-only corrections, the crash
//! window, and relink policies.
//!
//! Requires Docker (testcontainers); ignored by default.

mod support;

use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

use corebook_core::ledger::{LedgerError, RelinkPolicy};
use corebook_db::entities::{invoices, journal_entries, sea_orm_active_enums::EntryStatus};
use corebook_db::repositories::{
    JournalRepository, ReportFilter, ReportRepository, ReversalRepository,
};

use support::{cash_sale_request, seed_accounts, seed_invoice, start};

#[tokio::test]
#[ignore = "requires Docker for testcontainers"]
async fn test_reversal_cancels_entry_in_trial_balance() {
    let db = start().await;
    seed_accounts(&db.conn).await;

    let journal = JournalRepository::new(db.conn.clone());
    let reversals = ReversalRepository::new(db.conn.clone());
    let reports = ReportRepository::new(db.conn.clone());

    let posted = journal.post(cash_sale_request(None)).await.unwrap();
    let outcome = reversals
        .reverse(posted.id, RelinkPolicy::Keep)
        .await
        .unwrap();
    assert_ne!(outcome.mirror.id, posted.id);

    // Original is reversed and cross-linked to its mirror.
    let original = journal_entries::Entity::find_by_id(posted.id)
        .one(&db.conn)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(original.status, EntryStatus::Reversed);
    assert_eq!(original.reversed_by_entry_id, Some(outcome.mirror.id));

    let mirror = journal_entries::Entity::find_by_id(outcome.mirror.id)
        .one(&db.conn)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(mirror.status, EntryStatus::Posted);
    assert_eq!(mirror.reverses_entry_id, Some(posted.id));
    assert!(mirror.description.starts_with("Reversal of #"));

    // Net effect over the combined range is zero: the reversed original no
    // longer contributes, the mirror's sides cancel themselves against...
    // nothing. Only the mirror's own lines remain, and they balance.
    let report = reports.trial_balance(ReportFilter::default()).await.unwrap();
    assert!(report.totals.is_balanced);

    let balance = reports.account_balance("1111", None).await.unwrap();
    assert_eq!(balance, dec!(0), "cash returns to zero after reversal");
    let revenue = reports.account_balance("4111", None).await.unwrap();
    assert_eq!(revenue, dec!(0));
}

#[tokio::test]
#[ignore = "requires Docker for testcontainers"]
async fn test_only_posted_entries_can_be_reversed() {
    let db = start().await;
    seed_accounts(&db.conn).await;

    let journal = JournalRepository::new(db.conn.clone());
    let reversals = ReversalRepository::new(db.conn.clone());

    let draft_id = journal.save_draft(cash_sale_request(None)).await.unwrap();
    assert!(matches!(
        reversals.reverse(draft_id, RelinkPolicy::Keep).await,
        Err(LedgerError::NotPosted { .. })
    ));

    // A completed reversal cannot be reversed again.
    let posted = journal.post(cash_sale_request(None)).await.unwrap();
    reversals
        .reverse(posted.id, RelinkPolicy::Keep)
        .await
        .unwrap();
    assert!(matches!(
        reversals.reverse(posted.id, RelinkPolicy::Keep).await,
        Err(LedgerError::NotPosted { .. })
    ));
}

#[tokio::test]
#[ignore = "requires Docker for testcontainers"]
async fn test_relink_policy_clear_frees_the_document() {
    let db = start().await;
    seed_accounts(&db.conn).await;
    let reference = seed_invoice(&db.conn, "INV-REV", dec!(115)).await;

    let journal = JournalRepository::new(db.conn.clone());
    let reversals = ReversalRepository::new(db.conn.clone());

    let posted = journal
        .post(cash_sale_request(Some(reference)))
        .await
        .unwrap();
    reversals
        .reverse(posted.id, RelinkPolicy::Clear)
        .await
        .unwrap();

    let invoice = invoices::Entity::find_by_id(reference.id)
        .one(&db.conn)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(invoice.journal_entry_id, None);

    // The document can be posted again after the link was cleared.
    assert!(journal.post(cash_sale_request(Some(reference))).await.is_ok());
}

#[tokio::test]
#[ignore = "requires Docker for testcontainers"]
async fn test_relink_policy_keep_leaves_the_link() {
    let db = start().await;
    seed_accounts(&db.conn).await;
    let reference = seed_invoice(&db.conn, "INV-KEEP", dec!(115)).await;

    let journal = JournalRepository::new(db.conn.clone());
    let reversals = ReversalRepository::new(db.conn.clone());

    let posted = journal
        .post(cash_sale_request(Some(reference)))
        .await
        .unwrap();
    reversals
        .reverse(posted.id, RelinkPolicy::Keep)
        .await
        .unwrap();

    let invoice = invoices::Entity::find_by_id(reference.id)
        .one(&db.conn)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(invoice.journal_entry_id, Some(posted.id));
}

#[tokio::test]
#[ignore = "requires Docker for testcontainers"]
async fn test_crash_window_retry_is_safe() {
    let db = start().await;
    seed_accounts(&db.conn).await;

    let journal = JournalRepository::new(db.conn.clone());
    let reversals = ReversalRepository::new(db.conn.clone());

    let posted = journal.post(cash_sale_request(None)).await.unwrap();
    let outcome = reversals
        .reverse(posted.id, RelinkPolicy::Keep)
        .await
        .unwrap();

    // Simulate the crash window: mirror posted, but the "mark reversed"
    // step never ran - put the original back to posted.
    let original = journal_entries::Entity::find_by_id(posted.id)
        .one(&db.conn)
        .await
        .unwrap()
        .unwrap();
    let mut active: journal_entries::ActiveModel = original.into();
    active.status = Set(EntryStatus::Posted);
    active.reversed_by_entry_id = Set(None);
    active.update(&db.conn).await.unwrap();

    // Retrying the whole reversal reuses the existing mirror instead of
    // posting a second one.
    let retried = reversals
        .reverse(posted.id, RelinkPolicy::Keep)
        .await
        .unwrap();
    assert_eq!(retried.mirror.id, outcome.mirror.id);

    let mirrors = journal_entries::Entity::find()
        .filter(journal_entries::Column::ReversesEntryId.eq(posted.id))
        .count(&db.conn)
        .await
        .unwrap();
    assert_eq!(mirrors, 1, "retry must not create a second mirror");

    // And the idempotent step alone is safe to call repeatedly.
    reversals
        .mark_reversed(posted.id, outcome.mirror.id, RelinkPolicy::Keep)
        .await
        .unwrap();
    reversals
        .mark_reversed(posted.id, outcome.mirror.id, RelinkPolicy::Keep)
        .await
        .unwrap();

    let original = journal_entries::Entity::find_by_id(posted.id)
        .one(&db.conn)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(original.status, EntryStatus::Reversed);
}
